use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

/// Connection settings for the events API. Serialized as the
/// `{ "baseUrl": ..., "headers": {...} }` document some deployments publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(self.base_url.trim())
            .with_context(|| format!("invalid base url '{}'", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("base url '{}' must use http or https", self.base_url);
        }
        Ok(())
    }

    /// Joins `path` onto the base URL without doubling or dropping the `/`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        if path.is_empty() || path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[async_trait]
pub trait ConfigProvider: Send + Sync {
    async fn load(&self) -> Result<ClientConfig>;
}

/// Config compiled in or assembled from local settings.
pub struct StaticConfig {
    config: ClientConfig,
}

impl StaticConfig {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigProvider for StaticConfig {
    async fn load(&self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config.clone())
    }
}

pub struct FileConfig {
    path: PathBuf,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigProvider for FileConfig {
    async fn load(&self) -> Result<ClientConfig> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read config file '{}'", self.path.display()))?;
        let config: ClientConfig = serde_json::from_str(&raw)
            .with_context(|| format!("malformed config file '{}'", self.path.display()))?;
        config.validate()?;
        info!(path = %self.path.display(), base_url = %config.base_url, "loaded client config file");
        Ok(config)
    }
}

/// Side-channel config document fetched over HTTP.
pub struct RemoteConfig {
    http: Client,
    url: String,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ConfigProvider for RemoteConfig {
    async fn load(&self) -> Result<ClientConfig> {
        let config: ClientConfig = self
            .http
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("failed to fetch config from {}", self.url))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("malformed config document at {}", self.url))?;
        config.validate()?;
        info!(url = %self.url, base_url = %config.base_url, "loaded remote client config");
        Ok(config)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
