use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use client_core::{
    ClientConfig, ConfigProvider, ControllerOptions, FileConfig, RemoteConfig, StaticConfig,
};
use serde::Deserialize;
use shared::protocol::{DateEncoding, EnvelopeKey};
use tracing::warn;

pub const SETTINGS_FILE: &str = "partyctl.toml";
pub const DEFAULT_BASE_URL: &str =
    "https://fsa-crud-2aa9294fe819.herokuapp.com/api/2311-FSA-ET-WEB-PT-SF";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub config_url: Option<String>,
    pub config_file: Option<PathBuf>,
    pub events_path: String,
    pub envelope: EnvelopeKey,
    pub date_encoding: DateEncoding,
    pub timeout_secs: u64,
    pub headers: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            config_url: None,
            config_file: None,
            events_path: client_core::controller::DEFAULT_EVENTS_PATH.into(),
            envelope: EnvelopeKey::Data,
            date_encoding: DateEncoding::Timestamp,
            timeout_secs: 10,
            headers: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Remote document wins over a local file, which wins over the
    /// inline base URL.
    pub fn config_provider(&self) -> Arc<dyn ConfigProvider> {
        if let Some(url) = &self.config_url {
            return Arc::new(RemoteConfig::new(url.clone()));
        }
        if let Some(path) = &self.config_file {
            return Arc::new(FileConfig::new(path.clone()));
        }
        let mut config = ClientConfig::new(self.base_url.clone());
        config.headers = self.headers.clone();
        Arc::new(StaticConfig::new(config))
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            events_path: self.events_path.clone(),
            envelope: self.envelope,
            date_encoding: self.date_encoding,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => match parse_settings(&raw) {
            Ok(file_settings) => file_settings,
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = ?error,
                    "ignoring malformed settings file"
                );
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    };

    if let Some(v) = env("PARTY_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("PARTY_CONFIG_URL") {
        settings.config_url = Some(v);
    }
    if let Some(v) = env("PARTY_CONFIG_FILE") {
        settings.config_file = Some(PathBuf::from(v));
    }
    if let Some(v) = env("PARTY_EVENTS_PATH") {
        settings.events_path = v;
    }
    if let Some(v) = env("PARTY_ENVELOPE") {
        match v.parse() {
            Ok(envelope) => settings.envelope = envelope,
            Err(error) => warn!(%error, "ignoring PARTY_ENVELOPE"),
        }
    }
    if let Some(v) = env("PARTY_DATE_ENCODING") {
        match v.parse() {
            Ok(encoding) => settings.date_encoding = encoding,
            Err(error) => warn!(%error, "ignoring PARTY_DATE_ENCODING"),
        }
    }
    if let Some(v) = env("PARTY_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.timeout_secs = parsed;
        }
    }

    settings
}

fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    toml::from_str(raw).context("invalid partyctl settings")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
