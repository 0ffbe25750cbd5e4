use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client, Method,
};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::{
    config::{ClientConfig, ConfigProvider},
    error::ApiError,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait JsonTransport: Send + Sync {
    /// Sends `body` (if any) as JSON to `path` and returns the decoded
    /// response. An empty success body decodes to `Value::Null`.
    async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, ApiError>;
}

/// HTTP client bound to a lazily resolved [`ClientConfig`].
pub struct ApiClient {
    http: Client,
    provider: Arc<dyn ConfigProvider>,
    config: OnceCell<ClientConfig>,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self::with_timeout(provider, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(provider: Arc<dyn ConfigProvider>, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            provider,
            config: OnceCell::new(),
            timeout,
        }
    }

    /// Resolves the config on first use, bounded by the request timeout. A
    /// failed load is not cached.
    pub async fn config(&self) -> Result<&ClientConfig, ApiError> {
        self.config
            .get_or_try_init(|| async {
                let config = tokio::time::timeout(self.timeout, self.provider.load())
                    .await
                    .map_err(|_| ApiError::Timeout(self.timeout))?
                    .map_err(|err| ApiError::Config(format!("{err:#}")))?;
                debug!(base_url = %config.base_url, "resolved client config");
                Ok::<_, ApiError>(config)
            })
            .await
    }

    fn map_send_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Network(err)
        }
    }
}

fn header_map(config: &ClientConfig, with_body: bool) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::with_capacity(config.headers.len() + 1);
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::Config(format!("invalid header name '{name}'")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::Config(format!("invalid value for header '{name}'")))?;
        headers.insert(name, value);
    }
    if with_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    Ok(headers)
}

#[async_trait]
impl JsonTransport for ApiClient {
    async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let config = self.config().await?;
        let url = config.endpoint(path);
        let headers = header_map(config, body.is_some())?;

        debug!(%method, %url, "sending request");
        let mut request = self
            .http
            .request(method.clone(), &url)
            .headers(headers)
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;
        let status = response.status();
        if !status.is_success() {
            warn!(%method, %url, status = status.as_u16(), "request failed");
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| self.map_send_error(err))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
