//! HTTP backend for the NPU inference server

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{Backend, BackendError, Prompt};
use crate::config::BackendConfig;
use crate::{Error, Result};

/// Backend reached over plain HTTP with a JSON body
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    url: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: Option<String>,
}

impl HttpBackend {
    /// Create a backend client for the given endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build backend client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Create a backend client from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(config.url(), config.timeout())
    }

    /// Endpoint this backend posts to
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn map_transport_error(err: &reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Connection(err.to_string())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn complete(&self, prompt: &Prompt) -> std::result::Result<String, BackendError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(prompt)
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| map_transport_error(&e))?;
        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::Malformed(format!("invalid JSON: {e}")))?;

        parsed
            .content
            .ok_or_else(|| BackendError::Malformed("missing `content` field".to_string()))
    }

    fn name(&self) -> &'static str {
        "npu-http"
    }
}
