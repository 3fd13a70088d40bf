//! HTTP client for the log intake.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use thiserror::Error;

use crate::config::IntakeConfig;
use crate::forwarder::entry::LogEntry;

/// Header carrying the intake API key.
pub const API_KEY_HEADER: &str = "DD-API-KEY";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Invalid intake configuration: {0}")]
    InvalidConfig(String),

    #[error("Intake rejected batch: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), IntakeError>> + Send + 'a>>;

/// Something that accepts a batch of entries in one request.
pub trait IntakeClient: Send + Sync {
    fn send_batch<'a>(&'a self, entries: &'a [LogEntry]) -> SendFuture<'a>;
}

/// Posts batches as a JSON array to the configured intake URL.
#[derive(Debug, Clone)]
pub struct HttpIntakeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpIntakeClient {
    pub fn new(config: &IntakeConfig) -> Result<Self, IntakeError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| IntakeError::InvalidConfig("API key not set".to_string()))?;

        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(api_key)
            .map_err(|e| IntakeError::InvalidConfig(format!("API key is not a valid header: {}", e)))?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IntakeError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl IntakeClient for HttpIntakeClient {
    fn send_batch<'a>(&'a self, entries: &'a [LogEntry]) -> SendFuture<'a> {
        Box::pin(async move {
            let response = self.client.post(&self.endpoint).json(entries).send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(());
            }
            let body = response.text().await.unwrap_or_default();
            Err(IntakeError::Status {
                status: status.as_u16(),
                body,
            })
        })
    }
}
