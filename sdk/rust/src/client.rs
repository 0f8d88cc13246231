//! HTTP client for the chat ingestion endpoint.

use crate::error::Error;
use crate::types::{Chat, LogBatch};

/// Default server address.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000";

const LOG_PATH: &str = "/api/log";

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn log_url(&self) -> String {
        format!("{}{}", self.base_url, LOG_PATH)
    }

    /// Submit chats to the server. No retries.
    pub async fn log(&self, chats: &[Chat]) -> Result<(), Error> {
        let url = self.log_url();
        let batch = LogBatch {
            chats: chats.to_vec(),
        };

        let response = self.http.post(&url).json(&batch).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status { status, url });
        }

        tracing::debug!(chats = chats.len(), %url, "Submitted chats");
        Ok(())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}
