use serde::Deserialize;
use thiserror::Error;

use super::payload::EventSubmission;
use crate::config::AppConfig;

pub const NETWORK_FALLBACK: &str = "Network error. Is the API server running?";
const REJECTED_FALLBACK: &str = "Failed to list event.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Network(String),
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SubmitClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SubmitClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.submit_endpoint())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One POST, no retry.
    pub async fn submit(&self, payload: &EventSubmission) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        let body: SubmitResponse = response.json().await.map_err(network)?;

        if status.is_success() && body.success {
            return Ok(());
        }
        let message = body
            .error
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| REJECTED_FALLBACK.to_string());
        Err(SubmitError::Rejected(message))
    }
}

fn network(err: reqwest::Error) -> SubmitError {
    let text = err.to_string();
    if text.trim().is_empty() {
        SubmitError::Network(NETWORK_FALLBACK.to_string())
    } else {
        SubmitError::Network(text)
    }
}
