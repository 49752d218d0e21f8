//! Contract for the external document-rendering API.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The API answered with an explicit `success: false` body.
    #[error("rendering API rejected the request")]
    Rejected { body: Value },
    /// Network failure, timeout, unexpected status or malformed response.
    #[error("rendering API request failed: {message}")]
    Transport {
        message: String,
        body: Option<Value>,
    },
    #[error("rendering API credentials are not configured")]
    NotConfigured,
}

impl UpstreamError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            body: None,
        }
    }

    pub fn transport_with_body(message: impl Into<String>, body: Value) -> Self {
        Self::Transport {
            message: message.into(),
            body: Some(body),
        }
    }

    /// Best-effort diagnostic for callers: the upstream body when one was
    /// received, otherwise the error message.
    pub fn details(&self) -> Value {
        match self {
            UpstreamError::Rejected { body } => body.clone(),
            UpstreamError::Transport {
                body: Some(body), ..
            } => body.clone(),
            UpstreamError::Transport { message, .. } => Value::String(message.clone()),
            UpstreamError::NotConfigured => Value::String(self.to_string()),
        }
    }
}

/// Outbound calls made on behalf of jobs.
#[async_trait]
pub trait RenderApi: Send + Sync {
    /// Whether both the API key and the template identifier are available.
    fn credentials_configured(&self) -> bool;

    /// Submit `payload` against the configured template and return the
    /// render identifier assigned by the API.
    async fn render(&self, payload: &Value) -> Result<String, UpstreamError>;

    /// Fetch the finished artifact for `render_id`.
    async fn download(&self, render_id: &str) -> Result<Bytes, UpstreamError>;
}
