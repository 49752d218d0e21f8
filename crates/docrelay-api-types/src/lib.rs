//! Shared request and response types for the docrelay HTTP API.
//!
//! The field names follow the wire format (`jobId`, `renderId`) so existing
//! browser clients keep working against the relay.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle stage of a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Done,
    Failed,
}

/// Body returned by `POST /submit-job` with `202 Accepted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    pub success: bool,
    pub job_id: String,
    pub message: String,
}

/// Body returned by `POST /process-job/{jobId}` on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessJobResponse {
    pub success: bool,
    pub render_id: String,
}

/// Error body emitted by the relay itself.
///
/// Application-level failures reported by the rendering API are forwarded
/// verbatim instead and do not necessarily match this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
