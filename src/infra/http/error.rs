use std::error::Error as StdError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docrelay_api_types::ErrorResponse;
use serde_json::Value;

use crate::application::error::ErrorReport;
use crate::application::jobs::JobError;

pub mod messages {
    pub const NOT_CONFIGURED: &str = "Rendering API credentials are not loaded on the server.";
    pub const JOB_NOT_FOUND: &str = "Job ID not found.";
    pub const RENDER_FAILED: &str = "Rendering failed";
    pub const DOWNLOAD_FAILED: &str = "Failed to download PDF";
    pub const STORE_FAILED: &str = "Job store update failed";
    pub const INVALID_PAYLOAD: &str = "Request body must be a JSON document";
}

/// JSON error response with a diagnostic report for the logging middleware.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
    report: ErrorReport,
}

#[derive(Debug)]
enum ErrorBody {
    Relay(ErrorResponse),
    /// Upstream body forwarded unchanged.
    Upstream(Value),
}

impl ApiError {
    pub fn new(
        source: &'static str,
        status: StatusCode,
        message: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            body: ErrorBody::Relay(ErrorResponse::new(message)),
            report: ErrorReport::from_message(source, status, detail),
        }
    }

    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        Self {
            status,
            body: ErrorBody::Relay(ErrorResponse::new(message)),
            report: ErrorReport::from_error(source, status, error),
        }
    }

    /// Forward an upstream body unchanged.
    pub fn passthrough(source: &'static str, status: StatusCode, body: Value) -> Self {
        let report = ErrorReport::from_message(source, status, body.to_string());
        Self {
            status,
            body: ErrorBody::Upstream(body),
            report,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.body = match self.body {
            ErrorBody::Relay(body) => ErrorBody::Relay(body.with_details(details)),
            upstream @ ErrorBody::Upstream(_) => upstream,
        };
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            ErrorBody::Relay(body) => (self.status, Json(body)).into_response(),
            ErrorBody::Upstream(body) => (self.status, Json(body)).into_response(),
        };
        self.report.attach(&mut response);
        response
    }
}

impl From<JobError> for ApiError {
    fn from(error: JobError) -> Self {
        const SOURCE: &str = "infra::http::job_error_to_api_error";

        match error {
            JobError::NotConfigured => ApiError::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                messages::NOT_CONFIGURED,
                &error,
            ),
            JobError::NotFound(_) => ApiError::from_error(
                SOURCE,
                StatusCode::NOT_FOUND,
                messages::JOB_NOT_FOUND,
                &error,
            ),
            JobError::Rejected { body, .. } => {
                ApiError::passthrough(SOURCE, StatusCode::BAD_REQUEST, body)
            }
            JobError::Render { ref source, .. } => {
                let details = source.details();
                ApiError::from_error(
                    SOURCE,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::RENDER_FAILED,
                    &error,
                )
                .with_details(details)
            }
            JobError::Download { .. } => ApiError::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                messages::DOWNLOAD_FAILED,
                &error,
            ),
            JobError::Store(_) => ApiError::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                messages::STORE_FAILED,
                &error,
            ),
        }
    }
}
