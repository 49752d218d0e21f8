//! Job lifecycle endpoints: submit, process, download.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use docrelay_api_types::{ProcessJobResponse, SubmitJobResponse};
use mime_guess::Mime;
use serde_json::{Map, Value};

use super::HttpState;
use super::error::{ApiError, messages};
use crate::application::error::ErrorReport;
use crate::application::jobs::JobError;

const ACCEPTED_MESSAGE: &str = "Document received and stored for later processing.";

/// Accept any document. Bodies not declared as JSON are stored as `{}`;
/// credentials are checked before the body is read.
pub async fn submit_job(
    State(state): State<HttpState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if !state.jobs.accepts_submissions() {
        return Err(JobError::NotConfigured.into());
    }

    let payload = parse_submission(&headers, &body)?;
    let job = state.jobs.submit(payload).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitJobResponse {
            success: true,
            job_id: job.id,
            message: ACCEPTED_MESSAGE.to_string(),
        }),
    ))
}

fn parse_submission(headers: &HeaderMap, body: &[u8]) -> Result<Value, ApiError> {
    if !declares_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(body).map_err(|err| {
        ApiError::new(
            "infra::http::submit_job",
            StatusCode::BAD_REQUEST,
            messages::INVALID_PAYLOAD,
            err.to_string(),
        )
    })
}

fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Mime>().ok())
        .is_some_and(|mime| {
            mime.type_() == "application"
                && (mime.subtype() == "json" || mime.suffix().is_some_and(|s| s == "json"))
        })
}

pub async fn process_job(
    State(state): State<HttpState>,
    Path(job_id): Path<String>,
) -> Result<Json<ProcessJobResponse>, ApiError> {
    let render_id = state.jobs.process(&job_id).await?;

    Ok(Json(ProcessJobResponse {
        success: true,
        render_id,
    }))
}

pub async fn download_render(
    State(state): State<HttpState>,
    Path(render_id): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.jobs.download(&render_id).await?;

    Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes).into_response())
}

pub async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Anything not matched by an API route is looked up in the public directory.
pub async fn serve_asset(State(state): State<HttpState>, method: Method, uri: Uri) -> Response {
    const SOURCE: &str = "infra::http::serve_asset";

    match (&state.assets, method) {
        (Some(assets), Method::GET | Method::HEAD) => assets.serve(uri.path()).await,
        _ => {
            let mut response = StatusCode::NOT_FOUND.into_response();
            ErrorReport::from_message(SOURCE, StatusCode::NOT_FOUND, "No route matched")
                .attach(&mut response);
            response
        }
    }
}
