//! Static asset serving from the configured public directory.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use mime_guess::Mime;
use tokio::fs;
use tracing::error;

use crate::application::error::ErrorReport;

const SOURCE: &str = "infra::assets::serve";

/// Read-only view over a directory of public files.
#[derive(Debug, Clone)]
pub struct PublicAssets {
    root: PathBuf,
}

impl PublicAssets {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve the file at `request_path`, relative to the asset root.
    pub async fn serve(&self, request_path: &str) -> Response {
        let Some(absolute) = self.resolve(request_path) else {
            return not_found_response();
        };

        match fs::read(&absolute).await {
            Ok(contents) => {
                let mime = mime_guess::from_path(&absolute).first_or_octet_stream();
                build_response(Bytes::from(contents), mime)
            }
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                not_found_response()
            }
            Err(err) => {
                error!(
                    target = SOURCE,
                    path = %absolute.display(),
                    error = %err,
                    "failed to read static asset"
                );
                let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                ErrorReport::from_error(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                    .attach(&mut response);
                response
            }
        }
    }

    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let candidate = request_path.trim_start_matches('/');
        if candidate.is_empty() || candidate.ends_with('/') {
            return None;
        }

        let relative = Path::new(candidate);
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return None;
        }

        Some(self.root.join(relative))
    }
}

fn not_found_response() -> Response {
    let mut response = StatusCode::NOT_FOUND.into_response();
    ErrorReport::from_message(SOURCE, StatusCode::NOT_FOUND, "Static asset not found")
        .attach(&mut response);
    response
}

fn build_response(bytes: Bytes, mime: Mime) -> Response {
    let len = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        headers.insert(header::CONTENT_LENGTH, value);
    }

    response
}
