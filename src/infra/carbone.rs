//! HTTP adapter for the Carbone rendering API.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::application::upstream::{RenderApi, UpstreamError};
use crate::config::CarboneSettings;

use super::error::InfraError;

const VERSION_HEADER: &str = "carbone-version";

/// Client for `POST /render/{templateId}` and `GET /render/{renderId}`.
#[derive(Debug, Clone)]
pub struct CarboneClient {
    client: Client,
    base: Url,
    api_key: Option<String>,
    template_id: Option<String>,
    version: String,
}

impl CarboneClient {
    pub fn new(settings: &CarboneSettings) -> Result<Self, InfraError> {
        let mut builder = Client::builder().user_agent(Self::user_agent());
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;

        Ok(Self {
            client,
            base: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            template_id: settings.template_id.clone(),
            version: settings.version.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("docrelay/", env!("CARGO_PKG_VERSION"))
    }

    fn render_url(&self, id: &str) -> Result<Url, UpstreamError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::transport(format!("invalid base URL `{}`", self.base)))?
            .pop_if_empty()
            .push("render")
            .push(id);
        Ok(url)
    }

    fn api_key(&self) -> Result<&str, UpstreamError> {
        self.api_key.as_deref().ok_or(UpstreamError::NotConfigured)
    }
}

#[async_trait]
impl RenderApi for CarboneClient {
    fn credentials_configured(&self) -> bool {
        self.api_key.is_some() && self.template_id.is_some()
    }

    async fn render(&self, payload: &Value) -> Result<String, UpstreamError> {
        let api_key = self.api_key()?;
        let template_id = self
            .template_id
            .as_deref()
            .ok_or(UpstreamError::NotConfigured)?;
        let url = self.render_url(template_id)?;

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .header(VERSION_HEADER, &self.version)
            .json(payload)
            .send()
            .await
            .map_err(|err| UpstreamError::transport(err.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| UpstreamError::transport(err.to_string()))?;

        interpret_render_response(status, &bytes)
    }

    async fn download(&self, render_id: &str) -> Result<Bytes, UpstreamError> {
        let api_key = self.api_key()?;
        let url = self.render_url(render_id)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(api_key)
            .header(VERSION_HEADER, &self.version)
            .send()
            .await
            .map_err(|err| UpstreamError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match parse_body(body.as_bytes()) {
                Some(body) => UpstreamError::transport_with_body(unexpected_status(status), body),
                None => UpstreamError::transport(unexpected_status(status)),
            });
        }

        response
            .bytes()
            .await
            .map_err(|err| UpstreamError::transport(err.to_string()))
    }
}

/// Classify a render response.
///
/// A JSON body carrying `success: false` is an application-level rejection
/// regardless of status, so a 4xx/5xx that explains itself is relayed to the
/// caller as a 400 with that body rather than as a transport failure. On a 2xx
/// status anything other than `success: true` is a rejection too, including a
/// body that is not JSON at all (relayed as text). A non-2xx without a failure
/// body, or a successful body lacking `data.renderId`, is a transport failure.
fn interpret_render_response(status: StatusCode, bytes: &[u8]) -> Result<String, UpstreamError> {
    let body = match serde_json::from_slice::<Value>(bytes) {
        Ok(body) => body,
        Err(_) if status.is_success() => {
            return Err(UpstreamError::Rejected {
                body: Value::String(String::from_utf8_lossy(bytes).into_owned()),
            });
        }
        Err(_) => {
            return Err(match parse_body(bytes) {
                Some(body) => UpstreamError::transport_with_body(unexpected_status(status), body),
                None => UpstreamError::transport(unexpected_status(status)),
            });
        }
    };

    let explicit_failure = body.get("success") == Some(&Value::Bool(false));
    let not_successful = body.get("success") != Some(&Value::Bool(true));
    if explicit_failure || (status.is_success() && not_successful) {
        return Err(UpstreamError::Rejected { body });
    }

    if !status.is_success() {
        return Err(UpstreamError::transport_with_body(
            unexpected_status(status),
            body,
        ));
    }

    body.pointer("/data/renderId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            UpstreamError::transport_with_body("response did not include a render id", body.clone())
        })
}

/// Keep whatever the API sent back: JSON when it parses, text otherwise.
fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(bytes).into_owned())))
}

fn unexpected_status(status: StatusCode) -> String {
    format!("unexpected status {status}")
}
