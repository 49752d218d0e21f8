#![deny(clippy::all, clippy::pedantic)]

use bytes::Bytes;
use docrelay_api_types::{ProcessJobResponse, SubmitJobResponse};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("input file {path} is not valid JSON: {source}")]
    InputJson {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to write output file {path}: {source}")]
    OutputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: StatusCode, body: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub client: Client,
    pub base: Url,
}

impl Ctx {
    pub fn new(server: &str) -> Result<Self, CliError> {
        let base = Url::parse(server)?;
        if base.cannot_be_a_base() {
            return Err(CliError::InvalidInput(format!(
                "server URL `{server}` cannot carry a path"
            )));
        }
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("docrelay-cli/", env!("CARGO_PKG_VERSION"))
    }

    /// Build an endpoint URL below the base, percent-encoding each segment.
    pub fn url(&self, segments: &[&str]) -> Result<Url, CliError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| CliError::InvalidInput(format!("invalid server URL `{}`", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn submit(&self, document: &Value) -> Result<SubmitJobResponse, CliError> {
        let url = self.url(&["submit-job"])?;
        let resp = self.client.post(url).json(document).send().await?;
        Self::handle_json(resp).await
    }

    pub async fn process(&self, job_id: &str) -> Result<ProcessJobResponse, CliError> {
        let url = self.url(&["process-job", job_id])?;
        let resp = self.client.post(url).send().await?;
        Self::handle_json(resp).await
    }

    pub async fn download(&self, render_id: &str) -> Result<Bytes, CliError> {
        let url = self.url(&["download", render_id])?;
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(server_error(status, &bytes));
        }
        Ok(bytes)
    }

    async fn handle_json<T: DeserializeOwned>(resp: Response) -> Result<T, CliError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(server_error(status, &bytes));
        }
        serde_json::from_slice(&bytes).map_err(|e| CliError::Server {
            status,
            body: format!("failed to parse body: {e}"),
        })
    }
}

fn server_error(status: StatusCode, bytes: &[u8]) -> CliError {
    CliError::Server {
        status,
        body: String::from_utf8_lossy(bytes).into_owned(),
    }
}
