#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use serde_json::Value;
use tokio::fs;

use crate::client::CliError;

pub async fn read_document(path: &Path) -> Result<Value, CliError> {
    let data = fs::read(path).await.map_err(|source| CliError::InputFile {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| CliError::InputJson {
        path: path.display().to_string(),
        source,
    })
}

pub async fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes)
        .await
        .map_err(|source| CliError::OutputFile {
            path: path.display().to_string(),
            source,
        })
}
