#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;
use std::time::Duration;

use crate::client::{CliError, Ctx};
use crate::io::{read_document, write_output};

pub async fn submit(ctx: &Ctx, file: &Path) -> Result<String, CliError> {
    let document = read_document(file).await?;
    let resp = ctx.submit(&document).await?;
    Ok(resp.job_id)
}

pub async fn process(ctx: &Ctx, job_id: &str) -> Result<String, CliError> {
    let resp = ctx.process(job_id).await?;
    Ok(resp.render_id)
}

/// Returns the number of bytes written.
pub async fn download(ctx: &Ctx, render_id: &str, output: &Path) -> Result<usize, CliError> {
    let bytes = ctx.download(render_id).await?;
    write_output(output, &bytes).await?;
    Ok(bytes.len())
}

pub struct RunOutcome {
    pub job_id: String,
    pub render_id: String,
    pub bytes: usize,
}

/// Submit, wait `delay`, then render and download.
pub async fn run(
    ctx: &Ctx,
    file: &Path,
    output: &Path,
    delay: Duration,
) -> Result<RunOutcome, CliError> {
    let job_id = submit(ctx, file).await?;
    tokio::time::sleep(delay).await;

    let render_id = process(ctx, &job_id).await?;
    let bytes = download(ctx, &render_id, output).await?;
    Ok(RunOutcome {
        job_id,
        render_id,
        bytes,
    })
}
