#![deny(clippy::all, clippy::pedantic)]

use std::time::Duration;

use clap::Parser;
use httpmock::MockServer;
use tempfile::{NamedTempFile, TempDir};

use crate::args::{Cli, Commands, DEFAULT_DELAY_SECONDS, DEFAULT_SERVER};
use crate::client::{CliError, Ctx};
use crate::handlers;

fn ctx(server: &MockServer) -> Ctx {
    Ctx::new(&server.base_url()).expect("ctx")
}

fn tmp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    std::io::Write::write_all(&mut file, contents.as_bytes()).expect("write tmp");
    file
}

#[test]
fn run_defaults_to_local_server_and_ten_second_delay() {
    let cli = Cli::try_parse_from(["docrelay-cli", "run", "doc.json", "--output", "out.pdf"])
        .expect("parse");
    assert_eq!(cli.server, DEFAULT_SERVER);
    match cli.command {
        Commands::Run { delay_seconds, .. } => assert_eq!(delay_seconds, DEFAULT_DELAY_SECONDS),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn url_escapes_segments_and_keeps_base_path() -> Result<(), CliError> {
    let ctx = Ctx::new("http://relay.example.com/docs/")?;
    let url = ctx.url(&["process-job", "a b/c"])?;
    assert_eq!(
        url.as_str(),
        "http://relay.example.com/docs/process-job/a%20b%2Fc"
    );
    Ok(())
}

#[test]
fn non_base_server_url_is_rejected() {
    let err = Ctx::new("mailto:ops@example.com").expect_err("not a base");
    assert!(matches!(err, CliError::InvalidInput(_)));
}

#[tokio::test]
async fn submit_posts_document_file() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/submit-job")
            .json_body_includes(r#"{"name":"Alice"}"#);
        then.status(202)
            .header("content-type", "application/json")
            .body(r#"{"success":true,"jobId":"job-1","message":"Document received and stored for later processing."}"#);
    });

    let file = tmp_file(r#"{"name":"Alice"}"#);
    let job_id = handlers::submit(&ctx(&server), file.path()).await?;
    assert_eq!(job_id, "job-1");
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn submit_rejects_invalid_json_before_sending() {
    let server = MockServer::start();

    let file = tmp_file("{not json");
    let err = handlers::submit(&ctx(&server), file.path())
        .await
        .expect_err("invalid json");
    assert!(matches!(err, CliError::InputJson { .. }));
}

#[tokio::test]
async fn process_surfaces_upstream_rejection_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST").path("/process-job/job-1");
        then.status(400)
            .header("content-type", "application/json")
            .body(r#"{"success":false,"error":"Template not found"}"#);
    });

    let err = handlers::process(&ctx(&server), "job-1")
        .await
        .expect_err("rejected");
    match err {
        CliError::Server { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("Template not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    mock.assert();
}

#[tokio::test]
async fn download_writes_pdf_to_output() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/download/R1");
        then.status(200)
            .header("content-type", "application/pdf")
            .body("%PDF-1.7");
    });

    let dir = TempDir::new().expect("temp dir");
    let output = dir.path().join("out.pdf");
    let written = handlers::download(&ctx(&server), "R1", &output).await?;

    assert_eq!(written, 8);
    assert_eq!(std::fs::read(&output).expect("read output"), b"%PDF-1.7");
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn download_failure_leaves_no_file() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/download/missing");
        then.status(500)
            .header("content-type", "application/json")
            .body(r#"{"success":false,"error":"Failed to download PDF"}"#);
    });

    let dir = TempDir::new().expect("temp dir");
    let output = dir.path().join("out.pdf");
    let err = handlers::download(&ctx(&server), "missing", &output)
        .await
        .expect_err("download failure");

    assert!(matches!(err, CliError::Server { .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn run_chains_submit_process_and_download() -> Result<(), CliError> {
    let server = MockServer::start();
    let submit = server.mock(|when, then| {
        when.method("POST").path("/submit-job");
        then.status(202)
            .header("content-type", "application/json")
            .body(r#"{"success":true,"jobId":"job-9","message":"queued"}"#);
    });
    let process = server.mock(|when, then| {
        when.method("POST").path("/process-job/job-9");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"success":true,"renderId":"R9"}"#);
    });
    let download = server.mock(|when, then| {
        when.method("GET").path("/download/R9");
        then.status(200)
            .header("content-type", "application/pdf")
            .body("%PDF");
    });

    let file = tmp_file(r#"{"name":"Alice"}"#);
    let dir = TempDir::new().expect("temp dir");
    let output = dir.path().join("alice.pdf");
    let outcome = handlers::run(&ctx(&server), file.path(), &output, Duration::ZERO).await?;

    assert_eq!(outcome.job_id, "job-9");
    assert_eq!(outcome.render_id, "R9");
    assert_eq!(outcome.bytes, 4);
    submit.assert();
    process.assert();
    download.assert();
    Ok(())
}
