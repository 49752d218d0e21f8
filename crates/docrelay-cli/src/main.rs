//! docrelay-cli: drive a docrelay server from the terminal.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;

#[cfg(test)]
mod tests;

use std::time::Duration;

use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, Ctx};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = Ctx::new(&cli.server)?;

    match cli.command {
        Commands::Submit { file } => {
            let job_id = handlers::submit(&ctx, &file).await?;
            println!("{job_id}");
        }
        Commands::Process { job_id } => {
            let render_id = handlers::process(&ctx, &job_id).await?;
            println!("{render_id}");
        }
        Commands::Download { render_id, output } => {
            let written = handlers::download(&ctx, &render_id, &output).await?;
            eprintln!("wrote {written} bytes to {}", output.display());
        }
        Commands::Run {
            file,
            output,
            delay_seconds,
        } => {
            eprintln!(
                "submitting {}; rendering {delay_seconds}s after it is queued",
                file.display()
            );
            let outcome =
                handlers::run(&ctx, &file, &output, Duration::from_secs(delay_seconds)).await?;
            eprintln!(
                "job {} rendered as {}; wrote {} bytes to {}",
                outcome.job_id,
                outcome.render_id,
                outcome.bytes,
                output.display()
            );
        }
    }

    Ok(())
}
