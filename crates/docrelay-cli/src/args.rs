//! Command-line surface for `docrelay-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const DEFAULT_SERVER: &str = "http://localhost:3000";
pub const DEFAULT_DELAY_SECONDS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "docrelay-cli", version, about = "docrelay command-line client", long_about = None)]
pub struct Cli {
    /// Relay base URL, e.g. <http://localhost:3000>
    #[arg(long, env = "DOCRELAY_SERVER_URL", default_value = DEFAULT_SERVER)]
    pub server: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Queue a JSON document for rendering and print its job id
    Submit {
        /// Path to the JSON document
        file: PathBuf,
    },
    /// Render a queued job and print the render id
    Process {
        /// Job id returned by `submit`
        job_id: String,
    },
    /// Fetch a rendered PDF
    Download {
        /// Render id returned by `process`
        render_id: String,
        /// Where to write the PDF
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Submit, wait, render and download in one go
    Run {
        /// Path to the JSON document
        file: PathBuf,
        /// Where to write the PDF
        #[arg(long, short)]
        output: PathBuf,
        /// Seconds to wait between submitting and rendering
        #[arg(long, default_value_t = DEFAULT_DELAY_SECONDS)]
        delay_seconds: u64,
    },
}
