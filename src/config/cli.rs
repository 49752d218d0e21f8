use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the docrelay binary.
#[derive(Debug, Parser)]
#[command(
    name = "docrelay",
    version,
    about = "Relay document-rendering jobs to the Carbone API"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "DOCRELAY_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ServeOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the relay HTTP service.
    Serve,
    /// Resolve and validate configuration, print a summary, then exit.
    #[command(name = "check-config")]
    CheckConfig,
}

/// Overrides accepted by every command; they take precedence over files and
/// `DOCRELAY__*` environment variables.
#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST", global = true)]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", env = "PORT", value_name = "PORT", global = true)]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Carbone API key used as the bearer credential.
    #[arg(
        long = "carbone-api-key",
        env = "CARBONE_API_KEY",
        value_name = "KEY",
        hide_env_values = true,
        global = true
    )]
    pub carbone_api_key: Option<String>,

    /// Carbone template identifier documents are rendered against.
    #[arg(
        long = "carbone-template-id",
        env = "CARBONE_TEMPLATE_ID",
        value_name = "ID",
        global = true
    )]
    pub carbone_template_id: Option<String>,

    /// Base URL of the Carbone API.
    #[arg(
        long = "carbone-base-url",
        env = "CARBONE_API_BASE_URL",
        value_name = "URL",
        global = true
    )]
    pub carbone_base_url: Option<String>,

    /// Override the `carbone-version` header sent upstream.
    #[arg(long = "carbone-version", value_name = "VERSION", global = true)]
    pub carbone_version: Option<String>,

    /// Timeout for each outbound Carbone request.
    #[arg(long = "carbone-timeout-seconds", value_name = "SECONDS", global = true)]
    pub carbone_timeout_seconds: Option<u64>,

    /// Override the directory served as static assets.
    #[arg(long = "assets-directory", value_name = "PATH", global = true)]
    pub assets_directory: Option<PathBuf>,

    /// Toggle static asset serving.
    #[arg(
        long = "assets-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub assets_enabled: Option<bool>,

    /// Override the `Access-Control-Allow-Origin` response header.
    #[arg(long = "cors-allow-origin", value_name = "ORIGIN", global = true)]
    pub cors_allow_origin: Option<String>,
}
