//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{fmt, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use axum::http::HeaderValue;
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

pub use cli::{CliArgs, Command, ServeOverrides};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "docrelay";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CARBONE_BASE_URL: &str = "https://api.carbone.io";
const DEFAULT_CARBONE_VERSION: &str = "5";
const DEFAULT_ASSETS_DIR: &str = "public";
const DEFAULT_CORS_ALLOW_ORIGIN: &str = "*";

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub carbone: CarboneSettings,
    pub assets: AssetSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Connection details for the Carbone rendering API.
///
/// The key and template are optional at load time: their absence only blocks
/// job submission.
#[derive(Clone)]
pub struct CarboneSettings {
    pub api_key: Option<String>,
    pub template_id: Option<String>,
    pub base_url: Url,
    pub version: String,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for CarboneSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarboneSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("template_id", &self.template_id)
            .field("base_url", &self.base_url.as_str())
            .field("version", &self.version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AssetSettings {
    pub directory: PathBuf,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct CorsSettings {
    pub allow_origin: HeaderValue,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("DOCRELAY").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    carbone: RawCarboneSettings,
    assets: RawAssetSettings,
    cors: RawCorsSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(key) = overrides.carbone_api_key.as_ref() {
            self.carbone.api_key = Some(key.clone());
        }
        if let Some(template) = overrides.carbone_template_id.as_ref() {
            self.carbone.template_id = Some(template.clone());
        }
        if let Some(url) = overrides.carbone_base_url.as_ref() {
            self.carbone.base_url = Some(url.clone());
        }
        if let Some(version) = overrides.carbone_version.as_ref() {
            self.carbone.version = Some(version.clone());
        }
        if let Some(seconds) = overrides.carbone_timeout_seconds {
            self.carbone.timeout_seconds = Some(seconds);
        }
        if let Some(directory) = overrides.assets_directory.as_ref() {
            self.assets.directory = Some(directory.clone());
        }
        if let Some(enabled) = overrides.assets_enabled {
            self.assets.enabled = Some(enabled);
        }
        if let Some(origin) = overrides.cors_allow_origin.as_ref() {
            self.cors.allow_origin = Some(origin.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            carbone,
            assets,
            cors,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            carbone: build_carbone_settings(carbone)?,
            assets: build_asset_settings(assets)?,
            cors: build_cors_settings(cors)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_carbone_settings(carbone: RawCarboneSettings) -> Result<CarboneSettings, LoadError> {
    let api_key = non_blank(carbone.api_key);
    let template_id = non_blank(carbone.template_id);

    let base_url_value = non_blank(carbone.base_url)
        .unwrap_or_else(|| DEFAULT_CARBONE_BASE_URL.to_string());
    let base_url = Url::parse(&base_url_value).map_err(|err| {
        LoadError::invalid("carbone.base_url", format!("`{base_url_value}`: {err}"))
    })?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "carbone.base_url",
            "scheme must be http or https",
        ));
    }

    let version = non_blank(carbone.version).unwrap_or_else(|| DEFAULT_CARBONE_VERSION.to_string());

    let timeout = match carbone.timeout_seconds {
        Some(0) => {
            return Err(LoadError::invalid(
                "carbone.timeout_seconds",
                "must be greater than zero",
            ));
        }
        Some(seconds) => Some(Duration::from_secs(seconds)),
        None => None,
    };

    Ok(CarboneSettings {
        api_key,
        template_id,
        base_url,
        version,
        timeout,
    })
}

fn build_asset_settings(assets: RawAssetSettings) -> Result<AssetSettings, LoadError> {
    let directory = assets
        .directory
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));
    if directory.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "assets.directory",
            "path must not be empty",
        ));
    }

    Ok(AssetSettings {
        directory,
        enabled: assets.enabled.unwrap_or(true),
    })
}

fn build_cors_settings(cors: RawCorsSettings) -> Result<CorsSettings, LoadError> {
    let origin =
        non_blank(cors.allow_origin).unwrap_or_else(|| DEFAULT_CORS_ALLOW_ORIGIN.to_string());
    let allow_origin = HeaderValue::from_str(&origin).map_err(|err| {
        LoadError::invalid("cors.allow_origin", format!("`{origin}`: {err}"))
    })?;

    Ok(CorsSettings { allow_origin })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCarboneSettings {
    api_key: Option<String>,
    template_id: Option<String>,
    base_url: Option<String>,
    version: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAssetSettings {
    directory: Option<PathBuf>,
    enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCorsSettings {
    allow_origin: Option<String>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
mod tests;
