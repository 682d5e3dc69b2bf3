//! Server configuration loading from file and environment variables.

use callboard_registry::DEFAULT_PROVIDER_URL;
use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "callboard_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Which registry implementation backs the HTTP surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// Forward to the voice provider's REST API.
    #[default]
    Http,
    /// Keep everything in memory; no provider account needed.
    Fake,
}

impl ProviderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Fake => "fake",
        }
    }
}

impl FromStr for ProviderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "fake" => Ok(Self::Fake),
            other => Err(format!("unknown provider mode: {other}")),
        }
    }
}

/// Voice provider settings. The credentials only come from the environment.
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub mode: ProviderMode,

    #[serde(default = "default_provider_url")]
    pub base_url: String,

    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,

    /// Server-side credential (`VAPI_API_KEY`).
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Client-exposed credential (`VAPI_PUBLIC_KEY`).
    #[serde(skip)]
    pub public_key: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ProviderConfig")
            .field("mode", &self.mode)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("api_key", &redact(&self.api_key))
            .field("public_key", &redact(&self.public_key))
            .finish()
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "callboard.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider_url() -> String {
    DEFAULT_PROVIDER_URL.to_string()
}

fn default_provider_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            mode: ProviderMode::default(),
            base_url: default_provider_url(),
            timeout_seconds: default_provider_timeout(),
            api_key: None,
            public_key: None,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `CALLBOARD_HOST` overrides `server.host`
/// - `CALLBOARD_PORT` overrides `server.port`
/// - `CALLBOARD_DB_PATH` overrides `database.path`
/// - `CALLBOARD_LOG_LEVEL` overrides `logging.level`
/// - `CALLBOARD_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `CALLBOARD_PROVIDER_MODE` overrides `provider.mode`
/// - `CALLBOARD_PROVIDER_URL` overrides `provider.base_url`
///
/// The provider credentials are read from `VAPI_API_KEY` and
/// `VAPI_PUBLIC_KEY` only.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed, or
/// if `CALLBOARD_PROVIDER_MODE` names an unknown mode.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    if let Ok(host) = std::env::var("CALLBOARD_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("CALLBOARD_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(db_path) = std::env::var("CALLBOARD_DB_PATH") {
        config.database.path = db_path;
    }
    if let Ok(level) = std::env::var("CALLBOARD_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("CALLBOARD_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(mode) = non_empty_env("CALLBOARD_PROVIDER_MODE") {
        config.provider.mode = mode.parse().map_err(|reason| ConfigError::InvalidEnv {
            name: "CALLBOARD_PROVIDER_MODE",
            reason,
        })?;
    }
    if let Some(url) = non_empty_env("CALLBOARD_PROVIDER_URL") {
        config.provider.base_url = url;
    }

    config.provider.api_key = non_empty_env("VAPI_API_KEY");
    config.provider.public_key = non_empty_env("VAPI_PUBLIC_KEY");

    Ok(config)
}
