//! Service configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use strum::{Display, EnumString};

use crate::error::{Result, ServiceError};

/// Log verbosity accepted in `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[strum(to_string = "warn", serialize = "warning")]
    Warn,
    Error,
    /// Accepted for compatibility with uvicorn-style settings.
    Critical,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

/// Log output format accepted in `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server ===
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address. Must be an IP literal (`0.0.0.0`, `127.0.0.1`, `::`);
    /// hostnames such as `localhost` are rejected by [`Config::bind_addr`].
    #[serde(default = "default_host")]
    pub host: String,

    // === Deployment ===
    /// Deployment environment name, echoed by `/health`.
    #[serde(default = "default_environment")]
    pub environment: String,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error, critical).
    #[serde(default, deserialize_with = "from_str_insensitive")]
    pub log_level: LogLevel,

    /// Log format (text or json).
    #[serde(default, deserialize_with = "from_str_insensitive")]
    pub log_format: LogFormat,
}

fn default_port() -> u16 {
    8000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn from_str_insensitive<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(serde::de::Error::custom)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            environment: default_environment(),
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Build configuration from explicit key/value pairs (upper-case keys).
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(pairs)?)
    }

    /// Check if the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ServiceError::InvalidConfig("PORT must be non-zero".to_string()));
        }

        if self.host.trim().is_empty() {
            return Err(ServiceError::InvalidConfig("HOST must not be empty".to_string()));
        }

        if self.environment.trim().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "ENVIRONMENT must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address the server binds to. `HOST` is not resolved.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| {
                ServiceError::InvalidConfig(format!("HOST is not an IP address: {}", self.host))
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
