//! Unified error types for the service.

use thiserror::Error;

/// Unified error type for the service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tracing subscriber could not be installed.
    #[error("logging setup error: {0}")]
    Logging(String),

    /// Prometheus recorder could not be installed.
    #[error("metrics recorder error: {0}")]
    Metrics(String),

    /// Health probe failed.
    #[error("health probe failed: {0}")]
    Probe(#[from] ProbeError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Container health probe errors.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Request could not be sent or timed out.
    #[error("request to {url} failed: {source}")]
    Request {
        /// Probed URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Endpoint answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    BadStatus {
        /// Probed URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Endpoint answered 200 but did not report healthy.
    #[error("{url} reported status {reported:?}")]
    Unhealthy {
        /// Probed URL.
        url: String,
        /// Status string in the body.
        reported: String,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
