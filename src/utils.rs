//! Logging setup and process signal helpers.

use tracing::info;
use tracing_subscriber::fmt::{
    self,
    format::{Format, Json, JsonFields},
};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::{LogFormat, LogLevel};
use crate::error::{Result, ServiceError};

/// Filter directive for the given level; `verbose` forces debug for this crate.
pub fn log_directive(level: LogLevel, verbose: bool) -> String {
    if verbose {
        format!("{}=debug,{}", env!("CARGO_CRATE_NAME"), level.as_filter())
    } else {
        level.as_filter().to_string()
    }
}

/// Text formatter layer.
pub type TextLayer<S> = fmt::Layer<S>;

/// JSON formatter layer.
pub type JsonLayer<S> = fmt::Layer<S, JsonFields, Format<Json>>;

/// Filter for the subscriber.
///
/// `verbose` wins, then a parsable `RUST_LOG`, then `LOG_LEVEL`.
pub fn env_filter(level: LogLevel, verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new(log_directive(level, true));
    }

    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(log_directive(level, false)))
}

/// Exactly one formatter layer, picked by `LOG_FORMAT`.
pub fn format_layers<S, J>(format: LogFormat) -> (Option<TextLayer<S>>, Option<JsonLayer<J>>) {
    match format {
        LogFormat::Text => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    }
}

/// Install the global tracing subscriber.
pub fn init_logging(level: LogLevel, format: LogFormat, verbose: bool) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(level, verbose, rust_log.as_deref());
    let (text, json) = format_layers(format);

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
        .map_err(|e| ServiceError::Logging(e.to_string()))
}

/// Resolve when the process receives Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
