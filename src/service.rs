//! Service and runtime metadata reported by the API.

use std::time::Instant;

use serde::Serialize;

use crate::config::Config;

/// Fixed service name.
pub const SERVICE_NAME: &str = "cicd-demo-api";

/// Release version, taken from the crate manifest.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compiler that built this binary, captured by `build.rs`.
pub const RUST_VERSION: &str = env!("BUILD_RUSTC_VERSION");

/// Static service metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    /// Service name.
    pub name: String,
    /// Release version.
    pub version: String,
    /// Deployment environment.
    pub environment: String,
}

impl ServiceInfo {
    /// Metadata for the configured deployment.
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: SERVICE_NAME.to_string(),
            version: SERVICE_VERSION.to_string(),
            environment: config.environment.clone(),
        }
    }
}

/// Toolchain and host metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeInfo {
    /// Compiler version string.
    pub rust_version: String,
    /// `<os>-<arch>`, e.g. `linux-x86_64`.
    pub platform: String,
    /// `64bit` or `32bit`.
    pub architecture: String,
}

impl RuntimeInfo {
    /// Metadata for the running binary.
    pub fn detect() -> Self {
        Self {
            rust_version: RUST_VERSION.to_string(),
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            architecture: format!("{}bit", usize::BITS),
        }
    }
}

/// Seconds elapsed since `start`. Monotonic, so never negative.
pub fn uptime_seconds(start: Instant) -> f64 {
    start.elapsed().as_secs_f64()
}

/// Render seconds as `"<h>h <m>m <s>s"`, truncating each component.
pub fn format_uptime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours}h {minutes}m {secs}s")
}

/// Current wall-clock time as RFC 3339 (UTC).
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
