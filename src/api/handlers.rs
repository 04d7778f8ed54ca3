//! HTTP API handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Config;
use crate::service::{format_uptime, now_rfc3339, uptime_seconds, RuntimeInfo, ServiceInfo};

/// Paths advertised by `/` and by the 404 body.
pub const AVAILABLE_ENDPOINTS: [&str; 6] = [
    "/",
    "/health",
    "/api/status",
    "/api/metrics",
    "/metrics",
    "/docs",
];

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process start, monotonic.
    pub started_at: Instant,
    /// Static service metadata.
    pub service: Arc<ServiceInfo>,
    /// Toolchain and host metadata.
    pub runtime: Arc<RuntimeInfo>,
    /// Requests served since start.
    pub requests: Arc<AtomicU64>,
    /// Render handle of the global Prometheus recorder, if installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state; the uptime clock starts now.
    pub fn new(service: ServiceInfo, runtime: RuntimeInfo) -> Self {
        Self {
            started_at: Instant::now(),
            service: Arc::new(service),
            runtime: Arc::new(runtime),
            requests: Arc::new(AtomicU64::new(0)),
            prometheus: None,
        }
    }

    /// App state for the given configuration and the running binary.
    pub fn from_config(config: &Config) -> Self {
        Self::new(ServiceInfo::from_config(config), RuntimeInfo::detect())
    }

    /// Attach the Prometheus render handle.
    pub fn with_prometheus(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.prometheus = handle;
        self
    }

    /// Count one served request.
    pub fn record_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Requests served so far.
    pub fn requests_total(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

/// Endpoint map in the root response.
#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointMap {
    pub docs: &'static str,
    pub health: &'static str,
    pub status: &'static str,
    pub metrics: &'static str,
    pub prometheus: &'static str,
}

/// Root response describing the service.
#[derive(Debug, Serialize, ToSchema)]
pub struct AppInfoResponse {
    /// Greeting.
    pub message: &'static str,
    /// Release version.
    pub version: String,
    /// Showcased pipeline features.
    pub features: Vec<&'static str>,
    /// Where to find things.
    pub endpoints: EndpointMap,
    /// Technologies in use.
    pub tech_stack: Vec<&'static str>,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: &'static str,
    /// RFC 3339 wall-clock time.
    pub timestamp: String,
    /// Seconds since process start.
    pub uptime: f64,
    /// Deployment environment.
    pub environment: String,
    /// Compiler version.
    pub rust_version: String,
}

/// Status response.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Service name.
    pub service: String,
    /// Always "running".
    pub status: &'static str,
    /// RFC 3339 wall-clock time.
    pub timestamp: String,
    /// Release version.
    pub version: String,
    /// Compiler version.
    pub rust_version: String,
    /// `<os>-<arch>`.
    pub platform: String,
}

/// Runtime details in the metrics response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RuntimeMetrics {
    /// Compiler version.
    pub version: String,
    /// `<os>-<arch>`.
    pub platform: String,
    /// Pointer width.
    pub architecture: String,
    /// Async runtime worker threads.
    pub worker_threads: usize,
}

/// Metrics response.
#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsResponse {
    /// Seconds since process start.
    pub uptime_seconds: f64,
    /// Uptime as "Xh Ym Zs".
    pub uptime_human: String,
    /// Requests served since start, this one included.
    pub requests_total: u64,
    /// Runtime details.
    pub runtime_info: RuntimeMetrics,
}

/// Body of the 404 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotFoundDetail {
    pub error: &'static str,
    pub available_endpoints: Vec<&'static str>,
    pub documentation: &'static str,
}

/// 404 response envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotFoundResponse {
    pub detail: NotFoundDetail,
}

impl IntoResponse for NotFoundResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::NOT_FOUND, Json(self)).into_response()
    }
}

/// Service description handler.
#[utoipa::path(
    get,
    path = "/",
    tag = "info",
    responses((status = 200, description = "Service description", body = AppInfoResponse))
)]
pub async fn root(State(state): State<AppState>) -> Json<AppInfoResponse> {
    Json(AppInfoResponse {
        message: "Rust CI/CD Demo API",
        version: state.service.version.clone(),
        features: vec![
            "Automated testing with cargo test",
            "Docker containerization",
            "Code quality with rustfmt and Clippy",
            "Security scanning with Trivy",
            "Health monitoring",
            "Auto-generated API documentation",
            "Async performance with Tokio",
        ],
        endpoints: EndpointMap {
            docs: "/docs",
            health: "/health",
            status: "/api/status",
            metrics: "/api/metrics",
            prometheus: "/metrics",
        },
        tech_stack: vec!["Rust", "Tokio", "Axum", "utoipa", "Docker", "GitHub Actions"],
    })
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_rfc3339(),
        uptime: uptime_seconds(state.started_at),
        environment: state.service.environment.clone(),
        rust_version: state.runtime.rust_version.clone(),
    })
}

/// Status handler - returns service identity.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "info",
    responses((status = 200, description = "Service status", body = StatusResponse))
)]
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: state.service.name.clone(),
        status: "running",
        timestamp: now_rfc3339(),
        version: state.service.version.clone(),
        rust_version: state.runtime.rust_version.clone(),
        platform: state.runtime.platform.clone(),
    })
}

/// Runtime metrics as JSON.
#[utoipa::path(
    get,
    path = "/api/metrics",
    tag = "metrics",
    responses((status = 200, description = "Process metrics", body = MetricsResponse))
)]
pub async fn api_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    let uptime = uptime_seconds(state.started_at);
    let worker_threads = tokio::runtime::Handle::try_current()
        .map(|handle| handle.metrics().num_workers())
        .unwrap_or(0);

    Json(MetricsResponse {
        uptime_seconds: uptime,
        uptime_human: format_uptime(uptime),
        requests_total: state.requests_total(),
        runtime_info: RuntimeMetrics {
            version: state.runtime.rust_version.clone(),
            platform: state.runtime.platform.clone(),
            architecture: state.runtime.architecture.clone(),
            worker_threads,
        },
    })
}

/// Prometheus exposition - 503 when no recorder is installed.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "metrics",
    responses(
        (status = 200, description = "Prometheus text format", body = String, content_type = "text/plain"),
        (status = 503, description = "Metrics recorder not installed")
    )
)]
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "metrics recorder not installed\n".to_string(),
        ),
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> NotFoundResponse {
    NotFoundResponse {
        detail: NotFoundDetail {
            error: "Endpoint not found",
            available_endpoints: AVAILABLE_ENDPOINTS.to_vec(),
            documentation: "/docs",
        },
    }
}
