//! OpenAPI document served behind the Swagger UI.

use utoipa::OpenApi;

use super::handlers::{
    self, AppInfoResponse, EndpointMap, HealthResponse, MetricsResponse, NotFoundDetail,
    NotFoundResponse, RuntimeMetrics, StatusResponse,
};

/// Where the JSON schema is served.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Where the Swagger UI is mounted.
pub const SWAGGER_UI_PATH: &str = "/docs";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CI/CD Demo API",
        description = "Minimal Rust service showcasing a CI/CD pipeline"
    ),
    paths(
        handlers::root,
        handlers::health,
        handlers::status,
        handlers::api_metrics,
        handlers::prometheus_metrics,
    ),
    components(schemas(
        AppInfoResponse,
        EndpointMap,
        HealthResponse,
        StatusResponse,
        MetricsResponse,
        RuntimeMetrics,
        NotFoundResponse,
        NotFoundDetail,
    )),
    tags(
        (name = "info", description = "Service description and status"),
        (name = "health", description = "Liveness probe"),
        (name = "metrics", description = "Runtime metrics"),
    )
)]
pub struct ApiDoc;

/// Pretty-printed OpenAPI JSON.
pub fn openapi_json() -> crate::Result<String> {
    Ok(ApiDoc::openapi().to_pretty_json()?)
}
