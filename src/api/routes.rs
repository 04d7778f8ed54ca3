//! HTTP API route definitions.

use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::docs::{ApiDoc, OPENAPI_JSON_PATH, SWAGGER_UI_PATH};
use super::handlers::{api_metrics, health, not_found, prometheus_metrics, root, status, AppState};
use super::middleware::track_requests;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        // Health endpoint
        .route("/health", get(health))
        // Status and metrics endpoints
        .route("/api/status", get(status))
        .route("/api/metrics", get(api_metrics))
        .route("/metrics", get(prometheus_metrics))
        // Interactive docs
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::metrics::install_prometheus;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::from_config(&Config::default())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn root_describes_service() {
        let (status, body) = get_json(create_router(test_state()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], "1.0.0");
        assert!(body["message"].is_string());
        assert!(!body["features"].as_array().unwrap().is_empty());
        assert!(!body["tech_stack"].as_array().unwrap().is_empty());
        assert_eq!(body["endpoints"]["health"], "/health");
        assert_eq!(body["endpoints"]["docs"], "/docs");
    }

    #[tokio::test]
    async fn health_endpoint_reports_healthy() {
        let (status, body) = get_json(create_router(test_state()), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
        assert_eq!(body["environment"], "development");
        for field in ["status", "timestamp", "uptime", "environment", "rust_version"] {
            assert!(body.get(field).is_some(), "missing {field}");
        }
    }

    #[tokio::test]
    async fn health_is_repeatable() {
        let app = create_router(test_state());
        for _ in 0..3 {
            let (status, body) = get_json(app.clone(), "/health").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
        }
    }

    #[tokio::test]
    async fn status_endpoint_reports_release() {
        let (status, body) = get_json(create_router(test_state()), "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "cicd-demo-api");
        assert_eq!(body["status"], "running");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        for field in ["service", "status", "timestamp", "version", "rust_version", "platform"] {
            assert!(body.get(field).is_some(), "missing {field}");
        }
    }

    #[tokio::test]
    async fn metrics_endpoint_counts_requests() {
        let app = create_router(test_state());

        let (_, first) = get_json(app.clone(), "/api/metrics").await;
        assert!(first["uptime_seconds"].is_f64());
        assert!(first["uptime_human"].as_str().unwrap().ends_with('s'));
        assert!(first["runtime_info"]["platform"].is_string());
        assert_eq!(first["requests_total"], 1);

        get(app.clone(), "/health").await;
        get(app.clone(), "/does-not-exist").await;

        let (status, second) = get_json(app, "/api/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["requests_total"], 4);
    }

    #[tokio::test]
    async fn prometheus_endpoint_unavailable_without_recorder() {
        let (status, _) = get(create_router(test_state()), "/metrics").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn prometheus_endpoint_renders_request_counter() {
        let handle = install_prometheus().unwrap();
        let app = create_router(test_state().with_prometheus(Some(handle)));

        get(app.clone(), "/api/status").await;
        let (status, body) = get(app, "/metrics").await;
        let text = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(text.contains("http_requests_total"));
        assert!(text.contains("endpoint=\"/api/status\""));
    }

    #[tokio::test]
    async fn docs_are_served() {
        let app = create_router(test_state());

        let (status, _) = get(app.clone(), "/docs").await;
        assert!(status.is_redirection() || status == StatusCode::OK);

        let (status, body) = get(app.clone(), "/docs/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&body).contains("<html"));

        let (status, schema) = get_json(app, "/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(schema["paths"].get("/health").is_some());
    }

    #[tokio::test]
    async fn unknown_route_returns_structured_404() {
        let (status, body) = get_json(create_router(test_state()), "/nonexistent").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"]["error"], "Endpoint not found");
        assert!(body["detail"]["available_endpoints"].is_array());
        assert_eq!(body["detail"]["documentation"], "/docs");
    }
}
