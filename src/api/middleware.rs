//! Request accounting middleware.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::trace;

use super::handlers::AppState;
use crate::metrics;

/// Label used for requests that matched no route.
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// Count the request and record its latency under the matched route.
///
/// The request counter is bumped before the handler runs so `/api/metrics`
/// includes the request that asked for it.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_string());

    let seen = state.record_request();
    let response = next.run(req).await;
    let status = response.status().as_u16();

    metrics::record_request(&method, &endpoint, status, start);
    trace!(%method, %endpoint, status, seen, "request served");

    response
}
