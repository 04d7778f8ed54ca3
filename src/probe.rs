//! Container health probe.
//!
//! The runtime image ships without curl, so the binary probes itself:
//! `cicd-demo-api healthcheck` exits 0 only if `/health` answers 200 with
//! `status == "healthy"`.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ProbeError, Result};

/// Subset of the `/health` body the probe inspects.
#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

/// Default URL probed for a given port.
pub fn local_health_url(port: u16) -> String {
    format!("http://127.0.0.1:{port}/health")
}

/// Probe `url` once; `Ok` carries the reported status.
pub async fn check_health(url: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| ProbeError::Request {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ProbeError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProbeError::BadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let body: HealthBody = response.json().await.map_err(|source| ProbeError::Request {
        url: url.to_string(),
        source,
    })?;

    debug!(url, status = %body.status, "health probe answered");

    if body.status != "healthy" {
        return Err(ProbeError::Unhealthy {
            url: url.to_string(),
            reported: body.status,
        }
        .into());
    }

    Ok(body.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    #[test]
    fn local_url_targets_loopback() {
        assert_eq!(local_health_url(8000), "http://127.0.0.1:8000/health");
    }

    #[tokio::test]
    async fn unreachable_port_fails() {
        // Bind then drop to get a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = check_health(&local_health_url(port), Duration::from_secs(2)).await;
        assert!(matches!(
            result,
            Err(ServiceError::Probe(ProbeError::Request { .. }))
        ));
    }
}
