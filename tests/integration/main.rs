//! End-to-end tests against a real listener on an ephemeral port.

use std::net::SocketAddr;
use std::time::Duration;

use cicd_demo_api::api::{create_router, AppState};
use cicd_demo_api::config::Config;
use cicd_demo_api::probe::check_health;
use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tokio::net::TcpListener;

/// Spawn the router on 127.0.0.1:0 and return its address.
async fn spawn_server(config: Config) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = create_router(AppState::from_config(&config));

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn concurrent_health_requests_succeed() {
    let addr = spawn_server(Config::default()).await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/health");

    let responses = join_all((0..10).map(|_| client.get(&url).send())).await;

    for response in responses {
        let response = response.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
    }
}

#[tokio::test]
async fn probe_succeeds_once_listening() {
    let addr = spawn_server(Config::default()).await;
    let url = format!("http://{addr}/health");

    let status = check_health(&url, Duration::from_secs(2)).await.unwrap();
    assert_eq!(status, "healthy");
}

#[tokio::test]
async fn probe_rejects_non_health_endpoint() {
    let addr = spawn_server(Config::default()).await;
    let url = format!("http://{addr}/missing");

    assert!(check_health(&url, Duration::from_secs(2)).await.is_err());
}

#[tokio::test]
async fn uptime_grows_between_requests() {
    let config = Config {
        environment: "test".to_string(),
        ..Config::default()
    };
    let addr = spawn_server(config).await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/health");

    let first: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second: Value = client.get(&url).send().await.unwrap().json().await.unwrap();

    assert_eq!(first["environment"], "test");
    assert!(second["uptime"].as_f64().unwrap() > first["uptime"].as_f64().unwrap());
}

#[tokio::test]
async fn status_is_stable_across_calls() {
    let addr = spawn_server(Config::default()).await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/api/status");

    let mut seen = Vec::new();
    for _ in 0..3 {
        let mut body: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
        body.as_object_mut().unwrap().remove("timestamp");
        seen.push(body);
    }

    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[1], seen[2]);
    assert_eq!(seen[0]["version"], "1.0.0");
}
