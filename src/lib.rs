//! Minimal health/status HTTP service wrapped in a CI/CD pipeline.
//!
//! The service answers a handful of read-only JSON endpoints:
//!
//! ```text
//! GET /             service description
//! GET /health       liveness, uptime, environment
//! GET /api/status   name, version, platform
//! GET /api/metrics  uptime and request counters as JSON
//! GET /metrics      Prometheus exposition
//! GET /docs         Swagger UI
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`service`]: Service and runtime metadata, uptime helpers
//! - [`metrics`]: Prometheus request metrics
//! - [`api`]: HTTP handlers, routes and OpenAPI document
//! - [`probe`]: Container health probe client
//! - [`utils`]: Logging setup and shutdown signal

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod probe;
pub mod service;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError};
