//! CI/CD demo API entry point.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use cicd_demo_api::api::{create_router, openapi_json, AppState};
use cicd_demo_api::config::Config;
use cicd_demo_api::metrics;
use cicd_demo_api::probe::{check_health, local_health_url};
use cicd_demo_api::service::{ServiceInfo, SERVICE_NAME};
use cicd_demo_api::utils::{init_logging, shutdown_signal};

/// Minimal health/status API used to demonstrate a CI/CD pipeline.
#[derive(Parser, Debug)]
#[command(name = "cicd-demo-api")]
#[command(about = "Health/status HTTP service wrapped in a CI/CD pipeline")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Listen port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,

    /// Probe /health of a running instance; exit 0 iff healthy.
    Healthcheck {
        /// URL to probe (defaults to the local instance on PORT).
        #[arg(long)]
        url: Option<String>,

        /// Request timeout in seconds.
        #[arg(long, default_value = "3")]
        timeout_secs: u64,
    },

    /// Print the OpenAPI document as JSON.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration; logging still comes up with defaults if it fails
    let config = Config::load();
    let (level, format) = config
        .as_ref()
        .map(|c| (c.log_level, c.log_format))
        .unwrap_or_default();
    init_logging(level, format, args.verbose)?;

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config?),
        Some(Command::Healthcheck { url, timeout_secs }) => {
            let port = config.as_ref().map(|c| c.port).unwrap_or(8000);
            let url = url.unwrap_or_else(|| local_health_url(port));
            cmd_healthcheck(&url, Duration::from_secs(timeout_secs)).await
        }
        Some(Command::Openapi) => {
            println!("{}", openapi_json()?);
            Ok(())
        }
        Some(Command::Serve) | None => cmd_serve(config?, args.port).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CI/CD DEMO API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Resolving bind address... ");
    match config.bind_addr() {
        Ok(addr) => {
            println!("OK");
            println!("  Address: {}", addr);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Bind address invalid"));
        }
    }

    let service = ServiceInfo::from_config(&config);

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Service: {} v{}", service.name, service.version);
    println!("  Environment: {}", service.environment);
    println!("  Log Level: {}", config.log_level);
    println!("  Log Format: {}", config.log_format);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Probe a running instance for the container HEALTHCHECK.
async fn cmd_healthcheck(url: &str, timeout: Duration) -> anyhow::Result<()> {
    match check_health(url, timeout).await {
        Ok(status) => {
            info!("{} is {}", url, status);
            Ok(())
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            Err(e.into())
        }
    }
}

/// Serve the HTTP API until Ctrl-C or SIGTERM.
async fn cmd_serve(mut config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let addr = config.bind_addr()?;

    info!("Configuration loaded successfully");
    info!("Service: {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.environment);

    // Prometheus recorder; the API still serves without it
    let prometheus = match metrics::install_prometheus() {
        Ok(handle) => {
            metrics::spawn_upkeep(handle.clone(), Duration::from_secs(5));
            Some(handle)
        }
        Err(e) => {
            warn!("Prometheus metrics disabled: {}", e);
            None
        }
    };

    let app_state = AppState::from_config(&config).with_prometheus(prometheus);
    let router = create_router(app_state);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        e
    })?;
    info!("HTTP server listening on {}", addr);
    info!("Docs available at http://{}/docs", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
