//! HTTP server for the payroll engine.
//!
//! Reads `PAYROLL_CONFIG` (default `./config/default.yaml`) for the default
//! payroll configuration and listens on `PAYROLL_ADDR` (default
//! `0.0.0.0:3000`). Log verbosity follows `RUST_LOG`.

use std::env;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_PATH: &str = "./config/default.yaml";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = env::var("PAYROLL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    // A missing file falls back to defaults; a malformed one stops startup.
    let loader = ConfigLoader::load_or_default(&config_path).inspect_err(|err| {
        error!(path = %config_path, error = %err, "Invalid payroll configuration");
    })?;
    info!(path = %config_path, "Payroll configuration ready");

    let app = create_router(AppState::new(loader));

    let addr = env::var("PAYROLL_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Payroll engine listening");
    axum::serve(listener, app).await?;

    Ok(())
}
