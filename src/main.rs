//! # Realtime Gateway
//!
//! Real-time WebSocket notification gateway for a vehicle-rental
//! marketplace.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Connection registry and liveness supervisor
//! - HTTP/WebSocket server

use anyhow::Result;
use tracing::info;

use realtime_gateway::config::Settings;
use realtime_gateway::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    realtime_gateway::telemetry::init_tracing();

    info!("Starting Realtime Gateway...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Gateway ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
