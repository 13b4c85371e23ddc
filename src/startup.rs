//! Application Startup
//!
//! Application building and server initialization. The registry,
//! dispatcher and supervisor are owned here rather than living as
//! process-wide globals, so the composition root controls their full
//! lifecycle: empty registry on start, supervisor cancelled and entries
//! dropped on shutdown.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use crate::config::Settings;
use crate::gateway::registry::ConnectionRegistry;
use crate::gateway::supervisor::{self, SupervisorHandle};
use crate::gateway::PushDispatcher;
use crate::http::{health, routes};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub dispatcher: PushDispatcher,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
    registry: Arc<ConnectionRegistry>,
    supervisor: SupervisorHandle,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        // Connection registry and the fan-out handle over it
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = PushDispatcher::new(registry.clone());

        // Start the liveness probe loop
        let supervisor =
            supervisor::spawn(registry.clone(), settings.websocket.heartbeat_interval());

        // Create app state
        let state = AppState {
            registry: registry.clone(),
            dispatcher,
            settings: Arc::new(settings.clone()),
        };

        let router = routes::create_router(state);

        // Bind to address
        let addr: SocketAddr = settings.server_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self {
            listener,
            router,
            registry,
            supervisor,
        })
    }

    /// Run the server until stopped, then tear the gateway down.
    pub async fn run_until_stopped(self) -> Result<()> {
        let Self {
            listener,
            router,
            registry,
            supervisor,
        } = self;

        let server = axum::serve(listener, router).into_future();
        tokio::select! {
            result = server => result?,
            _ = shutdown_signal() => {
                tracing::info!("Shutdown signal received");
            }
        }

        // Cancel the probe timer exactly once, then drop every entry.
        supervisor.shutdown();
        registry.clear();
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
