//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use realtime_gateway::config::{JwtSettings, ServerSettings, Settings, WebSocketSettings};
use realtime_gateway::gateway::{ConnectionEntry, ConnectionRegistry, Outbound, PushDispatcher};
use realtime_gateway::http::create_router;
use realtime_gateway::startup::AppState;

/// Settings fixture; never read from the environment so tests stay
/// hermetic.
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        jwt: JwtSettings {
            secret: "integration-test-signing-secret-0123".to_string(),
        },
        websocket: WebSocketSettings {
            max_message_size: 65536,
            max_frame_size: 16384,
            heartbeat_interval_secs: 30,
        },
        environment: "test".to_string(),
    }
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub registry: Arc<ConnectionRegistry>,
}

impl TestApp {
    /// Create a test application around a fresh registry. No listener
    /// is bound and no supervisor runs; requests are driven through the
    /// router directly.
    pub fn new() -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = PushDispatcher::new(registry.clone());
        let state = AppState {
            registry: registry.clone(),
            dispatcher,
            settings: Arc::new(test_settings()),
        };

        Self {
            router: create_router(state),
            registry,
        }
    }

    /// Attach a fake connection for `user_id`, returning the receiving
    /// end the socket task would normally drain.
    pub fn register_connection(
        &self,
        user_id: i64,
    ) -> (Arc<ConnectionEntry>, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let entry = Arc::new(ConnectionEntry::new(Uuid::new_v4(), user_id, tx));
        self.registry.add(entry.clone());
        (entry, rx)
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Read a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as a string.
pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
