//! Push Dispatcher
//!
//! The single entry point by which event producers deliver a payload to
//! all of a user's live connections. Fire-and-forget: producers have
//! already completed their durable write and never observe the delivery
//! outcome.

use std::sync::Arc;

use crate::gateway::events::PushEvent;
use crate::gateway::registry::{ConnectionRegistry, Outbound};
use crate::metrics;

/// Cheaply cloneable handle for fanning events out to one user.
#[derive(Clone)]
pub struct PushDispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl PushDispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Best-effort delivery of `event` to every live connection of
    /// `user_id`.
    ///
    /// A user with no live connections is an expected, silent case. The
    /// payload is serialized once; a failed send to one connection is
    /// logged and does not affect its siblings. Never returns an error
    /// to the caller.
    pub fn send_to_user(&self, user_id: i64, event: &PushEvent) {
        let entries = self.registry.get(user_id);
        if entries.is_empty() {
            metrics::record_push(event.kind(), "offline");
            return;
        }

        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(user_id, kind = event.kind(), "failed to serialize push event: {}", e);
                return;
            }
        };

        for entry in entries {
            match entry.send(Outbound::Event(payload.clone())) {
                Ok(()) => metrics::record_push(event.kind(), "delivered"),
                Err(e) => {
                    tracing::debug!(
                        user_id,
                        session_id = %entry.session_id(),
                        kind = event.kind(),
                        "push delivery failed: {}",
                        e
                    );
                    metrics::record_push(event.kind(), "failed");
                }
            }
        }
    }
}
