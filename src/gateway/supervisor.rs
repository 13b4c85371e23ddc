//! Liveness Supervisor
//!
//! Periodic heartbeat over every tracked connection. Per connection the
//! state machine is `ALIVE -> PROBED -> (pong -> ALIVE | no pong before
//! the next round -> TERMINATED)`, so a connection gets up to two full
//! intervals of grace before it is closed. Termination is per
//! connection; one bad transport never aborts the rest of the round.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::gateway::registry::{ConnectionRegistry, Outbound};
use crate::metrics;

/// Handle to the supervisor's timer task. Cancel once, at shutdown.
pub struct SupervisorHandle {
    task: JoinHandle<()>,
}

impl SupervisorHandle {
    /// Stop all future probe rounds. In-flight sends are unaffected.
    pub fn shutdown(self) {
        self.task.abort();
        tracing::info!("liveness supervisor stopped");
    }
}

/// Spawn the probe loop on the given period.
pub fn spawn(registry: Arc<ConnectionRegistry>, period: Duration) -> SupervisorHandle {
    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        // interval fires immediately; skip the tick at t=0 so every
        // connection gets a full period before its first probe.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            run_probe_round(&registry);
        }
    });

    tracing::info!(period_secs = period.as_secs(), "liveness supervisor started");
    SupervisorHandle { task }
}

/// One probe round over every tracked connection.
///
/// A connection that did not acknowledge the previous round is told to
/// terminate; the socket close path then removes it from the registry.
/// Everything else gets its flag cleared and a fresh ping.
fn run_probe_round(registry: &ConnectionRegistry) {
    for entry in registry.entries() {
        if entry.begin_probe() {
            if let Err(e) = entry.send(Outbound::Ping) {
                // Treated as a missed ack: the flag stays cleared and
                // the connection is a termination candidate next round.
                tracing::debug!(
                    user_id = entry.user_id(),
                    session_id = %entry.session_id(),
                    "liveness probe send failed: {}",
                    e
                );
            }
        } else {
            tracing::info!(
                user_id = entry.user_id(),
                session_id = %entry.session_id(),
                "missed liveness probe, terminating connection"
            );
            metrics::record_termination();
            if entry.send(Outbound::Terminate).is_err() {
                // Socket task already gone; it will never run the close
                // path, so drop the entry here. Removal is idempotent.
                registry.remove(entry.user_id(), entry.session_id());
            }
        }
    }
}
