//! Connection Registry
//!
//! In-memory mapping from user id to that user's live WebSocket
//! connections. A user may hold several entries at once (one per
//! tab/device); the key for a user exists exactly as long as at least
//! one entry does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Frames pushed through a connection's outbound channel.
///
/// The socket task is the only writer on the underlying transport, so
/// everything that must reach the wire (events, probes, termination)
/// goes through here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A pre-serialized push payload.
    Event(String),
    /// Liveness probe.
    Ping,
    /// Close the transport. Sent when a connection misses two
    /// consecutive probe rounds.
    Terminate,
}

/// One live WebSocket connection for one user.
#[derive(Debug)]
pub struct ConnectionEntry {
    session_id: Uuid,
    user_id: i64,
    /// Cleared at the start of each probe round, set again by pong receipt.
    alive: AtomicBool,
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ConnectionEntry {
    pub fn new(session_id: Uuid, user_id: i64, sender: mpsc::UnboundedSender<Outbound>) -> Self {
        Self {
            session_id,
            user_id,
            alive: AtomicBool::new(true),
            sender,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Record a heartbeat acknowledgment. The pong handler is the only
    /// caller that flips a connection back to alive.
    pub fn mark_alive(&self) {
        self.alive.store(true, Ordering::Relaxed);
    }

    /// Clear the liveness flag for a new probe round, returning whether
    /// the connection acknowledged the previous one.
    pub fn begin_probe(&self) -> bool {
        self.alive.swap(false, Ordering::Relaxed)
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Queue a frame for the socket task. Fails only when the socket
    /// task is already gone.
    pub fn send(&self, frame: Outbound) -> Result<(), mpsc::error::SendError<Outbound>> {
        self.sender.send(frame)
    }
}

/// Registry of active connections per user id. Thread-safe; shared via `Arc`.
///
/// Mutated from exactly three call sites: connect-success, the socket
/// close path, and the liveness supervisor's dead-channel fallback.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<i64, Vec<Arc<ConnectionEntry>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Insert an entry under its user id, creating the set if absent.
    pub fn add(&self, entry: Arc<ConnectionEntry>) {
        self.connections
            .entry(entry.user_id())
            .or_default()
            .push(entry.clone());

        tracing::info!(
            user_id = entry.user_id(),
            session_id = %entry.session_id(),
            "connection registered"
        );
    }

    /// Remove a single connection. Idempotent: the close path and the
    /// supervisor can race to remove the same entry.
    pub fn remove(&self, user_id: i64, session_id: Uuid) {
        let removed = match self.connections.get_mut(&user_id) {
            Some(mut entries) => {
                let before = entries.len();
                entries.retain(|e| e.session_id() != session_id);
                before != entries.len()
            }
            None => return,
        };
        // Guard dropped above; drop the key if the set emptied out.
        self.connections.remove_if(&user_id, |_, entries| entries.is_empty());

        if removed {
            tracing::info!(user_id, %session_id, "connection unregistered");
        }
    }

    /// Snapshot of a user's entries. Returns an owned `Vec` so callers
    /// can iterate while the registry keeps mutating underneath.
    pub fn get(&self, user_id: i64) -> Vec<Arc<ConnectionEntry>> {
        self.connections
            .get(&user_id)
            .map(|entries| entries.value().clone())
            .unwrap_or_default()
    }

    /// Snapshot of every tracked entry, for probe rounds.
    pub fn entries(&self) -> Vec<Arc<ConnectionEntry>> {
        self.connections
            .iter()
            .flat_map(|entries| entries.value().clone())
            .collect()
    }

    pub fn contains_user(&self, user_id: i64) -> bool {
        self.connections.contains_key(&user_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections
            .iter()
            .map(|entries| entries.value().len())
            .sum()
    }

    pub fn user_count(&self) -> usize {
        self.connections.len()
    }

    /// Drop every entry. Called once at server teardown.
    pub fn clear(&self) {
        self.connections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user_id: i64) -> (Arc<ConnectionEntry>, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(ConnectionEntry::new(Uuid::new_v4(), user_id, tx)), rx)
    }

    #[test]
    fn key_exists_iff_set_non_empty() {
        let registry = ConnectionRegistry::new();
        let (a1, _rx1) = entry(5);
        let (a2, _rx2) = entry(5);

        assert!(!registry.contains_user(5));

        registry.add(a1.clone());
        registry.add(a2.clone());
        assert!(registry.contains_user(5));
        assert_eq!(registry.get(5).len(), 2);

        registry.remove(5, a1.session_id());
        assert!(registry.contains_user(5));
        assert_eq!(registry.get(5).len(), 1);

        registry.remove(5, a2.session_id());
        assert!(!registry.contains_user(5));
        assert!(registry.get(5).is_empty());
        assert_eq!(registry.user_count(), 0);
    }

    #[test]
    fn invariant_holds_across_add_remove_add() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = entry(7);
        registry.add(a.clone());
        registry.remove(7, a.session_id());
        assert!(!registry.contains_user(7));

        let (b, _rx_b) = entry(7);
        registry.add(b.clone());
        assert!(registry.contains_user(7));
        assert_eq!(registry.get(7).len(), 1);
    }

    #[test]
    fn removal_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (a, _rx) = entry(5);
        registry.add(a.clone());

        registry.remove(5, a.session_id());
        registry.remove(5, a.session_id());
        assert!(!registry.contains_user(5));

        // Removing under an id that was never present is also a no-op.
        registry.remove(999, Uuid::new_v4());
        assert_eq!(registry.user_count(), 0);
    }

    #[test]
    fn removing_one_tab_keeps_the_other() {
        let registry = ConnectionRegistry::new();
        let (a1, _rx1) = entry(5);
        let (a2, _rx2) = entry(5);
        registry.add(a1.clone());
        registry.add(a2.clone());

        registry.remove(5, a1.session_id());

        let remaining = registry.get(5);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].session_id(), a2.session_id());
    }

    #[test]
    fn get_returns_a_snapshot() {
        let registry = ConnectionRegistry::new();
        let (a, _rx) = entry(5);
        registry.add(a.clone());

        let snapshot = registry.get(5);
        registry.remove(5, a.session_id());

        // The snapshot taken before removal is unaffected.
        assert_eq!(snapshot.len(), 1);
        assert!(registry.get(5).is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = entry(1);
        let (b, _rx_b) = entry(2);
        registry.add(a);
        registry.add(b);

        registry.clear();
        assert_eq!(registry.connection_count(), 0);
        assert_eq!(registry.user_count(), 0);
    }
}
