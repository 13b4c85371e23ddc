//! Push Event Types
//!
//! Wire payloads delivered to clients, one JSON object per message.

use serde::{Deserialize, Serialize};

/// Out-of-band event pushed to a user's live connections.
///
/// Serializes to `{"type": "<kind>", ...}` with the payload under the
/// field each kind's consumers expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PushEvent {
    /// A chat message was persisted; carries the full message record.
    #[serde(rename = "NEW_MESSAGE")]
    NewMessage { message: serde_json::Value },

    /// The recipient's unread notification count changed.
    #[serde(rename = "NOTIFICATIONS_UNREAD_COUNT")]
    NotificationsUnreadCount { data: UnreadCount },
}

/// Payload of `NOTIFICATIONS_UNREAD_COUNT`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread_count: i64,
}

impl PushEvent {
    /// Event kind string, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            PushEvent::NewMessage { .. } => "NEW_MESSAGE",
            PushEvent::NotificationsUnreadCount { .. } => "NOTIFICATIONS_UNREAD_COUNT",
        }
    }
}
