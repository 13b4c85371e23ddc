//! Realtime Gateway
//!
//! Server-initiated push over WebSocket: connection registry,
//! handshake authentication, liveness supervision and event fan-out.

pub mod auth;
pub mod dispatcher;
pub mod events;
pub mod handler;
pub mod registry;
pub mod supervisor;

pub use dispatcher::PushDispatcher;
pub use events::{PushEvent, UnreadCount};
pub use handler::ws_handler;
pub use registry::{ConnectionEntry, ConnectionRegistry, Outbound};
pub use supervisor::SupervisorHandle;
