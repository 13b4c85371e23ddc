//! Configuration Management

pub mod settings;

pub use settings::{JwtSettings, ServerSettings, Settings, WebSocketSettings};
