//! Gateway Error Types
//!
//! The only errors this subsystem surfaces are handshake rejections.
//! Everything past the handshake is best-effort: per-connection delivery
//! failures and missed probes are logged and handled in place, never
//! propagated to event producers.

/// Reasons a handshake is refused. Each closes the connection attempt
/// with a policy-violation status; the client reconnects with a fresh
/// credential.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no token cookie in handshake")]
    MissingToken,

    #[error("token verification failed: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token carries no usable identity claim")]
    InvalidIdentity,
}
