//! Handshake Authentication
//!
//! Verifies the identity carried in the WebSocket handshake. The
//! credential is a signed JWT in a cookie named `token`; no query-string
//! or header-based credential is accepted. Runs exactly once, at
//! connection-open time.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::error::AuthError;

/// Name of the handshake cookie carrying the credential.
pub const TOKEN_COOKIE: &str = "token";

/// JWT claims for handshake validation
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Extract and verify the user identity from handshake headers.
///
/// Rejections close the connection attempt; the server never retries.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<i64, AuthError> {
    let jar = CookieJar::from_headers(headers);
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .ok_or(AuthError::MissingToken)?;

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AuthError::InvalidIdentity)
}
