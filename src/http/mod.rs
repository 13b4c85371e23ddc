//! HTTP Surface
//!
//! Routes, health checks and the internal producer endpoint.

pub mod health;
pub mod push;
pub mod routes;

pub use routes::create_router;
