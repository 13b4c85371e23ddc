//! # Realtime Gateway Library
//!
//! This crate provides the real-time push layer of a vehicle-rental
//! marketplace:
//! - WebSocket endpoint with cookie-credential authentication
//! - Per-user connection registry (multi-tab, multi-device)
//! - Heartbeat-based liveness supervision
//! - Best-effort event fan-out for backend producers
//!
//! ## Module Structure
//!
//! ```text
//! realtime_gateway/
//! +-- config/     Configuration management
//! +-- gateway/    Registry, auth gate, supervisor, dispatcher, handler
//! +-- http/       Routes, health checks, producer endpoint
//! +-- metrics     Prometheus collectors
//! +-- shared/     Common utilities (errors)
//! +-- startup     Application building and state management
//! +-- telemetry   Structured logging setup
//! ```

// Configuration module
pub mod config;

// WebSocket gateway core
pub mod gateway;

// HTTP surface
pub mod http;

// Prometheus metrics
pub mod metrics;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
