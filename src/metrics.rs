//! Prometheus Metrics Module
//!
//! Application-wide metrics collection.
//!
//! # Metrics Collected
//! - Active WebSocket connection gauge
//! - Push event counts by kind and delivery outcome
//! - Liveness terminations

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active WebSocket connections gauge
pub static CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "websocket_connections_active",
            "Number of active WebSocket connections",
        )
        .namespace("realtime_gateway"),
    )
    .expect("Failed to create CONNECTIONS_ACTIVE metric")
});

/// Push event counter - tracks fan-out attempts by event kind and outcome
pub static PUSH_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("push_events_total", "Total number of push delivery attempts")
            .namespace("realtime_gateway"),
        &["kind", "outcome"], // outcome: "delivered", "failed", "offline"
    )
    .expect("Failed to create PUSH_EVENTS_TOTAL metric")
});

/// Connections closed for missing two consecutive liveness probes
pub static LIVENESS_TERMINATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "liveness_terminations_total",
            "Connections terminated after missed liveness probes",
        )
        .namespace("realtime_gateway"),
    )
    .expect("Failed to create LIVENESS_TERMINATIONS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(PUSH_EVENTS_TOTAL.clone()))
        .expect("Failed to register PUSH_EVENTS_TOTAL");
    registry
        .register(Box::new(LIVENESS_TERMINATIONS_TOTAL.clone()))
        .expect("Failed to register LIVENESS_TERMINATIONS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to record a push delivery attempt
pub fn record_push(kind: &str, outcome: &str) {
    PUSH_EVENTS_TOTAL.with_label_values(&[kind, outcome]).inc();
}

/// Helper to record a liveness termination
pub fn record_termination() {
    LIVENESS_TERMINATIONS_TOTAL.inc();
}

/// Helper to update the active connection gauge
pub fn set_active_connections(count: usize) {
    CONNECTIONS_ACTIVE.set(count as i64);
}
