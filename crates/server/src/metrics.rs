//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Vodo server:
//! - HTTP request metrics (latency, counts)
//! - Catalog size and sync state (collected dynamically)
//! - Core feed, normalizer and catalog metrics

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use vodo_core::SyncStatus;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "vodo_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vodo_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "vodo_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Items in the catalog after the last completed sync.
pub static CATALOG_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("vodo_catalog_items", "Number of items in the movie catalog").unwrap()
});

/// Sync state (0 = not started, 1 = in flight, 2 = completed, 3 = failed).
pub static SYNC_STATE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "vodo_sync_state",
        "Catalog sync state (0 not started, 1 in flight, 2 completed, 3 failed)",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Catalog
    registry.register(Box::new(CATALOG_ITEMS.clone())).unwrap();
    registry.register(Box::new(SYNC_STATE.clone())).unwrap();

    // Core metrics (feed, normalizer, catalog)
    for metric in vodo_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Reads the sync status only; scraping never starts a sync pass.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    match state.provider().sync_status() {
        SyncStatus::NotStarted => SYNC_STATE.set(0),
        SyncStatus::InFlight => SYNC_STATE.set(1),
        SyncStatus::Completed(report) => {
            SYNC_STATE.set(2);
            CATALOG_ITEMS.set(report.items as i64);
        }
        SyncStatus::Failed { .. } => SYNC_STATE.set(3),
    }
}

/// Normalize a path for metric labels (replace item ids with placeholders).
pub fn normalize_path(path: &str) -> String {
    static IMDB_ID: Lazy<regex_lite::Regex> =
        Lazy::new(|| regex_lite::Regex::new(r"/tt\d+(/|$)").unwrap());
    static NUMERIC: Lazy<regex_lite::Regex> =
        Lazy::new(|| regex_lite::Regex::new(r"/\d+(/|$)").unwrap());

    let result = IMDB_ID.replace_all(path, "/{id}$1");
    let result = NUMERIC.replace_all(&result, "/{id}$1");
    result.to_string()
}
