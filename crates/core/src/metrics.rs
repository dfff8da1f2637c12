//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Feed fetches and sync passes
//! - Normalization (listings kept, skipped)
//! - Catalog inserts and queries

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Feed / Sync Metrics
// =============================================================================

/// Feed fetches total by result.
pub static FEED_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vodo_feed_fetches_total", "Total remote feed fetches"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Sync pass duration in seconds (fetch + normalize + insert).
pub static SYNC_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("vodo_sync_duration_seconds", "Duration of a sync pass")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Normalizer Metrics
// =============================================================================

/// Raw listings turned into or merged into canonical items.
pub static LISTINGS_NORMALIZED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "vodo_listings_normalized_total",
        "Total raw listings accepted by the normalizer",
    )
    .unwrap()
});

/// Raw listings dropped for carrying the excluded quality marker.
pub static LISTINGS_SKIPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "vodo_listings_skipped_total",
        "Total raw listings dropped by the normalizer",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Canonical items inserted into the catalog.
pub static ITEMS_STORED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("vodo_items_stored_total", "Total catalog items inserted").unwrap()
});

/// Catalog page queries by result.
pub static CATALOG_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vodo_catalog_queries_total", "Total catalog page queries"),
        &["result"], // "hit", "empty", "failed"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(FEED_FETCHES.clone()),
        Box::new(SYNC_DURATION.clone()),
        Box::new(LISTINGS_NORMALIZED.clone()),
        Box::new(LISTINGS_SKIPPED.clone()),
        Box::new(ITEMS_STORED.clone()),
        Box::new(CATALOG_QUERIES.clone()),
    ]
}
