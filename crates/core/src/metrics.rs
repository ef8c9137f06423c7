//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Pipeline runs and per-stage latency
//! - Upstream source requests (issue tracker, release host)
//! - Generated documents

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// Pipeline runs by final outcome.
pub static PIPELINE_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("relnotes_pipeline_runs_total", "Total pipeline runs"),
        &["source", "outcome"], // outcome: "generated", "clarification", "failed", "policy_violation"
    )
    .unwrap()
});

/// Duration of individual pipeline stages.
pub static STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "relnotes_pipeline_stage_duration_seconds",
            "Duration of pipeline stages",
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["stage"],
    )
    .unwrap()
});

/// Items per generated document.
pub static DOCUMENT_ITEMS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "relnotes_document_items",
            "Number of classified items per generated document",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// Upstream Metrics
// =============================================================================

/// Upstream requests by source, operation and result.
pub static UPSTREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "relnotes_upstream_requests_total",
            "Total requests sent to upstream sources",
        ),
        &["source", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Release lookups that needed the `v`-prefixed tag retry.
pub static TAG_FALLBACKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "relnotes_release_tag_fallbacks_total",
        "Release lookups retried with a v-prefixed tag",
    )
    .unwrap()
});

/// Record one upstream request outcome.
pub fn record_upstream(source: &str, operation: &str, success: bool) {
    UPSTREAM_REQUESTS
        .with_label_values(&[source, operation, if success { "success" } else { "error" }])
        .inc();
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(PIPELINE_RUNS.clone()),
        Box::new(STAGE_DURATION.clone()),
        Box::new(DOCUMENT_ITEMS.clone()),
        Box::new(UPSTREAM_REQUESTS.clone()),
        Box::new(TAG_FALLBACKS.clone()),
    ]
}
