//! Prometheus metrics for the tally server.
//!
//! This module provides:
//! - Cache metrics (hit/miss counts per tier)
//! - Recompute metrics (count, backend pages, capacity units)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metric names as constants for consistency.
pub mod names {
    // Cache metrics
    pub const CACHE_HITS_TOTAL: &str = "tally_cache_hits_total";
    pub const CACHE_MISSES_TOTAL: &str = "tally_cache_misses_total";

    // Recompute metrics
    pub const RECOMPUTES_TOTAL: &str = "tally_recomputes_total";
    pub const BACKEND_PAGES_TOTAL: &str = "tally_backend_pages_total";
    pub const BACKEND_CAPACITY_UNITS: &str = "tally_backend_capacity_units";
}

/// Initialize the Prometheus metrics exporter.
///
/// This should be called once at server startup.
/// Returns `true` if initialization succeeded, `false` if already initialized.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        tracing::debug!("Prometheus metrics already initialized");
        return false;
    }

    // Use install_recorder() for pull-based metrics (we serve /metrics ourselves)
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROMETHEUS_HANDLE.set(handle).is_err() {
                tracing::warn!("Failed to store Prometheus handle (already set)");
                return false;
            }
            tracing::info!("Prometheus metrics initialized");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            false
        }
    }
}

/// Render all metrics in Prometheus text format.
///
/// Returns `None` if metrics were not initialized.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|handle| handle.render())
}

/// Record a snapshot cache hit on the given tier (`"memory"` or `"store"`).
pub fn record_cache_hit(tier: &'static str) {
    counter!(names::CACHE_HITS_TOTAL, "tier" => tier).increment(1);
}

/// Record a miss on both cache tiers.
pub fn record_cache_miss() {
    counter!(names::CACHE_MISSES_TOTAL).increment(1);
}

/// Record a completed recompute with its backend costs.
pub fn record_recompute(user_pages: u32, event_pages: u32, capacity_units: f64) {
    counter!(names::RECOMPUTES_TOTAL).increment(1);
    counter!(names::BACKEND_PAGES_TOTAL, "source" => "users").increment(u64::from(user_pages));
    counter!(names::BACKEND_PAGES_TOTAL, "source" => "events").increment(u64::from(event_pages));
    histogram!(names::BACKEND_CAPACITY_UNITS).record(capacity_units);
}
