//! Observability metrics for the acquisition pipeline
//!
//! Counters and histograms are emitted from the pipeline with the
//! `metrics` crate facade; this module owns the exporter setup and the
//! metric descriptions. Emission is safe before initialization: with no
//! recorder installed the macros are no-ops, so library users who never
//! call [`init_metrics`] pay nothing.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

static METRICS_INITIALIZED: Lazy<Arc<RwLock<bool>>> = Lazy::new(|| Arc::new(RwLock::new(false)));

/// Install the Prometheus exporter and register metric descriptions.
///
/// Idempotent: the second and later calls are no-ops.
///
/// # Arguments
/// * `addr` - Socket address for the Prometheus scrape endpoint
pub async fn init_metrics(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let mut initialized = METRICS_INITIALIZED.write().await;
    if *initialized {
        debug!("metrics already initialized, skipping");
        return Ok(());
    }

    info!("initializing metrics system on {}", addr);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("failed to install Prometheus exporter: {e}"))?;

    describe_metrics();

    *initialized = true;
    info!("metrics system initialized on {}", addr);
    Ok(())
}

/// Register descriptions for every metric the pipeline emits.
pub fn describe_metrics() {
    describe_counter!(
        "trend_fetch_attempts_total",
        Unit::Count,
        "Download pipeline runs that went to the network, by acquisition path"
    );

    describe_histogram!(
        "trend_fetch_duration_seconds",
        Unit::Seconds,
        "Fetch-and-parse duration for uncached requests, by acquisition path"
    );

    describe_counter!(
        "trend_fetch_retries_total",
        Unit::Count,
        "Retry attempts scheduled after transport failures"
    );

    describe_counter!(
        "trend_rate_limit_hits_total",
        Unit::Count,
        "Rate-limit signals observed, over status line or payload"
    );

    describe_counter!(
        "trend_cache_hits_total",
        Unit::Count,
        "Requests answered from the result cache"
    );

    describe_counter!(
        "trend_cache_misses_total",
        Unit::Count,
        "Cache lookups that missed or found an expired entry"
    );

    describe_counter!(
        "trend_batch_slots_total",
        Unit::Count,
        "Finished batch slots, by outcome"
    );
}

/// Whether the exporter has been installed.
pub async fn is_initialized() -> bool {
    *METRICS_INITIALIZED.read().await
}
