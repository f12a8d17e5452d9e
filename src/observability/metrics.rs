//! # Metrics
//!
//! Prometheus metrics for the lifecycle waiters.
//!
//! ## Metrics Exposed
//!
//! - `secrets_lifecycle_polls_total` - Remote polls issued by waiters, by operation
//! - `secrets_lifecycle_wait_outcomes_total` - How each wait ended, by operation and outcome
//! - `secrets_lifecycle_wait_duration_seconds` - Wall-clock duration of each wait, by operation
//! - `secrets_lifecycle_version_purges_total` - Version payload purges issued
//! - `secrets_lifecycle_force_deletes_total` - Forced secret deletions issued

use anyhow::Result;
use prometheus::{HistogramVec, IntCounter, IntCounterVec, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static POLLS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secrets_lifecycle_polls_total",
            "Total number of remote polls issued by lifecycle waiters",
        ),
        &["operation"],
    )
    .expect("Failed to create POLLS_TOTAL metric - this should never happen")
});

static WAIT_OUTCOMES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secrets_lifecycle_wait_outcomes_total",
            "Total number of finished waits by operation and outcome",
        ),
        &["operation", "outcome"],
    )
    .expect("Failed to create WAIT_OUTCOMES_TOTAL metric - this should never happen")
});

static WAIT_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "secrets_lifecycle_wait_duration_seconds",
            "Duration of lifecycle waits in seconds by operation",
        )
        .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1200.0]),
        &["operation"],
    )
    .expect("Failed to create WAIT_DURATION metric - this should never happen")
});

static VERSION_PURGES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secrets_lifecycle_version_purges_total",
        "Total number of version payload purges issued",
    )
    .expect("Failed to create VERSION_PURGES_TOTAL metric - this should never happen")
});

static FORCE_DELETES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secrets_lifecycle_force_deletes_total",
        "Total number of forced secret deletions issued",
    )
    .expect("Failed to create FORCE_DELETES_TOTAL metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Fails only if a metric is already registered"
)]
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(POLLS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(WAIT_OUTCOMES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(WAIT_DURATION.clone()))?;
    REGISTRY.register(Box::new(VERSION_PURGES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(FORCE_DELETES_TOTAL.clone()))?;

    Ok(())
}

/// Registry holding the lifecycle metrics, for exposition by the caller
#[must_use]
pub fn registry() -> &'static Registry {
    &REGISTRY
}

pub fn increment_polls(operation: &str) {
    POLLS_TOTAL.with_label_values(&[operation]).inc();
}

pub fn record_wait_outcome(operation: &str, outcome: &str, duration: f64) {
    WAIT_OUTCOMES_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    WAIT_DURATION.with_label_values(&[operation]).observe(duration);
}

pub fn increment_version_purges() {
    VERSION_PURGES_TOTAL.inc();
}

pub fn increment_force_deletes() {
    FORCE_DELETES_TOTAL.inc();
}
