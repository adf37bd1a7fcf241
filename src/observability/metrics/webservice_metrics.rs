//! # Webservice Metrics
//!
//! Metrics for admission checks, secret decryption, key loading and encryption.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{Histogram, IntCounterVec};
use std::sync::LazyLock;

static CHECKS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "paas_webservice_checks_total",
            "Total number of Paas decryption checks by result",
        ),
        &["result"],
    )
    .expect("Failed to create CHECKS_TOTAL metric - this should never happen")
});

static CHECK_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "paas_webservice_check_duration_seconds",
            "Duration of Paas decryption checks in seconds",
        )
        .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
    )
    .expect("Failed to create CHECK_DURATION metric - this should never happen")
});

static DECRYPTION_FAILURES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "paas_webservice_decryption_failures_total",
            "Total number of SSH secrets that could not be decrypted",
        ),
        &["location", "reason"],
    )
    .expect("Failed to create DECRYPTION_FAILURES_TOTAL metric - this should never happen")
});

static KEY_LOADS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "paas_webservice_key_loads_total",
            "Total number of key pair loads by result",
        ),
        &["result"],
    )
    .expect("Failed to create KEY_LOADS_TOTAL metric - this should never happen")
});

static ENCRYPTIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "paas_webservice_encryptions_total",
            "Total number of secrets encrypted through the API by result",
        ),
        &["result"],
    )
    .expect("Failed to create ENCRYPTIONS_TOTAL metric - this should never happen")
});

/// Register webservice metrics with the registry
pub(crate) fn register_webservice_metrics() -> Result<()> {
    REGISTRY.register(Box::new(CHECKS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CHECK_DURATION.clone()))?;
    REGISTRY.register(Box::new(DECRYPTION_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(KEY_LOADS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ENCRYPTIONS_TOTAL.clone()))?;
    Ok(())
}

/// Count a finished check; `result` is `accepted`, `rejected` or `error`
pub fn increment_checks(result: &str) {
    CHECKS_TOTAL.with_label_values(&[result]).inc();
}

pub fn observe_check_duration(duration: f64) {
    CHECK_DURATION.observe(duration);
}

pub fn increment_decryption_failures(location: &str, reason: &str) {
    DECRYPTION_FAILURES_TOTAL
        .with_label_values(&[location, reason])
        .inc();
}

pub fn increment_key_loads(result: &str) {
    KEY_LOADS_TOTAL.with_label_values(&[result]).inc();
}

pub fn increment_encryptions(result: &str) {
    ENCRYPTIONS_TOTAL.with_label_values(&[result]).inc();
}
