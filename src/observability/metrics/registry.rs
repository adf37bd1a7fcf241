//! # Metrics Registry
//!
//! Prometheus metrics registry setup and registration.

use anyhow::Result;
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::LazyLock;

/// Global Prometheus metrics registry
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Register all metrics with the Prometheus registry
///
/// Fails if called more than once per process.
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    super::webservice_metrics::register_webservice_metrics()?;
    Ok(())
}

/// Encode all registered metrics in the Prometheus text format
#[allow(
    clippy::missing_errors_doc,
    reason = "Encoding into an in-memory buffer only fails on invalid metric data"
)]
pub fn gather_metrics() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_metrics_are_gathered() {
        register_metrics().expect("metrics should register once");
        crate::observability::metrics::increment_key_loads("success");

        let text = gather_metrics().expect("metrics should encode");
        assert!(text.contains("paas_webservice_key_loads_total{result=\"success\"}"));
    }
}
