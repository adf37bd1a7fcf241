//! # Observability
//!
//! Prometheus metrics for the webservice.

pub mod metrics;
