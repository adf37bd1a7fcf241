//! # Metrics Module
//!
//! Prometheus metrics for monitoring the webservice, organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup, registration and text encoding
//! - `webservice_metrics` - Admission checks, decryption failures, key loads and encryptions

pub mod registry;
pub mod webservice_metrics;

pub use registry::*;
pub use webservice_metrics::*;
