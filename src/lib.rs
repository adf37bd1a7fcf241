//! # Paas Webservice
//!
//! Admission webservice for Paas resources.
//!
//! A Paas carries SSH secrets encrypted with the service's RSA public key. Before
//! a Paas is accepted, the service proves that every secret, at the top level
//! and in every capability, decrypts with its private key.
//!
//! ## Modules
//!
//! - `crd` - the Paas custom resource
//! - `crypt` - RSA cipher handles and their per-Paas cache
//! - `validation` - the all-or-nothing decryption check
//! - `admission` - accept/reject decision for an incoming Paas
//! - `server` - HTTP API, probes and metrics endpoint

pub mod admission;
pub mod config;
pub mod constants;
pub mod crd;
pub mod crypt;
pub mod observability;
pub mod runtime;
pub mod server;
pub mod validation;

// Re-export CRD types for convenience
pub use crd::*;
pub use validation::check_paas;
