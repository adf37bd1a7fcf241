//! # Runtime Module
//!
//! Startup of the webservice: tracing, metrics, configuration and server state.

pub mod initialization;

pub use initialization::*;
