//! # TrustScan Common Library
//!
//! Shared code for the TrustScan workspace:
//! - Error type used by configuration loading
//! - TOML configuration file model and location rules
//! - Event types (TrustScanEvent enum) and the broadcast EventBus

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
