//! # SyncBridge Testkit
//!
//! Test utilities for SyncBridge.
//!
//! This crate provides:
//! - [`MockEngine`], a scriptable engine handle
//! - Engine fixtures for common session setups
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use syncbridge_testkit::prelude::*;
//!
//! let engine = connected_engine();
//! let session = SessionManager::new().session(engine.clone());
//! engine.emit_progress(EngineProgressDirection::Upload, 1, 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mock;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::init_tracing;
    pub use crate::mock::*;
}

pub use fixtures::*;
pub use generators::*;
pub use mock::*;

/// Installs a `tracing` subscriber for test output.
///
/// Honors `RUST_LOG`; defaults to `warn`. Safe to call from every test.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
