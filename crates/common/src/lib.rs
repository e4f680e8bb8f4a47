//! VoltQA Common Library
//!
//! Shared plumbing for the E2E harness: suite configuration, error types,
//! and the bounded-wait primitive every interaction helper is built on.

pub mod config;
pub mod error;
pub mod poll;

// Re-export commonly used types
pub use config::{DriverConfig, PageConfig, SuiteConfig, WaitConfig};
pub use error::{Error, Result};
pub use poll::{poll_until, Elapsed};

/// VoltQA version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
