//! Logging infrastructure for scalar-docs.
//!
//! This crate provides:
//! - Structured JSON (or pretty) logging via `tracing-subscriber`
//! - Standard event names and `log_*!` macros shared by the other crates
//!
//! # Usage
//!
//! ```ignore
//! use scalar_docs_telemetry::{LogFormat, TelemetryConfig};
//!
//! let config = TelemetryConfig {
//!     log_level: "debug".into(),
//!     log_format: LogFormat::Pretty,
//! };
//!
//! scalar_docs_telemetry::init_logging(&config)?;
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::{events, init_logging};

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}
