//! Structured logging.
//!
//! JSON to stdout by default, pretty output for local development.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `config.log_level`. Fails if a subscriber is
/// already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let output = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Standard log event names.
pub mod events {
    /// Server is starting up.
    pub const STARTUP: &str = "startup";

    /// Server is shutting down.
    pub const SHUTDOWN: &str = "shutdown";

    /// Server is listening on a port.
    pub const LISTENING: &str = "listening";

    /// A spec file has been loaded.
    pub const SPEC_DISCOVERED: &str = "spec_discovered";

    /// Spec discovery finished and the docs UI is available.
    pub const DOCS_INITIALIZED: &str = "docs_initialized";

    /// Spec discovery failed; the docs path answers 500.
    pub const DOCS_UNAVAILABLE: &str = "docs_unavailable";

    /// A request has been answered.
    pub const REQUEST_SERVED: &str = "request_served";
}

/// Helper macros for structured logging with standard fields.
///
/// These wrap the tracing macros to ensure consistent field naming.
#[macro_export]
macro_rules! log_startup {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::STARTUP,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_shutdown {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::SHUTDOWN,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_listening {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::LISTENING,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_spec_discovered {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::SPEC_DISCOVERED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_docs_initialized {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::DOCS_INITIALIZED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_docs_unavailable {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::DOCS_UNAVAILABLE,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_request_served {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::REQUEST_SERVED,
            $($field)*
        )
    };
}
