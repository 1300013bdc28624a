//! Structured logging to stderr.
//!
//! Stdout belongs to command output, so every layer writes to stderr.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging subsystem.
///
/// `RUST_LOG`, when set, overrides the configured level.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Pretty => init_pretty_logging(filter),
    }
}

fn init_json_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let json_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_file(false)
        .with_line_number(false)
        .flatten_event(true)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

fn init_pretty_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let pretty_layer = fmt::layer()
        .pretty()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(pretty_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

/// Standard log event names.
pub mod events {
    /// A document has been loaded and modelled.
    pub const SPEC_LOADED: &str = "spec_loaded";

    /// A reference has been resolved.
    pub const REFERENCE_RESOLVED: &str = "reference_resolved";

    /// A reference cycle has been found.
    pub const CIRCULAR_REFERENCE: &str = "circular_reference";

    /// Resolving a reference failed.
    pub const RESOLUTION_FAILED: &str = "resolution_failed";
}

/// Helper macros that stamp the standard `event` field.
#[macro_export]
macro_rules! log_spec_loaded {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::SPEC_LOADED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_reference_resolved {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::REFERENCE_RESOLVED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_circular_reference {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::CIRCULAR_REFERENCE,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_resolution_failed {
    ($($field:tt)*) => {
        tracing::error!(
            event = $crate::logging::events::RESOLUTION_FAILED,
            $($field)*
        )
    };
}
