//! Logging infrastructure for cartograph.
//!
//! Library crates only emit `tracing` events; the binary calls
//! [`init_logging`] once to install a subscriber that writes them to stderr
//! as JSON or as human-readable text.
//!
//! # Usage
//!
//! ```ignore
//! use cartograph_telemetry::{init_logging, LogFormat, TelemetryConfig};
//!
//! let config = TelemetryConfig::new()
//!     .with_log_level("debug")
//!     .with_log_format(LogFormat::Pretty);
//!
//! init_logging(&config)?;
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::{events, init_logging};

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber is already installed, or the filter is invalid.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}
