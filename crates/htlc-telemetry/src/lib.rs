//! # HTLC Telemetry
//!
//! Structured logging for processes embedding `htlc-core`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use htlc_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `htlc-client` | Service name |
//! | `HTLC_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `HTLC_JSON_LOGS` | `false` | JSON output |
//! | `HTLC_CONSOLE_OUTPUT` | `true` | Write to stdout |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Filter directive could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A global subscriber is already installed.
    #[error("Subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}
