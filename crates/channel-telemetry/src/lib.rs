//! # Channel Telemetry
//!
//! Logging bootstrap for processes embedding the transaction manager.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use channel_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     init_logging(&TelemetryConfig::from_env()).expect("logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CL_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directives |
//! | `CL_JSON_LOGS` | `false` | JSON output |
//! | `CL_CONSOLE_OUTPUT` | `true` | Console output |
//! | `CL_SERVICE_NAME` | `channel-ledger` | Service name |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}
