//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// Filter directives (`info`, `transaction_manager=debug`, ...)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Whether to write logs to the console at all
    pub console_output: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "channel-ledger".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            console_output: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CL_SERVICE_NAME`: Service name (default: channel-ledger)
    /// - `CL_LOG_LEVEL` or `RUST_LOG`: Filter directives (default: info)
    /// - `CL_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `CL_CONSOLE_OUTPUT`: Enable console output (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_name: env::var("CL_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: env::var("CL_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: env::var("CL_JSON_LOGS")
                .map(|v| is_enabled(&v))
                .unwrap_or(defaults.json_logs),

            console_output: env::var("CL_CONSOLE_OUTPUT")
                .map(|v| !is_disabled(&v))
                .unwrap_or(defaults.console_output),
        }
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }

    pub fn with_json_logs(mut self, json_logs: bool) -> Self {
        self.json_logs = json_logs;
        self
    }
}

fn is_enabled(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

fn is_disabled(value: &str) -> bool {
    value.eq_ignore_ascii_case("false") || value == "0"
}
