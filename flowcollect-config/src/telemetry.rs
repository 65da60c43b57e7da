//! Observability configuration.
//!
//! Parameters for logging and the decode path counters.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

/// Telemetry configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct TelemetryConfig {
    /// `tracing` filter directives used when `RUST_LOG` is not set.
    #[validate(custom(function = validation::validate_log_filter))]
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Dump Prometheus counters to stderr when the collector exits.
    #[serde(default)]
    pub print_metrics: bool,
}

fn default_log_filter() -> String {
    "info".into()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            print_metrics: false,
        }
    }
}
