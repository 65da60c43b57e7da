//! # flowcollect Telemetry
//!
//! Crate for logging setup and decode path metrics.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
