//! # flowcollect Configuration System
//!
//! Layered configuration for the flow collector.
//!
//! ## Features
//! - **Layering**: defaults, then a YAML file, then `FLOWCOLLECT_*` environment variables
//! - **Validation**: every section is checked with `validator` after extraction

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod input;
mod interfaces;
mod output;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use input::InputConfig;
pub use interfaces::{InterfaceConfig, InterfaceFallback, InterfaceName};
pub use output::OutputConfig;
pub use telemetry::TelemetryConfig;

/// Default location of the collector configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/flowcollect.yaml";

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "FLOWCOLLECT_";

/// Top‑level configuration container for the collector.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct CollectorConfig {
    /// Where raw records are read from.
    #[validate(nested)]
    #[serde(default)]
    pub input: InputConfig,

    /// Interface index to name resolution.
    #[validate(nested)]
    #[serde(default)]
    pub interfaces: InterfaceConfig,

    /// JSON output settings.
    #[validate(nested)]
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl CollectorConfig {
    /// Load configuration from the default file and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/flowcollect.yaml`, if present
    /// 3. `FLOWCOLLECT_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(CollectorConfig::default()));

        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            figment = figment.merge(Yaml::file(DEFAULT_CONFIG_PATH));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file, still honouring the environment.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::extract(
            Figment::from(Serialized::defaults(CollectorConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
