//! Vigil Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use vigil_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[dispatcher]\nthreads = 4").unwrap();
//! assert_eq!(config.dispatcher.effective_threads(), 4);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [dispatcher]
//! threads = 4
//! queue_capacity = 8192
//!
//! [log]
//! level = "info"
//! format = "console"
//! ```

mod dispatcher;
mod error;
mod logging;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use dispatcher::{DispatcherConfig, DEFAULT_QUEUE_CAPACITY};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker pool and queue sizing
    pub dispatcher: DispatcherConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
