//! Cross-field configuration validation

use crate::error::{ConfigError, Result};
use crate::Config;

/// Check the invariants the engine cannot run without
pub(crate) fn validate_config(config: &Config) -> Result<()> {
    if config.dispatcher.threads == Some(0) {
        return Err(ConfigError::invalid_value(
            "dispatcher",
            "threads",
            "must be greater than zero",
        ));
    }

    if config.dispatcher.queue_capacity == 0 {
        return Err(ConfigError::invalid_value(
            "dispatcher",
            "queue_capacity",
            "must be greater than zero",
        ));
    }

    Ok(())
}
