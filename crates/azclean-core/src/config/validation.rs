//! Configuration validation.

use crate::config::types::AzcleanConfig;
use crate::errors::ConfigError;

/// Validate a merged configuration.
///
/// Rejects blank persist prefixes (a blank prefix would exempt every
/// resource) and zero timeouts.
pub fn validate_config(config: &AzcleanConfig) -> Result<(), ConfigError> {
    if let Some(prefixes) = &config.cleanup.persist_prefixes
        && let Some(index) = prefixes.iter().position(|p| p.trim().is_empty())
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("cleanup.persist_prefixes[{}] must not be empty", index),
        });
    }

    if config.provider.request_timeout_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "provider.request_timeout_secs must be greater than zero".to_string(),
        });
    }

    if config.provider.operation_timeout_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "provider.operation_timeout_secs must be greater than zero".to_string(),
        });
    }

    Ok(())
}
