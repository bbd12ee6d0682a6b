//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.azclean/config.toml`
//! 3. **Project config** - `./.azclean/config.toml`
//! 4. **CLI arguments** - Positional arguments (highest priority)

use crate::config::types::{AzcleanConfig, CleanupSettings, ProviderSettings};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::Path;
use tracing::debug;

const CONFIG_DIR: &str = ".azclean";
const CONFIG_FILE: &str = "config.toml";

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed, or
/// if validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<AzcleanConfig, ConfigError> {
    let user_dir = dirs::home_dir().map(|home| home.join(CONFIG_DIR));
    let project_dir = std::env::current_dir()
        .map_err(|e| ConfigError::ConfigReadError {
            path: ".".to_string(),
            source: e,
        })?
        .join(CONFIG_DIR);

    load_hierarchy_from(user_dir.as_deref(), &project_dir)
}

/// Load and merge the config files found in the given directories.
pub fn load_hierarchy_from(
    user_dir: Option<&Path>,
    project_dir: &Path,
) -> Result<AzcleanConfig, ConfigError> {
    let mut config = AzcleanConfig::default();

    if let Some(user_dir) = user_dir {
        match load_config_file(&user_dir.join(CONFIG_FILE)) {
            Ok(user_config) => config = merge_configs(config, user_config),
            Err(e) if !e.is_not_found() => return Err(e),
            Err(_) => {}
        }
    }

    match load_config_file(&project_dir.join(CONFIG_FILE)) {
        Ok(project_config) => config = merge_configs(config, project_config),
        Err(e) if !e.is_not_found() => return Err(e),
        Err(_) => {}
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<AzcleanConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ConfigReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let config: AzcleanConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    debug!(
        event = "core.config.file_loaded",
        path = %path.display()
    );

    Ok(config)
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional fields are replaced only when the override sets them. A prefix
/// list in the override replaces the base list entirely.
pub fn merge_configs(base: AzcleanConfig, override_config: AzcleanConfig) -> AzcleanConfig {
    AzcleanConfig {
        cleanup: CleanupSettings {
            persist_prefixes: override_config
                .cleanup
                .persist_prefixes
                .or(base.cleanup.persist_prefixes),
            fail_on_container_errors: override_config
                .cleanup
                .fail_on_container_errors
                .or(base.cleanup.fail_on_container_errors),
        },
        provider: ProviderSettings {
            request_timeout_secs: override_config
                .provider
                .request_timeout_secs
                .or(base.provider.request_timeout_secs),
            operation_timeout_secs: override_config
                .provider
                .operation_timeout_secs
                .or(base.provider.operation_timeout_secs),
        },
    }
}
