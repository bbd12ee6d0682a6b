//! Configuration type definitions for azclean.
//!
//! These types are deserialized from TOML config files. Every field is
//! optional so that a project config can override a single value from the
//! user config without restating the rest.
//!
//! # Example Configuration
//!
//! ```toml
//! [cleanup]
//! persist_prefixes = [
//!     "/subscriptions/0000/resourcegroups/shared-infra",
//! ]
//! fail_on_container_errors = true
//!
//! [provider]
//! request_timeout_secs = 60
//! operation_timeout_secs = 1800
//! ```

use serde::{Deserialize, Serialize};

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.azclean/config.toml`
/// 2. Project config: `./.azclean/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AzcleanConfig {
    /// Cleanup policy settings
    #[serde(default)]
    pub cleanup: CleanupSettings,

    /// Provider client settings
    #[serde(default)]
    pub provider: ProviderSettings,
}

/// Cleanup policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CleanupSettings {
    /// Resource id prefixes that are never deleted (case-insensitive).
    /// Replaces the built-in list when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_prefixes: Option<Vec<String>>,

    /// Whether a failed resource group deletion fails the run.
    /// Default: true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_container_errors: Option<bool>,
}

/// Azure Resource Manager client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProviderSettings {
    /// Per-request HTTP timeout in seconds.
    /// Default: 60 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Upper bound on waiting for a long-running delete operation.
    /// Default: 1800 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_timeout_secs: Option<u64>,
}
