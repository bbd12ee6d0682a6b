//! Default values for configuration types.

use crate::config::types::{CleanupSettings, ProviderSettings};

/// Resource groups of the long-lived Service Connector test environments.
pub const DEFAULT_PERSIST_PREFIXES: &[&str] = &[
    "/subscriptions/937bc588-a144-4083-8612-5f9ffbbddb14/resourcegroups/servicelinker-test-linux-group",
    "/subscriptions/937bc588-a144-4083-8612-5f9ffbbddb14/resourcegroups/servicelinker-test-win-group",
];

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 1800;

pub fn default_persist_prefixes() -> Vec<String> {
    DEFAULT_PERSIST_PREFIXES
        .iter()
        .map(|prefix| prefix.to_string())
        .collect()
}

impl CleanupSettings {
    /// Returns the configured persist prefixes, or the built-in list.
    pub fn persist_prefixes(&self) -> Vec<String> {
        self.persist_prefixes
            .clone()
            .unwrap_or_else(default_persist_prefixes)
    }

    /// Returns whether resource group failures fail the run, defaulting to true.
    pub fn fail_on_container_errors(&self) -> bool {
        self.fail_on_container_errors.unwrap_or(true)
    }
}

impl ProviderSettings {
    /// Returns the request timeout in seconds, defaulting to 60.
    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Returns the long-running operation timeout in seconds, defaulting to 1800.
    pub fn operation_timeout_secs(&self) -> u64 {
        self.operation_timeout_secs
            .unwrap_or(DEFAULT_OPERATION_TIMEOUT_SECS)
    }
}
