//! # Configuration System
//!
//! Hierarchical TOML configuration for azclean.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.azclean/config.toml`
//! 3. **Project config** - `./.azclean/config.toml`
//! 4. **CLI arguments** - Positional arguments (highest priority)
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use azclean_core::config::AzcleanConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AzcleanConfig::load_hierarchy()?;
//!     let prefixes = config.cleanup.persist_prefixes();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use defaults::DEFAULT_PERSIST_PREFIXES;
pub use types::{AzcleanConfig, CleanupSettings, ProviderSettings};
pub use validation::validate_config;

impl AzcleanConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }
}
