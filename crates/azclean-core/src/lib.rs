//! azclean-core: TTL-based cleanup of an Azure subscription
//!
//! Deletes resources older than a retention threshold, then removes resource
//! groups left empty, and reports what happened.
//!
//! # Main Entry Points
//!
//! - [`cleanup`] - The cleanup run and its policy
//! - [`provider`] - Provider seam and the Azure Resource Manager client
//! - [`config`] - Configuration management
//! - [`clock`] - Time source

pub mod cleanup;
pub mod clock;
pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod provider;

// Re-export commonly used types at crate root for convenience
pub use cleanup::{CleanupError, CleanupReport, CleanupRequest, ExemptionList, SweepReporter};
pub use clock::{Clock, SystemClock};
pub use config::AzcleanConfig;
pub use errors::AzcleanError;
pub use provider::{CloudProvider, ProviderError};

// Re-export logging initialization
pub use logging::init_logging;
