pub mod errors;
pub mod exemptions;
pub mod handler;
pub mod operations;
pub mod reporter;
pub mod types;

// Public API exports
pub use errors::CleanupError;
pub use exemptions::ExemptionList;
pub use handler::{run_cleanup, sweep_containers, sweep_resources, verify_account};
pub use reporter::SweepReporter;
pub use types::{CleanupReport, CleanupRequest, ContainerOutcome, ResourceOutcome, RunStats};
