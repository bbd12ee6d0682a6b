pub mod azure;
pub mod errors;
pub mod traits;
pub mod types;

// Public API exports
pub use errors::ProviderError;
pub use traits::CloudProvider;
pub use types::{AccountInfo, Container, Resource};
