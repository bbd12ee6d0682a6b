use crate::errors::AzcleanError;
use crate::provider::ProviderError;

/// Failures that abort a cleanup run before any report is produced.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("Subscription does not match! Expected subscription: {expected}, actual subscription: {actual}")]
    AccountMismatch { expected: String, actual: String },

    #[error("Failed to look up subscription '{account_id}': {source}")]
    AccountLookupFailed {
        account_id: String,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to list resources: {source}")]
    ResourceListingFailed {
        #[source]
        source: ProviderError,
    },
}

impl AzcleanError for CleanupError {
    fn error_code(&self) -> &'static str {
        match self {
            CleanupError::AccountMismatch { .. } => "CLEANUP_ACCOUNT_MISMATCH",
            CleanupError::AccountLookupFailed { .. } => "CLEANUP_ACCOUNT_LOOKUP_FAILED",
            CleanupError::ResourceListingFailed { .. } => "CLEANUP_RESOURCE_LISTING_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            CleanupError::AccountMismatch { .. } => true,
            CleanupError::AccountLookupFailed { source, .. } => source.is_user_error(),
            CleanupError::ResourceListingFailed { .. } => false,
        }
    }
}
