use crate::errors::AzcleanError;

/// Errors produced at the cloud provider boundary.
///
/// `Api` carries the status and error code the provider reported. Every
/// other variant is an unclassified failure that only has a description.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP status code: {status}, error code: {code}, error message: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Subscription '{account_id}' not found")]
    AccountNotFound { account_id: String },

    #[error("Request to '{url}' failed: {message}")]
    Transport { url: String, message: String },

    #[error("Unexpected response from '{url}': {message}")]
    InvalidResponse { url: String, message: String },

    #[error("No usable API version for resource type '{resource_type}'")]
    ApiVersionUnavailable { resource_type: String },

    #[error("Operation on '{resource}' did not finish within {timeout_secs} seconds")]
    OperationTimedOut { resource: String, timeout_secs: u64 },
}

impl AzcleanError for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            ProviderError::Api { .. } => "PROVIDER_API_ERROR",
            ProviderError::Authentication { .. } => "PROVIDER_AUTHENTICATION_FAILED",
            ProviderError::AccountNotFound { .. } => "PROVIDER_ACCOUNT_NOT_FOUND",
            ProviderError::Transport { .. } => "PROVIDER_TRANSPORT_ERROR",
            ProviderError::InvalidResponse { .. } => "PROVIDER_INVALID_RESPONSE",
            ProviderError::ApiVersionUnavailable { .. } => "PROVIDER_API_VERSION_UNAVAILABLE",
            ProviderError::OperationTimedOut { .. } => "PROVIDER_OPERATION_TIMED_OUT",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ProviderError::Authentication { .. } | ProviderError::AccountNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ProviderError::Api {
            status: 409,
            code: "Conflict".to_string(),
            message: "Resource is in use".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "HTTP status code: 409, error code: Conflict, error message: Resource is in use"
        );
        assert_eq!(error.error_code(), "PROVIDER_API_ERROR");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_transport_error_is_unclassified() {
        let error = ProviderError::Transport {
            url: "https://management.azure.com/".to_string(),
            message: "connection reset".to_string(),
        };
        assert_eq!(error.error_code(), "PROVIDER_TRANSPORT_ERROR");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_authentication_error_is_user_error() {
        let error = ProviderError::Authentication {
            message: "AADSTS7000215: Invalid client secret".to_string(),
        };
        assert!(error.is_user_error());
        assert_eq!(error.error_code(), "PROVIDER_AUTHENTICATION_FAILED");
    }
}
