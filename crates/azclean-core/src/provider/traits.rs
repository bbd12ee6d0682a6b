//! Cloud provider trait definition.

use super::errors::ProviderError;
use super::types::{AccountInfo, Container, Resource};

/// Listing and deletion operations the cleanup run needs from a provider.
///
/// Implementations are bound to one subscription and hold their own
/// credential. Every call blocks until the provider has answered; deletions
/// return only once the provider reports the resource gone or the attempt
/// failed.
pub trait CloudProvider {
    /// Fetch metadata for the subscription this client was created for.
    fn get_account_info(&self, account_id: &str) -> Result<AccountInfo, ProviderError>;

    /// List every resource in the subscription.
    fn list_resources(&self) -> Result<Vec<Resource>, ProviderError>;

    /// Delete a single resource by id.
    fn delete_resource(&self, resource_type: &str, resource_id: &str)
    -> Result<(), ProviderError>;

    /// List every resource group in the subscription.
    fn list_containers(&self) -> Result<Vec<Container>, ProviderError>;

    /// Number of resources currently in a resource group.
    fn count_resources_in_container(&self, container_name: &str) -> Result<usize, ProviderError>;

    /// Delete a resource group.
    fn delete_container(&self, container_name: &str) -> Result<(), ProviderError>;
}
