use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A provisioned resource as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Hierarchical identifier, e.g.
    /// `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Web/sites/{name}`
    pub id: String,
    /// Provider-defined category, e.g. `Microsoft.Web/sites`
    pub resource_type: String,
    /// Creation time; some resource types do not report one
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn new(
        id: impl Into<String>,
        resource_type: impl Into<String>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            created_at,
        }
    }
}

/// A resource group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Subscription metadata used for the identity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub display_name: String,
}
