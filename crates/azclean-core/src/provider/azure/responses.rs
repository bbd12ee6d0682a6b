//! Resource Manager wire types and response helpers.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::provider::types::{AccountInfo, Container, Resource};

/// One page of a Resource Manager list operation.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenericResource {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<DateTime<Utc>>,
}

impl From<GenericResource> for Resource {
    fn from(r: GenericResource) -> Self {
        Resource::new(r.id, r.resource_type, r.created_time)
    }
}

#[derive(Debug, Deserialize)]
pub struct ResourceGroup {
    pub name: String,
}

impl From<ResourceGroup> for Container {
    fn from(rg: ResourceGroup) -> Self {
        Container::new(rg.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct Subscription {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl From<Subscription> for AccountInfo {
    fn from(s: Subscription) -> Self {
        AccountInfo {
            display_name: s.display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderMetadata {
    #[serde(rename = "resourceTypes", default)]
    pub resource_types: Vec<ProviderResourceType>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderResourceType {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(rename = "apiVersions", default)]
    pub api_versions: Vec<String>,
}

impl ProviderMetadata {
    /// Latest stable API version for a type, or the latest preview when the
    /// type has no stable version.
    pub fn api_version_for(&self, type_path: &str) -> Option<String> {
        let entry = self
            .resource_types
            .iter()
            .find(|t| t.resource_type.eq_ignore_ascii_case(type_path))?;
        pick_api_version(&entry.api_versions)
    }
}

/// Versions are `YYYY-MM-DD[-suffix]`, so lexical order is release order.
pub fn pick_api_version(versions: &[String]) -> Option<String> {
    let latest_stable = versions
        .iter()
        .filter(|v| !v.to_lowercase().contains("preview"))
        .max();
    latest_stable.or_else(|| versions.iter().max()).cloned()
}

/// Split `Microsoft.Network/virtualNetworks/subnets` into the provider
/// namespace and the type path below it.
pub fn split_resource_type(resource_type: &str) -> Option<(&str, &str)> {
    let (namespace, type_path) = resource_type.split_once('/')?;
    if namespace.is_empty() || type_path.is_empty() {
        return None;
    }
    Some((namespace, type_path))
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<Value>,
}

impl TokenResponse {
    /// Token lifetime in seconds. AAD v1 sends a string, v2 a number.
    pub fn expires_in_secs(&self) -> i64 {
        match &self.expires_in {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(3600),
            Some(Value::String(s)) => s.parse().unwrap_or(3600),
            _ => 3600,
        }
    }
}

/// Status document behind an `Azure-AsyncOperation` header.
#[derive(Debug, Deserialize)]
pub struct AsyncOperationStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Extract `(code, message)` from a Resource Manager or AAD error body.
///
/// Handles `{"error":{"code","message"}}`, top-level `code`/`message`
/// (either casing) and AAD's `{"error":"...","error_description":"..."}`.
/// Falls back to the raw body when nothing matches.
pub fn parse_error_body(body: &str) -> (String, String) {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return ("Unknown".to_string(), body.trim().to_string());
    };

    if let Some(inner) = value.get("error").filter(|e| e.is_object()) {
        return (
            string_field(inner, &["code", "Code"]).unwrap_or_else(|| "Unknown".to_string()),
            string_field(inner, &["message", "Message"]).unwrap_or_else(|| body.trim().to_string()),
        );
    }

    let code = string_field(&value, &["code", "Code", "error"]);
    let message = string_field(&value, &["message", "Message", "error_description"]);
    (
        code.unwrap_or_else(|| "Unknown".to_string()),
        message.unwrap_or_else(|| body.trim().to_string()),
    )
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
