//! Azure cloud environments.

use serde::{Deserialize, Serialize};

/// Sovereign clouds the tool can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AzureEnvironment {
    #[default]
    Global,
    China,
    Usa,
    German,
}

impl AzureEnvironment {
    /// Get the canonical string name for this environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            AzureEnvironment::Global => "global",
            AzureEnvironment::China => "china",
            AzureEnvironment::Usa => "usa",
            AzureEnvironment::German => "german",
        }
    }

    /// Parse an environment name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "global" => Some(AzureEnvironment::Global),
            "china" => Some(AzureEnvironment::China),
            "usa" => Some(AzureEnvironment::Usa),
            "german" => Some(AzureEnvironment::German),
            _ => None,
        }
    }

    /// Resolve an optional environment name, falling back to the global cloud
    /// for missing or unrecognized names.
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(Self::parse).unwrap_or_default()
    }

    /// Get all supported environments.
    pub fn all() -> &'static [AzureEnvironment] {
        &[
            AzureEnvironment::Global,
            AzureEnvironment::China,
            AzureEnvironment::Usa,
            AzureEnvironment::German,
        ]
    }

    /// Azure Active Directory authority host.
    pub fn authority_host(&self) -> &'static str {
        match self {
            AzureEnvironment::Global => "https://login.microsoftonline.com",
            AzureEnvironment::China => "https://login.chinacloudapi.cn",
            AzureEnvironment::Usa => "https://login.microsoftonline.us",
            AzureEnvironment::German => "https://login.microsoftonline.de",
        }
    }

    /// Azure Resource Manager endpoint, without trailing slash.
    pub fn resource_manager(&self) -> &'static str {
        match self {
            AzureEnvironment::Global => "https://management.azure.com",
            AzureEnvironment::China => "https://management.chinacloudapi.cn",
            AzureEnvironment::Usa => "https://management.usgovcloudapi.net",
            AzureEnvironment::German => "https://management.microsoftazure.de",
        }
    }

    /// OAuth2 scope for Resource Manager tokens.
    pub fn scope(&self) -> String {
        format!("{}/.default", self.resource_manager())
    }
}

impl std::fmt::Display for AzureEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(AzureEnvironment::parse("China"), Some(AzureEnvironment::China));
        assert_eq!(AzureEnvironment::parse("USA"), Some(AzureEnvironment::Usa));
        assert_eq!(AzureEnvironment::parse("german"), Some(AzureEnvironment::German));
        assert_eq!(AzureEnvironment::parse("mars"), None);
    }

    #[test]
    fn test_resolve_falls_back_to_global() {
        assert_eq!(AzureEnvironment::resolve(None), AzureEnvironment::Global);
        assert_eq!(
            AzureEnvironment::resolve(Some("AzureCloud")),
            AzureEnvironment::Global
        );
        assert_eq!(
            AzureEnvironment::resolve(Some("CHINA")),
            AzureEnvironment::China
        );
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(
            AzureEnvironment::Global.scope(),
            "https://management.azure.com/.default"
        );
        assert_eq!(
            AzureEnvironment::Usa.resource_manager(),
            "https://management.usgovcloudapi.net"
        );
        assert_eq!(
            AzureEnvironment::China.authority_host(),
            "https://login.chinacloudapi.cn"
        );
    }

    #[test]
    fn test_round_trip_names() {
        for env in AzureEnvironment::all() {
            assert_eq!(AzureEnvironment::parse(env.as_str()), Some(*env));
        }
    }
}
