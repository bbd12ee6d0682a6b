//! Service principal authentication against Azure Active Directory.

use chrono::{DateTime, Duration, Utc};
use reqwest::blocking::Client;
use tracing::{error, info};

use super::environment::AzureEnvironment;
use super::responses::{TokenResponse, parse_error_body};
use crate::provider::errors::ProviderError;

/// Refresh tokens this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 300;

/// Client-credentials for a service principal.
#[derive(Clone)]
pub struct ServicePrincipal {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

impl std::fmt::Debug for ServicePrincipal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServicePrincipal")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Bearer token for Resource Manager.
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Acquire a Resource Manager token with the client-credentials grant.
pub fn acquire_token(
    http: &Client,
    environment: AzureEnvironment,
    principal: &ServicePrincipal,
) -> Result<AccessToken, ProviderError> {
    let url = format!(
        "{}/{}/oauth2/v2.0/token",
        environment.authority_host(),
        principal.tenant_id
    );
    let scope = environment.scope();

    info!(
        event = "core.provider.auth_started",
        environment = %environment,
        tenant_id = %principal.tenant_id,
        client_id = %principal.client_id
    );

    let response = http
        .post(&url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", principal.client_id.as_str()),
            ("client_secret", principal.client_secret.as_str()),
            ("scope", scope.as_str()),
        ])
        .send()
        .map_err(|e| ProviderError::Authentication {
            message: format!("token request to {} failed: {}", url, e),
        })?;

    let status = response.status();
    let body = response.text().map_err(|e| ProviderError::Authentication {
        message: format!("failed to read token response: {}", e),
    })?;

    if !status.is_success() {
        let (code, message) = parse_error_body(&body);
        error!(
            event = "core.provider.auth_failed",
            status = status.as_u16(),
            code = %code
        );
        return Err(ProviderError::Authentication {
            message: format!("{} ({})", message, code),
        });
    }

    let token: TokenResponse =
        serde_json::from_str(&body).map_err(|e| ProviderError::Authentication {
            message: format!("malformed token response: {}", e),
        })?;

    info!(event = "core.provider.auth_completed", expires_in = token.expires_in_secs());

    Ok(AccessToken {
        expires_at: Utc::now() + Duration::seconds(token.expires_in_secs()),
        token: token.access_token,
    })
}
