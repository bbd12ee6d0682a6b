//! Blocking Azure Resource Manager client.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Method;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, LOCATION, RETRY_AFTER};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::auth::{AccessToken, ServicePrincipal, acquire_token};
use super::environment::AzureEnvironment;
use super::responses::{
    AsyncOperationStatus, GenericResource, Page, ProviderMetadata, ResourceGroup, Subscription,
    parse_error_body, split_resource_type,
};
use crate::config::ProviderSettings;
use crate::provider::errors::ProviderError;
use crate::provider::traits::CloudProvider;
use crate::provider::types::{AccountInfo, Container, Resource};

const RESOURCES_API_VERSION: &str = "2021-04-01";
const SUBSCRIPTIONS_API_VERSION: &str = "2020-01-01";
const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const MAX_POLL_INTERVAL_SECS: u64 = 60;

/// Timeouts applied by [`AzureClient`].
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    pub request_timeout: Duration,
    pub operation_timeout: Duration,
}

impl From<&ProviderSettings> for ClientOptions {
    fn from(settings: &ProviderSettings) -> Self {
        Self {
            request_timeout: Duration::from_secs(settings.request_timeout_secs()),
            operation_timeout: Duration::from_secs(settings.operation_timeout_secs()),
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::from(&ProviderSettings::default())
    }
}

/// Resource Manager client bound to one subscription.
pub struct AzureClient {
    http: Client,
    environment: AzureEnvironment,
    principal: ServicePrincipal,
    subscription_id: String,
    token: Mutex<AccessToken>,
    api_versions: Mutex<HashMap<String, String>>,
    operation_timeout: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl AzureClient {
    /// Authenticate the service principal and bind a client to the subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Authentication`] when no token can be acquired.
    pub fn connect(
        principal: ServicePrincipal,
        environment: AzureEnvironment,
        subscription_id: &str,
        options: ClientOptions,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(options.request_timeout)
            .user_agent(concat!("azclean/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Transport {
                url: environment.authority_host().to_string(),
                message: e.to_string(),
            })?;

        let token = acquire_token(&http, environment, &principal)?;

        Ok(Self {
            http,
            environment,
            principal,
            subscription_id: subscription_id.to_string(),
            token: Mutex::new(token),
            api_versions: Mutex::new(HashMap::new()),
            operation_timeout: options.operation_timeout,
        })
    }

    pub fn environment(&self) -> AzureEnvironment {
        self.environment
    }

    fn bearer(&self) -> Result<String, ProviderError> {
        let mut token = lock(&self.token);
        if token.needs_refresh(Utc::now()) {
            debug!(event = "core.provider.token_refresh_started");
            *token = acquire_token(&self.http, self.environment, &self.principal)?;
        }
        Ok(token.token.clone())
    }

    fn url(&self, path: &str, api_version: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}api-version={}",
            self.environment.resource_manager(),
            path,
            separator,
            api_version
        )
    }

    fn send(&self, method: Method, url: &str) -> Result<Response, ProviderError> {
        let bearer = self.bearer()?;
        debug!(event = "core.provider.request_started", method = %method, url = %url);
        self.http
            .request(method, url)
            .bearer_auth(bearer)
            .send()
            .map_err(|e| ProviderError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let response = self.send(Method::GET, url)?;
        let response = ensure_success(response)?;
        read_json(response, url)
    }

    fn list_all<T: DeserializeOwned>(&self, first_url: String) -> Result<Vec<T>, ProviderError> {
        let mut items = Vec::new();
        let mut next = Some(first_url);
        while let Some(url) = next {
            let page: Page<T> = self.get_json(&url)?;
            items.extend(page.value);
            next = page.next_link;
        }
        Ok(items)
    }

    fn api_version_for(&self, resource_type: &str) -> Result<String, ProviderError> {
        let key = resource_type.to_lowercase();
        if let Some(version) = lock(&self.api_versions).get(&key) {
            return Ok(version.clone());
        }

        let (namespace, type_path) =
            split_resource_type(resource_type).ok_or_else(|| {
                ProviderError::ApiVersionUnavailable {
                    resource_type: resource_type.to_string(),
                }
            })?;

        let url = self.url(
            &format!(
                "/subscriptions/{}/providers/{}",
                self.subscription_id, namespace
            ),
            RESOURCES_API_VERSION,
        );
        let metadata: ProviderMetadata = self.get_json(&url)?;
        let version = metadata.api_version_for(type_path).ok_or_else(|| {
            ProviderError::ApiVersionUnavailable {
                resource_type: resource_type.to_string(),
            }
        })?;

        debug!(
            event = "core.provider.api_version_resolved",
            resource_type = resource_type,
            api_version = %version
        );
        lock(&self.api_versions).insert(key, version.clone());
        Ok(version)
    }

    /// Issue a DELETE and block until the provider reports the outcome.
    fn delete_and_wait(&self, url: &str, resource: &str) -> Result<(), ProviderError> {
        let response = self.send(Method::DELETE, url)?;
        match response.status().as_u16() {
            200 | 204 => Ok(()),
            status @ (201 | 202) => {
                let headers = response.headers().clone();
                self.wait_for_operation(status, &headers, resource)
            }
            _ => Err(api_error(response)),
        }
    }

    /// Poll a long-running operation. `accepted_status` is the status of the
    /// request that started it.
    fn wait_for_operation(
        &self,
        accepted_status: u16,
        headers: &HeaderMap,
        resource: &str,
    ) -> Result<(), ProviderError> {
        let async_operation = header_str(headers, AZURE_ASYNC_OPERATION);
        let location = header_str(headers, LOCATION.as_str());
        let Some(monitor_url) = async_operation.clone().or(location) else {
            return Ok(());
        };

        let deadline = Instant::now() + self.operation_timeout;
        let mut interval = retry_after(headers);

        info!(
            event = "core.provider.operation_wait_started",
            resource = resource,
            poll_interval_secs = interval.as_secs()
        );

        loop {
            if Instant::now() + interval > deadline {
                warn!(event = "core.provider.operation_timed_out", resource = resource);
                return Err(ProviderError::OperationTimedOut {
                    resource: resource.to_string(),
                    timeout_secs: self.operation_timeout.as_secs(),
                });
            }
            std::thread::sleep(interval);

            let response = self.send(Method::GET, &monitor_url)?;
            let status = response.status().as_u16();
            interval = retry_after(response.headers());

            if async_operation.is_some() {
                let response = ensure_success(response)?;
                let operation: AsyncOperationStatus = read_json(response, &monitor_url)?;
                match operation.status.as_str() {
                    "Succeeded" => return Ok(()),
                    "Failed" | "Canceled" => {
                        return Err(operation_failure(accepted_status, operation));
                    }
                    _ => continue,
                }
            }

            match status {
                202 => continue,
                200..=299 => return Ok(()),
                _ => return Err(api_error(response)),
            }
        }
    }
}

impl CloudProvider for AzureClient {
    fn get_account_info(&self, account_id: &str) -> Result<AccountInfo, ProviderError> {
        let url = self.url(
            &format!("/subscriptions/{}", account_id),
            SUBSCRIPTIONS_API_VERSION,
        );
        match self.get_json::<Subscription>(&url) {
            Ok(subscription) => Ok(subscription.into()),
            Err(ProviderError::Api { status: 404, .. }) => Err(ProviderError::AccountNotFound {
                account_id: account_id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    fn list_resources(&self) -> Result<Vec<Resource>, ProviderError> {
        let url = self.url(
            &format!(
                "/subscriptions/{}/resources?$expand=createdTime",
                self.subscription_id
            ),
            RESOURCES_API_VERSION,
        );
        let resources: Vec<GenericResource> = self.list_all(url)?;
        Ok(resources.into_iter().map(Resource::from).collect())
    }

    fn delete_resource(
        &self,
        resource_type: &str,
        resource_id: &str,
    ) -> Result<(), ProviderError> {
        let api_version = self.api_version_for(resource_type)?;
        let url = self.url(resource_id, &api_version);
        self.delete_and_wait(&url, resource_id)
    }

    fn list_containers(&self) -> Result<Vec<Container>, ProviderError> {
        let url = self.url(
            &format!("/subscriptions/{}/resourcegroups", self.subscription_id),
            RESOURCES_API_VERSION,
        );
        let groups: Vec<ResourceGroup> = self.list_all(url)?;
        Ok(groups.into_iter().map(Container::from).collect())
    }

    fn count_resources_in_container(&self, container_name: &str) -> Result<usize, ProviderError> {
        let url = self.url(
            &format!(
                "/subscriptions/{}/resourceGroups/{}/resources",
                self.subscription_id, container_name
            ),
            RESOURCES_API_VERSION,
        );
        let resources: Vec<GenericResource> = self.list_all(url)?;
        Ok(resources.len())
    }

    fn delete_container(&self, container_name: &str) -> Result<(), ProviderError> {
        let url = self.url(
            &format!(
                "/subscriptions/{}/resourcegroups/{}",
                self.subscription_id, container_name
            ),
            RESOURCES_API_VERSION,
        );
        self.delete_and_wait(&url, container_name)
    }
}

fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(api_error(response))
    }
}

fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ProviderError> {
    let body = response.text().map_err(|e| ProviderError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&body).map_err(|e| ProviderError::InvalidResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn api_error(response: Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    let (code, message) = parse_error_body(&body);
    ProviderError::Api {
        status,
        code,
        message,
    }
}

/// Error for an operation the provider reported as failed or canceled.
///
/// The poll itself normally answers 200, so the status is taken from the
/// request that started the operation.
fn operation_failure(accepted_status: u16, operation: AsyncOperationStatus) -> ProviderError {
    let body = operation
        .error
        .map(|e| serde_json::json!({ "error": e }).to_string())
        .unwrap_or_default();
    let (code, message) = if body.is_empty() {
        (operation.status.clone(), format!("Operation {}", operation.status.to_lowercase()))
    } else {
        parse_error_body(&body)
    };
    ProviderError::Api {
        status: accepted_status,
        code,
        message,
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn retry_after(headers: &HeaderMap) -> Duration {
    let secs = header_str(headers, RETRY_AFTER.as_str())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
        .clamp(1, MAX_POLL_INTERVAL_SECS);
    Duration::from_secs(secs)
}
