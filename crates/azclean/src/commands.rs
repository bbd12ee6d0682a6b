use clap::ArgMatches;
use tracing::{error, info, warn};

use azclean_core::cleanup::{self, CleanupRequest, ExemptionList};
use azclean_core::config::AzcleanConfig;
use azclean_core::errors::ConfigError;
use azclean_core::events;
use azclean_core::provider::azure::{AzureClient, AzureEnvironment, ClientOptions, ServicePrincipal};
use azclean_core::{AzcleanError, SystemClock};

use crate::report::ConsoleReporter;

/// Outcome of a run that reached the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Clean,
    PartialFailure,
}

/// Load configuration, refusing to run on a broken config file.
///
/// A config that cannot be read, parsed, or validated may carry persist
/// prefixes, so the run stops instead of falling back to the built-in list.
fn load_config() -> Result<AzcleanConfig, ConfigError> {
    AzcleanConfig::load_hierarchy().map_err(|e| {
        eprintln!(
            "Tip: Check ~/.azclean/config.toml and ./.azclean/config.toml for syntax errors."
        );
        error!(
            event = "cli.config.load_failed",
            error_code = e.error_code(),
            error = %e
        );
        events::log_app_error(&e);
        e
    })
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String, String> {
    matches
        .get_one::<String>(name)
        .ok_or_else(|| format!("Argument '{}' is required", name))
}

fn resolve_environment(name: Option<&str>) -> AzureEnvironment {
    if let Some(name) = name
        && AzureEnvironment::parse(name).is_none()
    {
        eprintln!(
            "Warning: Unknown environment '{}'. Using {}.",
            name,
            AzureEnvironment::default()
        );
        warn!(event = "cli.environment_unknown", environment = name);
    }
    AzureEnvironment::resolve(name)
}

pub fn run_command(matches: &ArgMatches) -> Result<RunStatus, Box<dyn std::error::Error>> {
    events::log_app_startup();

    let config = load_config()?;

    let subscription_id = required(matches, "subscription-id")?;
    let subscription_name = required(matches, "subscription-name")?;
    let ttl_days = *matches
        .get_one::<u32>("ttl")
        .ok_or("Argument 'ttl' is required")?;
    let principal = ServicePrincipal {
        client_id: required(matches, "client-id")?.clone(),
        client_secret: required(matches, "client-secret")?.clone(),
        tenant_id: required(matches, "tenant-id")?.clone(),
    };
    let environment =
        resolve_environment(matches.get_one::<String>("environment").map(String::as_str));

    info!(
        event = "cli.cleanup_started",
        subscription_id = %subscription_id,
        ttl_days = ttl_days,
        environment = %environment
    );

    let client = AzureClient::connect(
        principal,
        environment,
        subscription_id,
        ClientOptions::from(&config.provider),
    )
    .map_err(|e| {
        error!(
            event = "cli.cleanup_failed",
            stage = "authenticate",
            error_code = e.error_code(),
            error = %e
        );
        events::log_app_error(&e);
        e
    })?;

    info!(
        event = "cli.authenticated",
        environment = %client.environment()
    );

    let request = CleanupRequest::new(
        subscription_id.as_str(),
        subscription_name.as_str(),
        ttl_days,
        ExemptionList::new(config.cleanup.persist_prefixes()),
    )
    .with_fail_on_container_errors(config.cleanup.fail_on_container_errors());

    let mut reporter = ConsoleReporter::stdout();
    let report = cleanup::run_cleanup(&client, &SystemClock, &request, &mut reporter).map_err(
        |e| {
            error!(
                event = "cli.cleanup_failed",
                stage = "cleanup",
                error_code = e.error_code(),
                error = %e
            );
            events::log_app_error(&e);
            e
        },
    )?;

    print!("{}", report);

    events::log_run_report(&report);

    if report.has_failures() {
        Ok(RunStatus::PartialFailure)
    } else {
        Ok(RunStatus::Clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_environment() {
        assert_eq!(resolve_environment(None), AzureEnvironment::Global);
        assert_eq!(resolve_environment(Some("usa")), AzureEnvironment::Usa);
        assert_eq!(resolve_environment(Some("German")), AzureEnvironment::German);
        assert_eq!(resolve_environment(Some("moon")), AzureEnvironment::Global);
    }
}
