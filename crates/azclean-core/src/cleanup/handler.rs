use tracing::{error, info, warn};

use crate::cleanup::operations::{self, Disposition};
use crate::cleanup::reporter::SweepReporter;
use crate::cleanup::{errors::CleanupError, types::*};
use crate::clock::Clock;
use crate::provider::{CloudProvider, ProviderError, Resource};

/// Run a complete cleanup: identity check, resource sweep, resource group
/// sweep, report.
///
/// # Errors
///
/// Returns [`CleanupError`] when the subscription cannot be verified or its
/// resources cannot be listed. Nothing has been deleted in either case.
/// Individual deletion failures are counted in the report instead.
pub fn run_cleanup(
    provider: &dyn CloudProvider,
    clock: &dyn Clock,
    request: &CleanupRequest,
    reporter: &mut dyn SweepReporter,
) -> Result<CleanupReport, CleanupError> {
    info!(
        event = "core.cleanup.run_started",
        account_id = %request.account_id,
        ttl_days = request.ttl_days,
        exemptions = request.exemptions.prefixes().len()
    );

    verify_account(provider, request)?;

    let started_at = clock.now();
    reporter.run_started(request);

    let resources = provider.list_resources().map_err(|e| {
        error!(event = "core.cleanup.resource_listing_failed", error = %e);
        CleanupError::ResourceListingFailed { source: e }
    })?;

    let mut stats = RunStats::new();
    sweep_resources(provider, resources, request, started_at, &mut stats, reporter);

    let container_sweep_error = sweep_containers(provider, &mut stats, reporter).err();

    let report = CleanupReport {
        stats,
        started_at,
        finished_at: clock.now(),
        container_sweep_error,
        fail_on_container_errors: request.fail_on_container_errors,
    };

    info!(
        event = "core.cleanup.run_completed",
        duration_ms = report.duration().num_milliseconds(),
        resources_deleted = stats.deleted_resources(),
        resources_failed = stats.failed_resources(),
        groups_deleted = stats.deleted_containers(),
        groups_failed = stats.failed_containers(),
        has_failures = report.has_failures()
    );

    Ok(report)
}

/// Refuse to touch a subscription whose display name differs from the
/// expected one.
pub fn verify_account(
    provider: &dyn CloudProvider,
    request: &CleanupRequest,
) -> Result<(), CleanupError> {
    let account = provider
        .get_account_info(&request.account_id)
        .map_err(|e| {
            error!(
                event = "core.cleanup.account_lookup_failed",
                account_id = %request.account_id,
                error = %e
            );
            CleanupError::AccountLookupFailed {
                account_id: request.account_id.clone(),
                source: e,
            }
        })?;

    if account.display_name != request.expected_account_name {
        error!(
            event = "core.cleanup.account_mismatch",
            expected = %request.expected_account_name,
            actual = %account.display_name
        );
        return Err(CleanupError::AccountMismatch {
            expected: request.expected_account_name.clone(),
            actual: account.display_name,
        });
    }

    info!(
        event = "core.cleanup.account_verified",
        account_id = %request.account_id,
        display_name = %account.display_name
    );
    Ok(())
}

/// Delete every expired, non-exempt resource, newest first.
///
/// One attempt per resource; a failure is counted and the sweep moves on.
pub fn sweep_resources(
    provider: &dyn CloudProvider,
    mut resources: Vec<Resource>,
    request: &CleanupRequest,
    now: chrono::DateTime<chrono::Utc>,
    stats: &mut RunStats,
    reporter: &mut dyn SweepReporter,
) {
    stats.record_resources_seen(resources.len());
    operations::sort_newest_first(&mut resources);

    info!(
        event = "core.cleanup.resource_sweep_started",
        total = resources.len()
    );

    for resource in &resources {
        reporter.resource_started(resource);

        let outcome = match operations::classify_resource(
            resource,
            now,
            request.ttl_days,
            &request.exemptions,
        ) {
            Disposition::Keep { age_days } => ResourceOutcome::TooYoung { age_days },
            Disposition::Exempt { age_days, prefix } => {
                info!(
                    event = "core.cleanup.resource_exempt",
                    resource_id = %resource.id,
                    prefix = %prefix
                );
                ResourceOutcome::Exempt { age_days, prefix }
            }
            Disposition::Delete { age_days } => {
                reporter.resource_deleting(resource, age_days);
                let outcome = delete_resource(provider, resource, age_days);
                stats.record_resource_attempt(matches!(outcome, ResourceOutcome::Deleted { .. }));
                outcome
            }
        };

        reporter.resource_finished(resource, &outcome);
    }

    info!(
        event = "core.cleanup.resource_sweep_completed",
        eligible = stats.eligible_resources(),
        deleted = stats.deleted_resources(),
        failed = stats.failed_resources()
    );
}

fn delete_resource(
    provider: &dyn CloudProvider,
    resource: &Resource,
    age_days: i64,
) -> ResourceOutcome {
    info!(
        event = "core.cleanup.resource_delete_started",
        resource_id = %resource.id,
        resource_type = %resource.resource_type,
        age_days = age_days
    );

    match provider.delete_resource(&resource.resource_type, &resource.id) {
        Ok(()) => {
            info!(
                event = "core.cleanup.resource_delete_completed",
                resource_id = %resource.id
            );
            ResourceOutcome::Deleted { age_days }
        }
        Err(error) => {
            log_delete_failure("resource", &resource.id, &error);
            ResourceOutcome::Failed { age_days, error }
        }
    }
}

/// Delete every resource group that has no resources left.
///
/// # Errors
///
/// Returns the provider error when the resource groups cannot be listed.
/// Per-group failures are counted in `stats` instead.
pub fn sweep_containers(
    provider: &dyn CloudProvider,
    stats: &mut RunStats,
    reporter: &mut dyn SweepReporter,
) -> Result<(), ProviderError> {
    let containers = provider.list_containers().map_err(|e| {
        error!(event = "core.cleanup.group_listing_failed", error = %e);
        e
    })?;

    info!(
        event = "core.cleanup.group_sweep_started",
        total = containers.len()
    );

    for container in &containers {
        stats.record_container_seen();
        reporter.container_started(container);

        let outcome = match provider.count_resources_in_container(&container.name) {
            Ok(0) => {
                reporter.container_deleting(container);
                let outcome = match provider.delete_container(&container.name) {
                    Ok(()) => {
                        info!(
                            event = "core.cleanup.group_delete_completed",
                            group = %container.name
                        );
                        ContainerOutcome::Deleted
                    }
                    Err(error) => {
                        log_delete_failure("group", &container.name, &error);
                        ContainerOutcome::Failed { error }
                    }
                };
                stats.record_container_attempt(matches!(outcome, ContainerOutcome::Deleted));
                outcome
            }
            Ok(resource_count) => ContainerOutcome::NotEmpty { resource_count },
            Err(error) => {
                warn!(
                    event = "core.cleanup.group_count_failed",
                    group = %container.name,
                    error = %error
                );
                ContainerOutcome::MembershipUnknown { error }
            }
        };

        reporter.container_finished(container, &outcome);
    }

    info!(
        event = "core.cleanup.group_sweep_completed",
        eligible = stats.eligible_containers(),
        deleted = stats.deleted_containers(),
        failed = stats.failed_containers()
    );

    Ok(())
}

fn log_delete_failure(kind: &str, name: &str, error: &ProviderError) {
    match error {
        ProviderError::Api {
            status,
            code,
            message,
        } => {
            warn!(
                event = "core.cleanup.delete_rejected",
                kind = kind,
                name = %name,
                status = status,
                code = %code,
                message = %message
            );
        }
        other => {
            warn!(
                event = "core.cleanup.delete_failed",
                kind = kind,
                name = %name,
                error = %other
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::exemptions::ExemptionList;
    use crate::clock::ManualClock;
    use crate::provider::{AccountInfo, Container};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        AccountInfo,
        ListResources,
        DeleteResource(String),
        ListContainers,
        CountContainer(String),
        DeleteContainer(String),
    }

    #[derive(Default)]
    struct FakeProvider {
        display_name: String,
        resources: Vec<Resource>,
        failing_resources: HashMap<String, u16>,
        opaque_failures: HashSet<String>,
        containers: Vec<(String, usize)>,
        vanished_containers: Vec<String>,
        failing_containers: HashSet<String>,
        fail_account_lookup: bool,
        fail_resource_listing: bool,
        fail_container_listing: bool,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeProvider {
        fn named(display_name: &str) -> Self {
            Self {
                display_name: display_name.to_string(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn deleted_resources(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::DeleteResource(id) => Some(id),
                    _ => None,
                })
                .collect()
        }

        fn has_deletions(&self) -> bool {
            self.calls().iter().any(|c| {
                matches!(c, Call::DeleteResource(_) | Call::DeleteContainer(_))
            })
        }
    }

    impl CloudProvider for FakeProvider {
        fn get_account_info(&self, account_id: &str) -> Result<AccountInfo, ProviderError> {
            self.calls.borrow_mut().push(Call::AccountInfo);
            if self.fail_account_lookup {
                return Err(ProviderError::AccountNotFound {
                    account_id: account_id.to_string(),
                });
            }
            Ok(AccountInfo {
                display_name: self.display_name.clone(),
            })
        }

        fn list_resources(&self) -> Result<Vec<Resource>, ProviderError> {
            self.calls.borrow_mut().push(Call::ListResources);
            if self.fail_resource_listing {
                return Err(ProviderError::Api {
                    status: 429,
                    code: "TooManyRequests".to_string(),
                    message: "Rate limit exceeded".to_string(),
                });
            }
            Ok(self.resources.clone())
        }

        fn delete_resource(&self, _: &str, resource_id: &str) -> Result<(), ProviderError> {
            self.calls
                .borrow_mut()
                .push(Call::DeleteResource(resource_id.to_string()));
            if let Some(status) = self.failing_resources.get(resource_id) {
                return Err(ProviderError::Api {
                    status: *status,
                    code: "Conflict".to_string(),
                    message: "Resource is in use".to_string(),
                });
            }
            if self.opaque_failures.contains(resource_id) {
                return Err(ProviderError::Transport {
                    url: resource_id.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            Ok(())
        }

        fn list_containers(&self) -> Result<Vec<Container>, ProviderError> {
            self.calls.borrow_mut().push(Call::ListContainers);
            if self.fail_container_listing {
                return Err(ProviderError::Transport {
                    url: "resourcegroups".to_string(),
                    message: "timed out".to_string(),
                });
            }
            Ok(self
                .containers
                .iter()
                .map(|(name, _)| name)
                .chain(self.vanished_containers.iter())
                .map(|name| Container::new(name.clone()))
                .collect())
        }

        fn count_resources_in_container(&self, name: &str) -> Result<usize, ProviderError> {
            self.calls
                .borrow_mut()
                .push(Call::CountContainer(name.to_string()));
            self.containers
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, count)| *count)
                .ok_or_else(|| ProviderError::Api {
                    status: 404,
                    code: "ResourceGroupNotFound".to_string(),
                    message: format!("Resource group '{}' could not be found.", name),
                })
        }

        fn delete_container(&self, name: &str) -> Result<(), ProviderError> {
            self.calls
                .borrow_mut()
                .push(Call::DeleteContainer(name.to_string()));
            if self.failing_containers.contains(name) {
                return Err(ProviderError::Api {
                    status: 409,
                    code: "Conflict".to_string(),
                    message: "Group is being deleted".to_string(),
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        resources: Vec<(String, String)>,
        containers: Vec<(String, String)>,
    }

    impl SweepReporter for RecordingReporter {
        fn resource_finished(&mut self, resource: &Resource, outcome: &ResourceOutcome) {
            let label = match outcome {
                ResourceOutcome::TooYoung { .. } => "young",
                ResourceOutcome::Exempt { .. } => "exempt",
                ResourceOutcome::Deleted { .. } => "deleted",
                ResourceOutcome::Failed { .. } => "failed",
            };
            self.resources.push((resource.id.clone(), label.to_string()));
        }

        fn container_finished(&mut self, container: &Container, outcome: &ContainerOutcome) {
            let label = match outcome {
                ContainerOutcome::NotEmpty { .. } => "not-empty",
                ContainerOutcome::MembershipUnknown { .. } => "unknown",
                ContainerOutcome::Deleted => "deleted",
                ContainerOutcome::Failed { .. } => "failed",
            };
            self.containers
                .push((container.name.clone(), label.to_string()));
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::days(days))
    }

    fn request(ttl_days: u32, exemptions: &[&str]) -> CleanupRequest {
        CleanupRequest::new("sub-1", "Prod", ttl_days, ExemptionList::new(exemptions))
    }

    fn run(
        provider: &FakeProvider,
        request: &CleanupRequest,
    ) -> (Result<CleanupReport, CleanupError>, RecordingReporter) {
        let clock = ManualClock::new(now());
        let mut reporter = RecordingReporter::default();
        let result = run_cleanup(provider, &clock, request, &mut reporter);
        (result, reporter)
    }

    #[test]
    fn test_age_and_exemption_policy() {
        let mut provider = FakeProvider::named("Prod");
        provider.resources = vec![
            Resource::new("/subscriptions/s/resourceGroups/rg/a", "t", days_ago(45)),
            Resource::new("/subscriptions/s/resourceGroups/rg/b", "t", days_ago(10)),
            Resource::new("/subscriptions/s/resourceGroups/Keep/c", "t", days_ago(45)),
        ];

        let exemptions = ["/subscriptions/s/resourcegroups/keep"];
        let (result, reporter) = run(&provider, &request(30, &exemptions));
        let report = result.unwrap();

        assert_eq!(
            provider.deleted_resources(),
            vec!["/subscriptions/s/resourceGroups/rg/a".to_string()]
        );
        assert_eq!(report.stats.total_resources(), 3);
        assert_eq!(report.stats.eligible_resources(), 1);
        assert_eq!(report.stats.deleted_resources(), 1);
        assert_eq!(report.stats.failed_resources(), 0);
        assert!(!report.has_failures());

        let labels: Vec<&str> = reporter.resources.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(labels.len(), 3);
        assert!(labels.contains(&"young"));
        assert!(labels.contains(&"exempt"));
        assert!(labels.contains(&"deleted"));
    }

    #[test]
    fn test_deletions_run_newest_first() {
        let mut provider = FakeProvider::named("Prod");
        provider.resources = vec![
            Resource::new("/oldest", "t", days_ago(90)),
            Resource::new("/newest", "t", days_ago(31)),
            Resource::new("/unknown", "t", None),
            Resource::new("/middle", "t", days_ago(60)),
        ];

        let (result, reporter) = run(&provider, &request(30, &[]));
        result.unwrap();

        assert_eq!(
            provider.deleted_resources(),
            vec!["/newest", "/middle", "/oldest"]
        );
        let reported: Vec<&str> = reporter.resources.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(reported, vec!["/newest", "/middle", "/oldest", "/unknown"]);
    }

    #[test]
    fn test_failure_is_isolated() {
        let mut provider = FakeProvider::named("Prod");
        provider.resources = vec![
            Resource::new("/d", "t", days_ago(40)),
            Resource::new("/e", "t", days_ago(50)),
            Resource::new("/f", "t", days_ago(60)),
        ];
        provider.failing_resources.insert("/d".to_string(), 409);
        provider.opaque_failures.insert("/f".to_string());

        let (result, reporter) = run(&provider, &request(30, &[]));
        let report = result.unwrap();

        assert_eq!(provider.deleted_resources(), vec!["/d", "/e", "/f"]);
        assert_eq!(report.stats.eligible_resources(), 3);
        assert_eq!(report.stats.deleted_resources(), 1);
        assert_eq!(report.stats.failed_resources(), 2);
        assert!(report.has_failures());
        assert_eq!(
            reporter.resources,
            vec![
                ("/d".to_string(), "failed".to_string()),
                ("/e".to_string(), "deleted".to_string()),
                ("/f".to_string(), "failed".to_string()),
            ]
        );
    }

    #[test]
    fn test_account_mismatch_has_no_side_effects() {
        let mut provider = FakeProvider::named("Dev");
        provider.resources = vec![Resource::new("/a", "t", days_ago(100))];
        provider.containers = vec![("rg1".to_string(), 0)];

        let (result, reporter) = run(&provider, &request(30, &[]));

        assert!(matches!(
            result,
            Err(CleanupError::AccountMismatch { ref expected, ref actual })
                if expected == "Prod" && actual == "Dev"
        ));
        assert_eq!(provider.calls(), vec![Call::AccountInfo]);
        assert!(!provider.has_deletions());
        assert!(reporter.resources.is_empty());
    }

    #[test]
    fn test_account_lookup_failure_aborts_run() {
        let mut provider = FakeProvider::named("Prod");
        provider.resources = vec![Resource::new("/a", "t", days_ago(100))];
        provider.containers = vec![("rg1".to_string(), 0)];
        provider.fail_account_lookup = true;

        let (result, reporter) = run(&provider, &request(30, &[]));

        assert!(matches!(
            result,
            Err(CleanupError::AccountLookupFailed {
                source: ProviderError::AccountNotFound { .. },
                ..
            })
        ));
        assert_eq!(provider.calls(), vec![Call::AccountInfo]);
        assert!(reporter.resources.is_empty());
        assert!(reporter.containers.is_empty());
    }

    #[test]
    fn test_resource_listing_failure_aborts_run() {
        let mut provider = FakeProvider::named("Prod");
        provider.containers = vec![("rg1".to_string(), 0)];
        provider.fail_resource_listing = true;

        let (result, reporter) = run(&provider, &request(30, &[]));

        assert!(matches!(
            result,
            Err(CleanupError::ResourceListingFailed {
                source: ProviderError::Api { status: 429, .. }
            })
        ));
        assert_eq!(provider.calls(), vec![Call::AccountInfo, Call::ListResources]);
        assert!(!provider.has_deletions());
        assert!(reporter.resources.is_empty());
        assert!(reporter.containers.is_empty());
    }

    #[test]
    fn test_empty_groups_are_deleted() {
        let mut provider = FakeProvider::named("Prod");
        provider.containers = vec![("rg1".to_string(), 0), ("rg2".to_string(), 2)];

        let (result, reporter) = run(&provider, &request(30, &[]));
        let report = result.unwrap();

        assert!(provider.calls().contains(&Call::DeleteContainer("rg1".to_string())));
        assert!(!provider.calls().contains(&Call::DeleteContainer("rg2".to_string())));
        assert_eq!(report.stats.total_containers(), 2);
        assert_eq!(report.stats.eligible_containers(), 1);
        assert_eq!(report.stats.deleted_containers(), 1);
        assert_eq!(
            reporter.containers,
            vec![
                ("rg1".to_string(), "deleted".to_string()),
                ("rg2".to_string(), "not-empty".to_string()),
            ]
        );
    }

    #[test]
    fn test_group_sweep_starts_after_resource_sweep() {
        let mut provider = FakeProvider::named("Prod");
        provider.resources = vec![
            Resource::new("/a", "t", days_ago(40)),
            Resource::new("/b", "t", days_ago(50)),
        ];
        provider.containers = vec![("rg1".to_string(), 0)];

        let (result, _) = run(&provider, &request(30, &[]));
        result.unwrap();

        let calls = provider.calls();
        let last_resource_delete = calls
            .iter()
            .rposition(|c| matches!(c, Call::DeleteResource(_)))
            .unwrap();
        let group_listing = calls
            .iter()
            .position(|c| *c == Call::ListContainers)
            .unwrap();
        assert!(last_resource_delete < group_listing);
    }

    #[test]
    fn test_group_failures_are_counted() {
        let mut provider = FakeProvider::named("Prod");
        provider.containers = vec![("rg1".to_string(), 0), ("rg2".to_string(), 0)];
        provider.failing_containers.insert("rg1".to_string());

        let (result, _) = run(&provider, &request(30, &[]));
        let report = result.unwrap();

        assert!(provider.calls().contains(&Call::DeleteContainer("rg2".to_string())));
        assert_eq!(report.stats.eligible_containers(), 2);
        assert_eq!(report.stats.deleted_containers(), 1);
        assert_eq!(report.stats.failed_containers(), 1);
        assert!(report.has_failures());

        let lenient = request(30, &[]).with_fail_on_container_errors(false);
        let (result, _) = run(&provider, &lenient);
        assert!(!result.unwrap().has_failures());
    }

    #[test]
    fn test_group_listing_failure_still_reports() {
        let mut provider = FakeProvider::named("Prod");
        provider.resources = vec![Resource::new("/a", "t", days_ago(40))];
        provider.fail_container_listing = true;

        let (result, _) = run(&provider, &request(30, &[]));
        let report = result.unwrap();

        assert_eq!(report.stats.deleted_resources(), 1);
        assert!(report.container_sweep_error.is_some());
        assert!(report.has_failures());
    }

    #[test]
    fn test_unknown_group_membership_is_skipped() {
        let mut provider = FakeProvider::named("Prod");
        provider.containers = vec![("rg1".to_string(), 0)];
        provider.vanished_containers = vec!["ghost".to_string()];

        let (result, reporter) = run(&provider, &request(30, &[]));
        let report = result.unwrap();

        assert!(!provider.calls().contains(&Call::DeleteContainer("ghost".to_string())));
        assert_eq!(report.stats.total_containers(), 2);
        assert_eq!(report.stats.eligible_containers(), 1);
        assert_eq!(report.stats.deleted_containers(), 1);
        assert!(!report.has_failures());
        assert_eq!(
            reporter.containers,
            vec![
                ("rg1".to_string(), "deleted".to_string()),
                ("ghost".to_string(), "unknown".to_string()),
            ]
        );
    }

    #[test]
    fn test_report_duration_uses_clock() {
        let provider = FakeProvider::named("Prod");
        let clock = ManualClock::with_step(now(), Duration::seconds(7));
        let mut reporter = RecordingReporter::default();

        let report = run_cleanup(&provider, &clock, &request(30, &[]), &mut reporter).unwrap();
        assert_eq!(report.started_at, now());
        assert_eq!(report.duration(), Duration::seconds(7));
    }
}
