use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::cleanup::exemptions::ExemptionList;
use crate::provider::ProviderError;

/// Parameters of a single cleanup run.
#[derive(Debug, Clone)]
pub struct CleanupRequest {
    /// Subscription to clean
    pub account_id: String,
    /// Display name the subscription must have
    pub expected_account_name: String,
    /// Resources strictly older than this many days are deleted
    pub ttl_days: u32,
    /// Resources that are never deleted
    pub exemptions: ExemptionList,
    /// Whether failed resource group deletions fail the run
    pub fail_on_container_errors: bool,
}

impl CleanupRequest {
    pub fn new(
        account_id: impl Into<String>,
        expected_account_name: impl Into<String>,
        ttl_days: u32,
        exemptions: ExemptionList,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            expected_account_name: expected_account_name.into(),
            ttl_days,
            exemptions,
            fail_on_container_errors: true,
        }
    }

    pub fn with_fail_on_container_errors(mut self, enabled: bool) -> Self {
        self.fail_on_container_errors = enabled;
        self
    }
}

/// What happened to one resource during the resource sweep.
#[derive(Debug)]
pub enum ResourceOutcome {
    /// Not older than the TTL. `None` when the provider reports no creation time.
    TooYoung { age_days: Option<i64> },
    /// Matched a persist prefix
    Exempt { age_days: i64, prefix: String },
    Deleted { age_days: i64 },
    Failed { age_days: i64, error: ProviderError },
}

/// What happened to one resource group during the container sweep.
#[derive(Debug)]
pub enum ContainerOutcome {
    NotEmpty { resource_count: usize },
    /// The member count could not be read; the group is left alone
    MembershipUnknown { error: ProviderError },
    Deleted,
    Failed { error: ProviderError },
}

/// Counters accumulated across both sweeps.
///
/// Deletion counters only move together with their eligible counter, so
/// `eligible >= deleted` holds at every point of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    total_resources: u64,
    eligible_resources: u64,
    deleted_resources: u64,
    total_containers: u64,
    eligible_containers: u64,
    deleted_containers: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resources_seen(&mut self, count: usize) {
        self.total_resources += count as u64;
    }

    /// Record one deletion attempt on an eligible resource.
    pub fn record_resource_attempt(&mut self, deleted: bool) {
        self.eligible_resources += 1;
        if deleted {
            self.deleted_resources += 1;
        }
    }

    pub fn record_container_seen(&mut self) {
        self.total_containers += 1;
    }

    /// Record one deletion attempt on an empty resource group.
    pub fn record_container_attempt(&mut self, deleted: bool) {
        self.eligible_containers += 1;
        if deleted {
            self.deleted_containers += 1;
        }
    }

    pub fn total_resources(&self) -> u64 {
        self.total_resources
    }

    pub fn eligible_resources(&self) -> u64 {
        self.eligible_resources
    }

    pub fn deleted_resources(&self) -> u64 {
        self.deleted_resources
    }

    pub fn failed_resources(&self) -> u64 {
        self.eligible_resources - self.deleted_resources
    }

    pub fn total_containers(&self) -> u64 {
        self.total_containers
    }

    pub fn eligible_containers(&self) -> u64 {
        self.eligible_containers
    }

    pub fn deleted_containers(&self) -> u64 {
        self.deleted_containers
    }

    pub fn failed_containers(&self) -> u64 {
        self.eligible_containers - self.deleted_containers
    }
}

/// Result of a run that got past the identity check.
#[derive(Debug)]
pub struct CleanupReport {
    pub stats: RunStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Set when resource groups could not be listed
    pub container_sweep_error: Option<ProviderError>,
    pub fail_on_container_errors: bool,
}

impl CleanupReport {
    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    /// Whether the run should exit with a failure status.
    pub fn has_failures(&self) -> bool {
        if self.stats.failed_resources() > 0 {
            return true;
        }
        self.fail_on_container_errors
            && (self.stats.failed_containers() > 0 || self.container_sweep_error.is_some())
    }

    /// Human-readable summary, one line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let stats = &self.stats;
        let seconds = self.duration().num_milliseconds() as f64 / 1000.0;
        let mut lines = vec![
            format!("Cleanup completed in {} seconds, summary:", seconds),
            format!("  Resource processed: {}", stats.total_resources()),
            format!("  Resource can be deleted: {}", stats.eligible_resources()),
            format!("  Resource deleted: {}", stats.deleted_resources()),
            format!("  Resource failed to delete: {}", stats.failed_resources()),
            format!("  Resource group processed: {}", stats.total_containers()),
            format!(
                "  Resource group can be deleted: {}",
                stats.eligible_containers()
            ),
            format!("  Resource group deleted: {}", stats.deleted_containers()),
            format!(
                "  Resource group failed to delete: {}",
                stats.failed_containers()
            ),
        ];
        if let Some(error) = &self.container_sweep_error {
            lines.push(format!("  Resource group listing failed: {}", error));
        }
        lines
    }
}

impl std::fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.summary_lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
