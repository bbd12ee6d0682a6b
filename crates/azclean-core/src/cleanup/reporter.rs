//! Per-item progress reporting for cleanup runs.

use crate::cleanup::types::{CleanupRequest, ContainerOutcome, ResourceOutcome};
use crate::provider::{Container, Resource};

/// Receives one notification per processed item, in processing order.
///
/// Methods cannot fail; implementations must swallow their own I/O errors so
/// that reporting never changes the course of a run.
pub trait SweepReporter {
    fn run_started(&mut self, _request: &CleanupRequest) {}

    fn resource_started(&mut self, _resource: &Resource) {}

    /// Called right before a deletion request is sent.
    fn resource_deleting(&mut self, _resource: &Resource, _age_days: i64) {}

    fn resource_finished(&mut self, resource: &Resource, outcome: &ResourceOutcome);

    fn container_started(&mut self, _container: &Container) {}

    /// Called right before a deletion request is sent.
    fn container_deleting(&mut self, _container: &Container) {}

    fn container_finished(&mut self, container: &Container, outcome: &ContainerOutcome);
}
