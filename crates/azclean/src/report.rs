//! Console narrative for a cleanup run.

use std::io::Write;

use azclean_core::cleanup::{CleanupRequest, ContainerOutcome, ResourceOutcome, SweepReporter};
use azclean_core::provider::{Container, ProviderError, Resource};

/// Writes one block of lines per processed item.
///
/// Write errors are ignored; a closed stdout must not stop a cleanup run.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    fn failure(&mut self, error: &ProviderError) {
        match error {
            ProviderError::Api {
                status,
                code,
                message,
            } => {
                self.line(&format!(
                    "  Failed. HTTP status code: {}, error code: {}, error message:",
                    status, code
                ));
                self.line(&format!("    {}", message));
            }
            other => self.line(&format!("  Failed. {}", other)),
        }
    }
}

impl<W: Write> SweepReporter for ConsoleReporter<W> {
    fn run_started(&mut self, request: &CleanupRequest) {
        self.line(&format!(
            "Start cleaning resources in subscription: {} ({}), delete resources created over {} days.",
            request.expected_account_name, request.account_id, request.ttl_days
        ));
    }

    fn resource_started(&mut self, resource: &Resource) {
        self.line(&format!("Processing {}", resource.id));
    }

    fn resource_deleting(&mut self, _resource: &Resource, age_days: i64) {
        self.line(&format!("  Created {} day(s) ago, deleting...", age_days));
    }

    fn resource_finished(&mut self, resource: &Resource, outcome: &ResourceOutcome) {
        match outcome {
            ResourceOutcome::TooYoung {
                age_days: Some(age_days),
            } => self.line(&format!("  Created {} day(s) ago, skip.", age_days)),
            ResourceOutcome::TooYoung { age_days: None } => {
                self.line("  Creation time unknown, skip.")
            }
            ResourceOutcome::Exempt { prefix, .. } => self.line(&format!(
                "  Resource {} starts with persist prefix {}, skip.",
                resource.id.to_lowercase(),
                prefix
            )),
            ResourceOutcome::Deleted { .. } => self.line("  Deleted."),
            ResourceOutcome::Failed { error, .. } => self.failure(error),
        }
    }

    fn container_started(&mut self, container: &Container) {
        self.line(&format!("Processing resource group: {}...", container.name));
    }

    fn container_deleting(&mut self, _container: &Container) {
        self.line("  No resources in this group, deleting...");
    }

    fn container_finished(&mut self, _container: &Container, outcome: &ContainerOutcome) {
        match outcome {
            ContainerOutcome::NotEmpty { resource_count } => self.line(&format!(
                "  {} resources in this group, skip.",
                resource_count
            )),
            ContainerOutcome::MembershipUnknown { error } => self.line(&format!(
                "  Could not count resources in this group, skip. {}",
                error
            )),
            ContainerOutcome::Deleted => self.line("  Deleted."),
            ContainerOutcome::Failed { error } => self.failure(error),
        }
    }
}
