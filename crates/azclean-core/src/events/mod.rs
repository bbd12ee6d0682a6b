//! Application-level lifecycle events.
//!
//! Cleanup and provider internals log their own `core.cleanup.*` and
//! `core.provider.*` events; this module covers process start and exit and
//! the outcome of a whole run.

use tracing::{error, info, warn};

use crate::cleanup::CleanupReport;

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_app_shutdown(exit_code: u8) {
    info!(event = "core.app.shutdown_started", exit_code = exit_code);
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}

/// Final counters of a run that produced a report.
pub fn log_run_report(report: &CleanupReport) {
    let stats = &report.stats;
    if report.has_failures() {
        warn!(
            event = "core.app.run_failed",
            duration_ms = report.duration().num_milliseconds(),
            resources_deleted = stats.deleted_resources(),
            resources_failed = stats.failed_resources(),
            groups_deleted = stats.deleted_containers(),
            groups_failed = stats.failed_containers(),
            group_listing_failed = report.container_sweep_error.is_some()
        );
    } else {
        info!(
            event = "core.app.run_succeeded",
            duration_ms = report.duration().num_milliseconds(),
            resources_deleted = stats.deleted_resources(),
            groups_deleted = stats.deleted_containers()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::RunStats;
    use chrono::Utc;

    #[test]
    fn test_app_events() {
        // Event functions must not panic without a subscriber installed
        log_app_startup();
        log_app_shutdown(0);

        let test_error = std::io::Error::other("test");
        log_app_error(&test_error);
    }

    #[test]
    fn test_run_report_events() {
        let now = Utc::now();
        let mut stats = RunStats::new();
        stats.record_resource_attempt(false);
        let report = CleanupReport {
            stats,
            started_at: now,
            finished_at: now,
            container_sweep_error: None,
            fail_on_container_errors: true,
        };
        assert!(report.has_failures());
        log_run_report(&report);

        let clean = CleanupReport {
            stats: RunStats::new(),
            ..report
        };
        assert!(!clean.has_failures());
        log_run_report(&clean);
    }
}
