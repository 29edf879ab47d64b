//! Trace renderer: one `tracing` event per report.

use crate::error::ConventionError;
use crate::report::ConventionReport;

use super::ReportRenderer;

/// Emits a short diagnostic event for each report. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceRenderer;

impl ReportRenderer for TraceRenderer {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn render(&self, reports: &[ConventionReport]) -> Result<(), ConventionError> {
        for report in reports {
            if report.is_failure() {
                let lines: Vec<&str> = report.failures().iter().map(|l| l.text()).collect();
                tracing::warn!(
                    target: "conventest",
                    convention = report.title(),
                    data = report.data_description(),
                    failures = report.failure_count(),
                    approved = report.approved_exceptions().is_some(),
                    reason = report.reason().unwrap_or_default(),
                    "'{}' for '{}' failed: {}",
                    report.title(),
                    report.data_description(),
                    lines.join(", ")
                );
            } else {
                tracing::info!(
                    target: "conventest",
                    convention = report.title(),
                    data = report.data_description(),
                    reason = report.reason().unwrap_or_default(),
                    "'{}' for '{}' passed",
                    report.title(),
                    report.data_description()
                );
            }
        }
        Ok(())
    }
}
