//! Strict-mode gate: fails when any report failed.

use crate::error::ConventionError;
use crate::report::ConventionReport;

use super::ReportRenderer;

/// Returns [`ConventionError::ConventionFailed`] naming every failed report.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExceptionReporter;

impl ReportRenderer for ExceptionReporter {
    fn name(&self) -> &'static str {
        "exception"
    }

    fn render(&self, reports: &[ConventionReport]) -> Result<(), ConventionError> {
        let failures: Vec<(String, usize)> = reports
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| (r.title().to_string(), r.failure_count()))
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ConventionError::ConventionFailed { failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_when_nothing_failed() {
        let report = ConventionReport::new("MustBeSealed", "UserClasses", Vec::new());
        assert!(ExceptionReporter.render(&[report]).is_ok());
    }

    #[test]
    fn lists_only_failed_reports() {
        let ok = ConventionReport::new("Forward", "Data", Vec::new());
        let bad = ConventionReport::new("Inverse", "Data", vec!["x".into(), "y".into()]);
        match ExceptionReporter.render(&[ok, bad]) {
            Err(ConventionError::ConventionFailed { failures }) => {
                assert_eq!(failures, vec![("Inverse".to_string(), 2)]);
            }
            other => panic!("expected ConventionFailed, got {other:?}"),
        }
    }
}
