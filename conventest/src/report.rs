//! Convention report types: report lines, status, and the per-run report.

use serde::Serialize;

/// Outcome of a single convention run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportStatus {
    /// No item violated the convention.
    Passed,
    /// At least one item violated the convention.
    Failed,
}

impl ReportStatus {
    /// Short upper-case label used by the renderers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
        }
    }
}

/// One failing item, as rendered by the data source.
///
/// Two lines are the same exception when their text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReportLine(String);

impl ReportLine {
    /// Creates a report line from display text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The rendered text of the line.
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReportLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ReportLine {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ReportLine {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// The result of running one convention (or one direction of a symmetric
/// convention) against a data source.
///
/// Status is fixed at construction from the failure list. Attaching approved
/// exceptions affects rendering only.
#[derive(Debug, Clone, Serialize)]
pub struct ConventionReport {
    title: String,
    data_description: String,
    status: ReportStatus,
    failures: Vec<ReportLine>,
    approved_exceptions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl ConventionReport {
    /// Creates a report; the status is derived from `failures`.
    pub fn new(
        title: impl Into<String>,
        data_description: impl Into<String>,
        failures: Vec<ReportLine>,
    ) -> Self {
        let status = if failures.is_empty() {
            ReportStatus::Passed
        } else {
            ReportStatus::Failed
        };
        Self {
            title: title.into(),
            data_description: data_description.into(),
            status,
            failures,
            approved_exceptions: None,
            reason: None,
        }
    }

    /// Attaches the canonical text of accepted failures.
    pub fn with_approved_exceptions(&mut self, text: impl Into<String>) {
        self.approved_exceptions = Some(text.into());
    }

    /// Attaches the convention's explanation of why it exists.
    pub fn with_reason(&mut self, reason: impl Into<String>) {
        self.reason = Some(reason.into());
    }

    /// Convention (or inverse) title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description of the data the convention examined.
    pub fn data_description(&self) -> &str {
        &self.data_description
    }

    /// Pass/fail outcome.
    pub fn status(&self) -> ReportStatus {
        self.status
    }

    /// Failing items in the order the convention produced them.
    pub fn failures(&self) -> &[ReportLine] {
        &self.failures
    }

    /// Approved exception text, if any was attached.
    pub fn approved_exceptions(&self) -> Option<&str> {
        self.approved_exceptions.as_deref()
    }

    /// Why the convention exists, if it says.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns true if the report failed.
    pub fn is_failure(&self) -> bool {
        self.status == ReportStatus::Failed
    }

    /// Number of failing items.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_failures() {
        let passed = ConventionReport::new("MustBeSealed", "UserClasses", Vec::new());
        assert_eq!(passed.status(), ReportStatus::Passed);
        assert!(!passed.is_failure());

        let failed = ConventionReport::new("MustBeSealed", "UserClasses", vec!["B".into()]);
        assert_eq!(failed.status(), ReportStatus::Failed);
        assert_eq!(failed.failure_count(), 1);
    }

    #[test]
    fn approved_exceptions_leave_status_alone() {
        let mut report = ConventionReport::new("MustBeSealed", "UserClasses", vec!["B".into()]);
        report.with_approved_exceptions("B");
        assert_eq!(report.status(), ReportStatus::Failed);
        assert_eq!(report.approved_exceptions(), Some("B"));
    }

    #[test]
    fn reason_is_optional() {
        let mut report = ConventionReport::new("MustBeSealed", "UserClasses", Vec::new());
        assert_eq!(report.reason(), None);
        report.with_reason("Sealed classes are faster to dispatch");
        assert_eq!(report.reason(), Some("Sealed classes are faster to dispatch"));
        assert_eq!(report.status(), ReportStatus::Passed);
    }
}
