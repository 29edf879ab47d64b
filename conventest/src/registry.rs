//! Append-only registry of every report produced by a runner.
//!
//! The registry is owned by a [`crate::ConventionRunner`] and mutated through
//! `&mut` access only. Sharing one registry between threads needs an external
//! lock held across the append and the aggregate render that follows it.

use crate::report::ConventionReport;

/// Ordered history of convention reports. Never pruned.
#[derive(Debug, Default)]
pub struct ReportRegistry {
    reports: Vec<ConventionReport>,
}

impl ReportRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a report to the history.
    pub fn push(&mut self, report: ConventionReport) {
        self.reports.push(report);
    }

    /// All reports, oldest first.
    pub fn reports(&self) -> &[ConventionReport] {
        &self.reports
    }

    /// Number of reports recorded.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns true if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Number of recorded reports that failed.
    pub fn failure_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_failure()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut registry = ReportRegistry::new();
        assert!(registry.is_empty());
        registry.push(ConventionReport::new("First", "Data", vec!["x".into()]));
        registry.push(ConventionReport::new("Second", "Data", Vec::new()));

        let titles: Vec<&str> = registry.reports().iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.failure_count(), 1);
    }
}
