//! Plain-text renderer producing the canonical form compared against baselines.
//!
//! Output uses `\n` line endings only and preserves report and line order, so
//! identical reports render to identical bytes on every platform.
//!
//! ```text
//! 'MustBeSealed' for 'UserClasses'
//! --------------------------------
//!
//! With approved exceptions (1):
//! - B
//! ```
//!
//! Every failure line carries a `- ` prefix and each block states its failure
//! count, so empty or multi-line item texts still render to distinct output.

use crate::report::ConventionReport;

const NO_ITEMS: &str = "(none)";

/// Renders reports to canonical text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl TextRenderer {
    /// Creates the renderer.
    pub fn new() -> Self {
        Self
    }

    /// Renders the failure lines of one report as `- <line>`, one per line,
    /// in order. A report without failures renders to the empty string.
    pub fn render_items(&self, report: &ConventionReport) -> String {
        report
            .failures()
            .iter()
            .map(|line| format!("- {}", line.text()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders every report as a titled block.
    ///
    /// A report carrying approved exceptions lists them under a
    /// `With approved exceptions (N):` heading in place of its raw failures;
    /// otherwise they appear under `Failures (N):`.
    pub fn render(&self, reports: &[ConventionReport]) -> String {
        let blocks: Vec<String> = reports.iter().map(|r| self.render_block(r)).collect();
        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }

    fn render_block(&self, report: &ConventionReport) -> String {
        let title = format!("'{}' for '{}'", report.title(), report.data_description());
        let underline = "-".repeat(title.chars().count());

        let count = report.failure_count();
        let mut out = format!("{title}\n{underline}\n\n");
        match report.approved_exceptions() {
            Some(approved) => {
                out.push_str(&format!("With approved exceptions ({count}):\n"));
                out.push_str(non_empty(approved));
            }
            None => {
                let items = self.render_items(report);
                out.push_str(&format!("Failures ({count}):\n"));
                out.push_str(non_empty(&items));
            }
        }
        out
    }
}

fn non_empty(text: &str) -> &str {
    if text.is_empty() {
        NO_ITEMS
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportLine;

    fn sealed(failures: &[&str]) -> ConventionReport {
        ConventionReport::new(
            "MustBeSealed",
            "UserClasses",
            failures.iter().map(|f| ReportLine::new(*f)).collect(),
        )
    }

    #[test]
    fn renders_failures_under_title() {
        let text = TextRenderer::new().render(&[sealed(&["B", "D"])]);
        assert_eq!(
            text,
            "'MustBeSealed' for 'UserClasses'\n--------------------------------\n\nFailures (2):\n- B\n- D\n"
        );
    }

    #[test]
    fn renders_approved_exceptions() {
        let renderer = TextRenderer::new();
        let mut report = sealed(&["B"]);
        let items = renderer.render_items(&report);
        report.with_approved_exceptions(items);
        let text = renderer.render(&[report]);
        assert!(text.ends_with("\n\nWith approved exceptions (1):\n- B\n"));
    }

    #[test]
    fn passed_report_renders_placeholder() {
        let renderer = TextRenderer::new();
        let report = sealed(&[]);
        assert_eq!(renderer.render_items(&report), "");
        assert!(renderer.render(&[report]).ends_with("\n\nFailures (0):\n(none)\n"));
    }

    #[test]
    fn empty_item_text_is_still_a_failure() {
        let renderer = TextRenderer::new();
        let mut passed = sealed(&[]);
        passed.with_approved_exceptions(renderer.render_items(&passed));
        let mut blank = sealed(&[""]);
        blank.with_approved_exceptions(renderer.render_items(&blank));
        assert_ne!(renderer.render(&[passed]), renderer.render(&[blank]));
    }

    #[test]
    fn trailing_blank_failure_changes_rendering() {
        let renderer = TextRenderer::new();
        let mut before = sealed(&["B"]);
        before.with_approved_exceptions(renderer.render_items(&before));
        let mut after = sealed(&["B", ""]);
        after.with_approved_exceptions(renderer.render_items(&after));

        let after_text = renderer.render(&[after]);
        assert_ne!(renderer.render(&[before]), after_text);
        assert!(after_text.ends_with("With approved exceptions (2):\n- B\n- \n"));
    }

    #[test]
    fn multi_line_item_is_counted_once() {
        let renderer = TextRenderer::new();
        let joined = renderer.render(&[sealed(&["B\n- C"])]);
        let split = renderer.render(&[sealed(&["B", "C"])]);
        assert_ne!(joined, split);
        assert!(joined.contains("Failures (1):"));
    }

    #[test]
    fn reason_stays_out_of_baseline_text() {
        let renderer = TextRenderer::new();
        let plain = sealed(&["B"]);
        let mut explained = sealed(&["B"]);
        explained.with_reason("Sealed classes cannot be mocked by accident");
        assert_eq!(renderer.render(&[plain]), renderer.render(&[explained]));
    }

    #[test]
    fn rendering_is_stable() {
        let renderer = TextRenderer::new();
        let reports = [sealed(&["B"]), sealed(&["C", "A"])];
        assert_eq!(renderer.render(&reports), renderer.render(&reports));
    }
}
