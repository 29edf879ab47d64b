//! Aggregate HTML renderer.
//!
//! Rewrites one self-contained HTML file covering every report the runner has
//! recorded so far, so the artifact left behind by a failing test run still
//! shows everything that ran before the failure.

use std::path::{Path, PathBuf};

use crate::error::ConventionError;
use crate::report::{ConventionReport, ReportStatus};
use crate::writer;

use super::{escape_html, ReportRenderer};

/// Default artifact file name.
pub const DEFAULT_FILE_NAME: &str = "Conventions.htm";

/// Writes the cumulative HTML report into a fixed directory.
#[derive(Debug, Clone)]
pub struct HtmlReportRenderer {
    path: PathBuf,
}

impl HtmlReportRenderer {
    /// Renders to `<dir>/Conventions.htm`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_file_name(dir, DEFAULT_FILE_NAME)
    }

    /// Renders to `<dir>/<file_name>`.
    pub fn with_file_name(dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self {
            path: dir.as_ref().join(file_name),
        }
    }

    /// Path of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Builds the HTML document for `reports`.
    pub fn to_html(&self, reports: &[ConventionReport]) -> String {
        let failed = reports.iter().filter(|r| r.is_failure()).count();
        let total = reports.len();

        let mut html = String::with_capacity(4096);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str("<title>Project Conventions</title>\n");
        html.push_str("<style>\n");
        html.push_str(INLINE_CSS);
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str("<h1>Project Conventions</h1>\n");

        let summary_class = if failed == 0 { "summary-pass" } else { "summary-fail" };
        html.push_str(&format!(
            "<p class=\"summary {summary_class}\">{} of {total} convention reports passed</p>\n",
            total - failed
        ));

        for report in reports {
            let status_class = match report.status() {
                ReportStatus::Passed => "status-passed",
                ReportStatus::Failed => "status-failed",
            };
            html.push_str(&format!("<section class=\"convention {status_class}\">\n"));
            html.push_str(&format!(
                "<h2>{} <span class=\"status\">{}</span></h2>\n",
                escape_html(report.title()),
                report.status().label()
            ));
            html.push_str(&format!(
                "<p class=\"data\">{}</p>\n",
                escape_html(report.data_description())
            ));
            if let Some(reason) = report.reason() {
                html.push_str(&format!("<p class=\"reason\">{}</p>\n", escape_html(reason)));
            }

            if report.failures().is_empty() {
                html.push_str("<p class=\"no-failures\">No failures</p>\n");
            } else {
                if report.approved_exceptions().is_some() {
                    html.push_str("<p class=\"approved\">With approved exceptions</p>\n");
                }
                html.push_str("<ul class=\"failures\">\n");
                for line in report.failures() {
                    html.push_str(&format!("<li>{}</li>\n", escape_html(line.text())));
                }
                html.push_str("</ul>\n");
            }
            html.push_str("</section>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

impl ReportRenderer for HtmlReportRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn render(&self, reports: &[ConventionReport]) -> Result<(), ConventionError> {
        let html = self.to_html(reports);
        writer::replace_file(&self.path, &html).map_err(|e| ConventionError::Rendering {
            renderer: "html",
            message: format!("{}: {e}", self.path.display()),
        })
    }
}

const INLINE_CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px auto; max-width: 1000px; color: #333; }
h1 { font-size: 24px; }
h2 { font-size: 18px; margin: 0 0 4px 0; }
.summary { padding: 12px; border-radius: 6px; }
.summary-pass { background: #d4edda; }
.summary-fail { background: #f8d7da; }
.convention { border: 1px solid #ddd; border-radius: 6px; padding: 12px; margin: 12px 0; }
.status-passed { border-left: 4px solid #28a745; }
.status-failed { border-left: 4px solid #dc3545; }
.status { font-size: 12px; color: #666; }
.data { color: #555; font-size: 14px; }
.reason { color: #555; font-size: 13px; font-style: italic; }
.no-failures { color: #28a745; font-style: italic; }
.approved { color: #856404; font-size: 13px; }
.failures { font-family: 'SF Mono', Monaco, Consolas, monospace; font-size: 13px; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_and_lists_every_report() {
        let renderer = HtmlReportRenderer::new("unused");
        let reports = [
            ConventionReport::new("First", "Data", Vec::new()),
            ConventionReport::new("Second", "Data", vec!["Vec<T>".into()]),
        ];
        let html = renderer.to_html(&reports);
        assert!(html.contains("<h2>First <span class=\"status\">PASSED</span></h2>"));
        assert!(html.contains("<li>Vec&lt;T&gt;</li>"));
        assert!(html.contains("1 of 2 convention reports passed"));
    }

    #[test]
    fn shows_reason_when_given() {
        let renderer = HtmlReportRenderer::new("unused");
        let mut explained = ConventionReport::new("First", "Data", Vec::new());
        explained.with_reason("Keeps <dto> types immutable");
        let html = renderer.to_html(&[explained, ConventionReport::new("Second", "Data", Vec::new())]);
        assert!(html.contains("<p class=\"reason\">Keeps &lt;dto&gt; types immutable</p>"));
        assert_eq!(html.matches("class=\"reason\"").count(), 1);
    }

    #[test]
    fn render_overwrites_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = HtmlReportRenderer::new(dir.path());
        renderer
            .render(&[ConventionReport::new("First", "Data", Vec::new())])
            .unwrap();
        renderer
            .render(&[ConventionReport::new("Second", "Data", Vec::new())])
            .unwrap();
        let html = std::fs::read_to_string(dir.path().join(DEFAULT_FILE_NAME)).unwrap();
        assert!(html.contains("Second"));
        assert!(!html.contains("First"));
    }
}
