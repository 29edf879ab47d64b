//! Report renderers.
//!
//! | Renderer | Consumes | Output |
//! |----------|----------|--------|
//! | [`TraceRenderer`] | reports of one run | `tracing` events |
//! | [`ExceptionReporter`] | reports of one run | `Err` when any report failed |
//! | [`HtmlReportRenderer`] | whole registry | `Conventions.htm` |
//! | [`JsonReportRenderer`] | whole registry | `Conventions.json` |
//! | [`TextRenderer`] | reports of one run | canonical text for baselines |

pub mod exception;
pub mod html;
pub mod json;
pub mod text;
pub mod trace;

pub use exception::ExceptionReporter;
pub use html::HtmlReportRenderer;
pub use json::JsonReportRenderer;
pub use text::TextRenderer;
pub use trace::TraceRenderer;

use crate::error::ConventionError;
use crate::report::ConventionReport;

/// Consumes one or more reports.
///
/// Symmetric conventions hand both directions to a single call so the
/// renderer can present them together.
pub trait ReportRenderer {
    /// Short identifier used in log events and errors.
    fn name(&self) -> &'static str;

    /// Renders `reports`.
    ///
    /// # Errors
    ///
    /// Gate renderers return [`ConventionError::ConventionFailed`]; artifact
    /// renderers return [`ConventionError::Rendering`] on write failures.
    fn render(&self, reports: &[ConventionReport]) -> Result<(), ConventionError>;
}

/// Escapes text for inclusion in HTML element content and attributes.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
