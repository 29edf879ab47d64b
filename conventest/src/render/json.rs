//! Aggregate JSON renderer for machine consumption of the registry.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ConventionError;
use crate::report::ConventionReport;
use crate::writer;

use super::ReportRenderer;

/// Default artifact file name.
pub const DEFAULT_FILE_NAME: &str = "Conventions.json";

#[derive(Serialize)]
struct Document<'a> {
    total: usize,
    failed: usize,
    reports: &'a [ConventionReport],
}

/// Writes every recorded report as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonReportRenderer {
    path: PathBuf,
}

impl JsonReportRenderer {
    /// Renders to `<dir>/Conventions.json`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(DEFAULT_FILE_NAME),
        }
    }

    /// Path of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes `reports`.
    ///
    /// # Errors
    ///
    /// Returns [`ConventionError::Rendering`] if serialization fails.
    pub fn to_json(&self, reports: &[ConventionReport]) -> Result<String, ConventionError> {
        let doc = Document {
            total: reports.len(),
            failed: reports.iter().filter(|r| r.is_failure()).count(),
            reports,
        };
        serde_json::to_string_pretty(&doc).map_err(|e| ConventionError::Rendering {
            renderer: "json",
            message: e.to_string(),
        })
    }
}

impl ReportRenderer for JsonReportRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, reports: &[ConventionReport]) -> Result<(), ConventionError> {
        let json = self.to_json(reports)?;
        writer::replace_file(&self.path, &json).map_err(|e| ConventionError::Rendering {
            renderer: "json",
            message: format!("{}: {e}", self.path.display()),
        })
    }
}
