//! Runner settings, loaded from TOML or built in code.
//!
//! ```toml
//! report_dir = "target/conventions"
//! report_file_name = "Conventions.htm"
//! json_report = true
//! approvals_dir = "tests/approvals"
//! trace = true
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConventionError;
use crate::render::html;

/// Settings for a [`crate::ConventionRunner`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory of the aggregate artifacts. `None` means the directory of
    /// the running executable.
    pub report_dir: Option<PathBuf>,
    /// File name of the HTML artifact.
    pub report_file_name: String,
    /// Also write `Conventions.json` next to the HTML artifact.
    pub json_report: bool,
    /// Directory of approved baselines.
    pub approvals_dir: PathBuf,
    /// Emit trace events for each report.
    pub trace: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report_dir: None,
            report_file_name: html::DEFAULT_FILE_NAME.to_string(),
            json_report: false,
            approvals_dir: PathBuf::from("approvals"),
            trace: true,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConventionError::Settings`] if the text is not valid settings TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, ConventionError> {
        toml::from_str(text).map_err(|e| ConventionError::Settings {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    /// Reads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConventionError::Settings`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConventionError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConventionError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConventionError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Sets the artifact directory.
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }

    /// Sets the baseline directory.
    pub fn with_approvals_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.approvals_dir = dir.into();
        self
    }

    /// Enables or disables the JSON artifact.
    pub fn with_json_report(mut self, enabled: bool) -> Self {
        self.json_report = enabled;
        self
    }

    /// Enables or disables trace events.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    /// The artifact directory: `report_dir`, else the executable's directory,
    /// else the current directory.
    pub fn resolved_report_dir(&self) -> PathBuf {
        if let Some(dir) = &self.report_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn toml_overrides() {
        let settings = Settings::from_toml_str(
            "report_dir = \"out\"\njson_report = true\napprovals_dir = \"tests/approvals\"\ntrace = false\n",
        )
        .unwrap();
        assert_eq!(settings.resolved_report_dir(), PathBuf::from("out"));
        assert!(settings.json_report);
        assert_eq!(settings.approvals_dir, PathBuf::from("tests/approvals"));
        assert!(!settings.trace);
        assert_eq!(settings.report_file_name, "Conventions.htm");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, ConventionError::Settings { .. }));
    }

    #[test]
    fn default_report_dir_is_executable_dir() {
        let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(Settings::default().resolved_report_dir(), exe_dir);
    }
}
