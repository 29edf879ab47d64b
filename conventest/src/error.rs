//! Error types returned by convention runs, approvals, and renderers.

use std::path::PathBuf;

use thiserror::Error;

use crate::approval::ApprovalError;

/// Errors produced while running a convention.
#[derive(Debug, Error)]
pub enum ConventionError {
    /// The data source enumerated no items. A convention over an empty source
    /// would pass vacuously, so this is reported as a broken test setup.
    #[error("no data in '{description}': the data source is empty, check the query that builds it")]
    Configuration {
        /// Description of the offending data source.
        description: String,
    },

    /// One or more reports failed in strict mode.
    #[error("{}", failed_summary(.failures))]
    ConventionFailed {
        /// `(title, failure count)` of every failed report, in render order.
        failures: Vec<(String, usize)>,
    },

    /// The rendered report no longer matches the approved baseline.
    #[error("Approved exceptions for convention differs\n\n{0}")]
    ApprovalMismatch(#[source] ApprovalError),

    /// The approval store could not be read or written.
    #[error("approval store failed: {0}")]
    ApprovalStore(#[source] ApprovalError),

    /// A renderer could not produce its artifact.
    #[error("{renderer} renderer failed: {message}")]
    Rendering {
        /// Name of the renderer that failed.
        renderer: &'static str,
        /// Human-readable cause.
        message: String,
    },

    /// Settings could not be read or parsed.
    #[error("invalid settings in {}: {message}", .path.display())]
    Settings {
        /// File the settings were read from.
        path: PathBuf,
        /// Parser or I/O message.
        message: String,
    },
}

impl ConventionError {
    /// Returns true for [`ConventionError::ConventionFailed`].
    pub fn is_convention_failure(&self) -> bool {
        matches!(self, Self::ConventionFailed { .. })
    }

    /// Returns true for [`ConventionError::ApprovalMismatch`].
    pub fn is_approval_mismatch(&self) -> bool {
        matches!(self, Self::ApprovalMismatch(_))
    }

    /// Returns true when the mismatch is due to a missing baseline rather
    /// than a changed one.
    pub fn is_not_yet_approved(&self) -> bool {
        matches!(
            self,
            Self::ApprovalMismatch(ApprovalError::NotYetApproved { .. })
        )
    }
}

impl From<ApprovalError> for ConventionError {
    fn from(err: ApprovalError) -> Self {
        match err {
            ApprovalError::Io { .. } => Self::ApprovalStore(err),
            other => Self::ApprovalMismatch(other),
        }
    }
}

fn failed_summary(failures: &[(String, usize)]) -> String {
    let mut out = String::from("Convention(s) failed:");
    for (title, count) in failures {
        let noun = if *count == 1 { "failure" } else { "failures" };
        out.push_str(&format!("\n  '{title}': {count} {noun}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_message_lists_titles_and_counts() {
        let err = ConventionError::ConventionFailed {
            failures: vec![("MustBeSealed".to_string(), 1), ("HasCtor".to_string(), 3)],
        };
        let msg = err.to_string();
        assert!(msg.contains("'MustBeSealed': 1 failure"));
        assert!(msg.contains("'HasCtor': 3 failures"));
        assert!(err.is_convention_failure());
        assert!(!err.is_approval_mismatch());
    }

    #[test]
    fn configuration_message_names_source() {
        let err = ConventionError::Configuration {
            description: "UserClasses".to_string(),
        };
        assert!(err.to_string().contains("'UserClasses'"));
    }
}
