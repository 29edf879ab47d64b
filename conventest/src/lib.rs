//! Convention verification harness.
//!
//! A convention is a rule over a data source that yields the items violating
//! it. This crate runs conventions, records a report per run, renders the
//! reports, and optionally diffs them against an approved baseline so known
//! exceptions stop failing the build while new ones still do.
//!
//! # Modes
//!
//! | Call | Fails when |
//! |------|------------|
//! | [`ConventionRunner::is`] | any item violates the convention |
//! | [`ConventionRunner::is_symmetric`] | either the rule or its inverse has violations |
//! | [`ConventionRunner::is_with_approved_exceptions`] | the rendering differs from the baseline |
//! | [`ConventionRunner::is_symmetric_with_approved_exceptions`] | the paired rendering differs from the baseline |
//!
//! # Entry Point
//!
//! ```no_run
//! use conventest::{Convention, ConventionRunner, ItemSource, Settings};
//!
//! struct MustBeSealed;
//!
//! impl Convention<ItemSource<String>, String> for MustBeSealed {
//!     fn title(&self) -> String {
//!         "Classes must be sealed".to_string()
//!     }
//!
//!     fn failing_data(&self, data: &ItemSource<String>) -> Vec<String> {
//!         data.items().iter().filter(|c| !c.ends_with("Sealed")).cloned().collect()
//!     }
//! }
//!
//! # fn main() -> Result<(), conventest::ConventionError> {
//! let mut runner = ConventionRunner::from_settings(
//!     &Settings::default().with_report_dir("target/conventions"),
//! );
//! let classes = ItemSource::displayed("UserClasses", vec!["OrderSealed".to_string()]);
//! runner.is(&MustBeSealed, &classes)?;
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod approval;
pub mod convention;
pub mod engine;
pub mod error;
pub mod registry;
pub mod render;
pub mod report;
pub mod settings;
pub mod writer;

pub use approval::{ApprovalError, ApprovalKey, ApprovalStore, FileApprovalStore, MemoryApprovalStore};
pub use convention::{Convention, ConventionData, CreateReportLineFor, ItemSource, SymmetricConvention};
pub use engine::ConventionRunner;
pub use error::ConventionError;
pub use registry::ReportRegistry;
pub use render::{ReportRenderer, TextRenderer};
pub use report::{ConventionReport, ReportLine, ReportStatus};
pub use settings::Settings;
