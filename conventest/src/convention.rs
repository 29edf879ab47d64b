//! Convention and data source capabilities.
//!
//! A convention yields the items of a data source that violate its rule. The
//! data source describes itself, guarantees it is not empty, and turns a
//! failing item into a [`ReportLine`].

use crate::error::ConventionError;
use crate::report::ReportLine;

/// A data source a convention can be run against.
pub trait ConventionData {
    /// Human-readable description of the data set.
    fn description(&self) -> &str;

    /// Returns true if the source enumerated at least one item.
    fn has_data(&self) -> bool;

    /// Fails when the source is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConventionError::Configuration`] if [`Self::has_data`] is false.
    fn ensure_has_non_empty_source(&self) -> Result<(), ConventionError> {
        if self.has_data() {
            Ok(())
        } else {
            Err(ConventionError::Configuration {
                description: self.description().to_string(),
            })
        }
    }
}

/// Turns a failing item into a report line.
pub trait CreateReportLineFor<T> {
    /// Renders one failing item.
    fn create_report_line(&self, item: &T) -> ReportLine;
}

/// A one-directional rule over a data source of `T` items.
pub trait Convention<D, T> {
    /// Name shown in reports.
    fn title(&self) -> String;

    /// Items violating the rule, in source order.
    fn failing_data(&self, data: &D) -> Vec<T>;

    /// Why the rule exists, shown next to the report in the aggregate
    /// artifact and trace output. Not part of the baseline text.
    fn reason(&self) -> Option<String> {
        None
    }
}

/// A rule together with its logical inverse, checked against the same data.
pub trait SymmetricConvention<D, T> {
    /// Name of the forward rule.
    fn title(&self) -> String;

    /// Items violating the forward rule.
    fn failing_data(&self, data: &D) -> Vec<T>;

    /// Name of the inverse rule.
    fn inverse_title(&self) -> String;

    /// Items violating the inverse rule.
    fn failing_inverse_data(&self, data: &D) -> Vec<T>;

    /// Why the pair of rules exists; attached to both directions' reports.
    fn reason(&self) -> Option<String> {
        None
    }
}

type LineFn<T> = Box<dyn Fn(&T) -> ReportLine>;

/// A data source over a materialized list of items.
pub struct ItemSource<T> {
    description: String,
    items: Vec<T>,
    line: LineFn<T>,
}

impl<T> ItemSource<T> {
    /// Creates a source whose report lines are produced by `line`.
    pub fn new(
        description: impl Into<String>,
        items: Vec<T>,
        line: impl Fn(&T) -> ReportLine + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            items,
            line: Box::new(line),
        }
    }

    /// The items this source enumerates.
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T: std::fmt::Display> ItemSource<T> {
    /// Creates a source whose report lines are the items' `Display` output.
    pub fn displayed(description: impl Into<String>, items: Vec<T>) -> Self {
        Self::new(description, items, |item: &T| ReportLine::new(item.to_string()))
    }
}

impl<T> ConventionData for ItemSource<T> {
    fn description(&self) -> &str {
        &self.description
    }

    fn has_data(&self) -> bool {
        !self.items.is_empty()
    }
}

impl<T> CreateReportLineFor<T> for ItemSource<T> {
    fn create_report_line(&self, item: &T) -> ReportLine {
        (self.line)(item)
    }
}

impl<T> std::fmt::Debug for ItemSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemSource")
            .field("description", &self.description)
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}
