//! Convention runner: executes conventions, records reports, and renders them.
//!
//! Every call that gets past data source validation ends by re-rendering the
//! aggregate artifacts over the whole registry, whether the call itself
//! succeeds or fails. Aggregate render failures are logged and dropped so they
//! never replace the convention result.

use crate::approval::{ApprovalKey, ApprovalStore, FileApprovalStore};
use crate::convention::{Convention, ConventionData, CreateReportLineFor, SymmetricConvention};
use crate::error::ConventionError;
use crate::registry::ReportRegistry;
use crate::render::{
    ExceptionReporter, HtmlReportRenderer, JsonReportRenderer, ReportRenderer, TextRenderer,
    TraceRenderer,
};
use crate::report::{ConventionReport, ReportLine};
use crate::settings::Settings;

/// Builds the report for one convention direction.
///
/// The source is validated before `failing` runs, so an empty source never
/// reaches the convention.
///
/// # Errors
///
/// Returns [`ConventionError::Configuration`] if the data source is empty.
pub fn build_report<D, T>(
    title: String,
    failing: impl FnOnce() -> Vec<T>,
    data: &D,
) -> Result<ConventionReport, ConventionError>
where
    D: ConventionData + CreateReportLineFor<T>,
{
    data.ensure_has_non_empty_source()?;
    let lines: Vec<ReportLine> = failing()
        .iter()
        .map(|item| data.create_report_line(item))
        .collect();
    Ok(ConventionReport::new(title, data.description(), lines))
}

/// Runs conventions and owns the registry of every report they produced.
///
/// Methods take `&mut self`; to share a runner between threads wrap it in a
/// `Mutex` so each append and its aggregate render happen under one lock.
pub struct ConventionRunner {
    registry: ReportRegistry,
    aggregate: Vec<Box<dyn ReportRenderer>>,
    trace: Option<TraceRenderer>,
    store: Box<dyn ApprovalStore>,
}

impl ConventionRunner {
    /// Creates a runner from default [`Settings`].
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    /// Creates a runner wired from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let report_dir = settings.resolved_report_dir();
        let mut aggregate: Vec<Box<dyn ReportRenderer>> = vec![Box::new(
            HtmlReportRenderer::with_file_name(&report_dir, &settings.report_file_name),
        )];
        if settings.json_report {
            aggregate.push(Box::new(JsonReportRenderer::new(&report_dir)));
        }
        Self {
            registry: ReportRegistry::new(),
            aggregate,
            trace: settings.trace.then_some(TraceRenderer),
            store: Box::new(FileApprovalStore::new(settings.approvals_dir.clone())),
        }
    }

    /// Replaces the baseline store.
    pub fn with_approval_store(mut self, store: impl ApprovalStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Replaces the aggregate renderers.
    pub fn with_aggregate_renderers(mut self, renderers: Vec<Box<dyn ReportRenderer>>) -> Self {
        self.aggregate = renderers;
        self
    }

    /// Every report recorded so far, oldest first.
    pub fn reports(&self) -> &[ConventionReport] {
        self.registry.reports()
    }

    /// The report registry.
    pub fn registry(&self) -> &ReportRegistry {
        &self.registry
    }

    /// The baseline store.
    pub fn approval_store(&self) -> &dyn ApprovalStore {
        &*self.store
    }

    /// Mutable access to the baseline store, for explicit re-approval.
    pub fn approval_store_mut(&mut self) -> &mut dyn ApprovalStore {
        &mut *self.store
    }

    /// Runs `convention` in strict mode, failing if any item violates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConventionError::Configuration`] for an empty source and
    /// [`ConventionError::ConventionFailed`] if the report failed.
    pub fn is<C, D, T>(&mut self, convention: &C, data: &D) -> Result<(), ConventionError>
    where
        C: Convention<D, T> + ?Sized,
        D: ConventionData + CreateReportLineFor<T>,
    {
        self.is_with_reporter(convention, data, &ExceptionReporter)
    }

    /// Runs `convention` and hands its report to `reporter`.
    ///
    /// # Errors
    ///
    /// Returns [`ConventionError::Configuration`] for an empty source, or
    /// whatever `reporter` returns.
    pub fn is_with_reporter<C, D, T>(
        &mut self,
        convention: &C,
        data: &D,
        reporter: &dyn ReportRenderer,
    ) -> Result<(), ConventionError>
    where
        C: Convention<D, T> + ?Sized,
        D: ConventionData + CreateReportLineFor<T>,
    {
        let report = build_report(convention.title(), || convention.failing_data(data), data)?;
        self.record_and_report(vec![explained(report, convention.reason())], reporter)
    }

    /// Runs both directions of `convention` in strict mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConventionError::Configuration`] for an empty source and
    /// [`ConventionError::ConventionFailed`] if either direction failed.
    pub fn is_symmetric<C, D, T>(&mut self, convention: &C, data: &D) -> Result<(), ConventionError>
    where
        C: SymmetricConvention<D, T> + ?Sized,
        D: ConventionData + CreateReportLineFor<T>,
    {
        self.is_symmetric_with_reporter(convention, data, &ExceptionReporter)
    }

    /// Runs both directions of `convention` and hands the pair to `reporter`.
    ///
    /// # Errors
    ///
    /// Returns [`ConventionError::Configuration`] for an empty source, or
    /// whatever `reporter` returns.
    pub fn is_symmetric_with_reporter<C, D, T>(
        &mut self,
        convention: &C,
        data: &D,
        reporter: &dyn ReportRenderer,
    ) -> Result<(), ConventionError>
    where
        C: SymmetricConvention<D, T> + ?Sized,
        D: ConventionData + CreateReportLineFor<T>,
    {
        let (forward, inverse) = build_pair(convention, data)?;
        self.record_and_report(vec![forward, inverse], reporter)
    }

    /// Runs `convention` and compares its rendering, with current failures
    /// attached as approved exceptions, against the stored baseline.
    ///
    /// # Errors
    ///
    /// Returns [`ConventionError::Configuration`] for an empty source,
    /// [`ConventionError::ApprovalMismatch`] if the rendering differs from the
    /// baseline or none was approved yet, and
    /// [`ConventionError::ApprovalStore`] if the store fails.
    pub fn is_with_approved_exceptions<C, D, T>(
        &mut self,
        convention: &C,
        data: &D,
    ) -> Result<(), ConventionError>
    where
        C: Convention<D, T> + ?Sized,
        D: ConventionData + CreateReportLineFor<T>,
    {
        let report = build_report(convention.title(), || convention.failing_data(data), data)?;
        self.record_and_verify(vec![explained(report, convention.reason())])
    }

    /// Symmetric form of [`Self::is_with_approved_exceptions`]; both
    /// directions are verified against one baseline.
    ///
    /// # Errors
    ///
    /// Same as [`Self::is_with_approved_exceptions`].
    pub fn is_symmetric_with_approved_exceptions<C, D, T>(
        &mut self,
        convention: &C,
        data: &D,
    ) -> Result<(), ConventionError>
    where
        C: SymmetricConvention<D, T> + ?Sized,
        D: ConventionData + CreateReportLineFor<T>,
    {
        let (forward, inverse) = build_pair(convention, data)?;
        self.record_and_verify(vec![forward, inverse])
    }

    fn record_and_report(
        &mut self,
        reports: Vec<ConventionReport>,
        reporter: &dyn ReportRenderer,
    ) -> Result<(), ConventionError> {
        let start = self.registry.len();
        for report in reports {
            self.registry.push(report);
        }

        let recorded = &self.registry.reports()[start..];
        // Traced before the reporter runs, so a failing reporter still leaves a trace.
        if let Some(trace) = &self.trace {
            render_best_effort(trace, recorded);
        }
        let outcome = reporter.render(recorded);

        self.render_aggregate();
        outcome
    }

    fn record_and_verify(&mut self, mut reports: Vec<ConventionReport>) -> Result<(), ConventionError> {
        let text = TextRenderer::new();
        for report in &mut reports {
            let items = text.render_items(report);
            report.with_approved_exceptions(items);
        }
        let received = text.render(&reports);
        let key = match reports.as_slice() {
            [forward, inverse] => ApprovalKey::for_pair(forward, inverse),
            [report, ..] => ApprovalKey::for_report(report),
            [] => ApprovalKey::new("convention"),
        };

        let start = self.registry.len();
        for report in reports {
            self.registry.push(report);
        }

        let outcome = self
            .store
            .verify(&key, &received)
            .map_err(ConventionError::from);

        if outcome.is_ok() {
            if let Some(trace) = &self.trace {
                render_best_effort(trace, &self.registry.reports()[start..]);
            }
        }

        self.render_aggregate();
        outcome
    }

    fn render_aggregate(&self) {
        for renderer in &self.aggregate {
            render_best_effort(renderer.as_ref(), self.registry.reports());
        }
    }
}

impl Default for ConventionRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConventionRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let renderers: Vec<&str> = self.aggregate.iter().map(|r| r.name()).collect();
        f.debug_struct("ConventionRunner")
            .field("reports", &self.registry.len())
            .field("aggregate", &renderers)
            .field("trace", &self.trace.is_some())
            .finish_non_exhaustive()
    }
}

fn build_pair<C, D, T>(
    convention: &C,
    data: &D,
) -> Result<(ConventionReport, ConventionReport), ConventionError>
where
    C: SymmetricConvention<D, T> + ?Sized,
    D: ConventionData + CreateReportLineFor<T>,
{
    let forward = build_report(convention.title(), || convention.failing_data(data), data)?;
    let inverse = build_report(
        convention.inverse_title(),
        || convention.failing_inverse_data(data),
        data,
    )?;
    let reason = convention.reason();
    Ok((explained(forward, reason.clone()), explained(inverse, reason)))
}

fn explained(mut report: ConventionReport, reason: Option<String>) -> ConventionReport {
    if let Some(reason) = reason {
        report.with_reason(reason);
    }
    report
}

fn render_best_effort(renderer: &dyn ReportRenderer, reports: &[ConventionReport]) {
    if let Err(e) = renderer.render(reports) {
        tracing::warn!(target: "conventest", renderer = renderer.name(), error = %e, "render failed");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::approval::MemoryApprovalStore;
    use crate::convention::ItemSource;

    struct Flags<'a> {
        failing: &'a [&'a str],
        calls: Cell<usize>,
    }

    impl Convention<ItemSource<String>, String> for Flags<'_> {
        fn title(&self) -> String {
            "MustBeSealed".to_string()
        }

        fn failing_data(&self, data: &ItemSource<String>) -> Vec<String> {
            self.calls.set(self.calls.get() + 1);
            data.items()
                .iter()
                .filter(|i| self.failing.contains(&i.as_str()))
                .cloned()
                .collect()
        }
    }

    fn runner() -> ConventionRunner {
        ConventionRunner::from_settings(&Settings::default().with_trace(false))
            .with_aggregate_renderers(Vec::new())
            .with_approval_store(MemoryApprovalStore::new())
    }

    fn classes(items: &[&str]) -> ItemSource<String> {
        ItemSource::displayed("UserClasses", items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn empty_source_skips_evaluation_and_registry() {
        let mut runner = runner();
        let convention = Flags { failing: &["B"], calls: Cell::new(0) };
        let err = runner.is(&convention, &classes(&[])).unwrap_err();
        assert!(matches!(err, ConventionError::Configuration { .. }));
        assert_eq!(convention.calls.get(), 0);
        assert!(runner.reports().is_empty());
    }

    #[test]
    fn failed_report_is_recorded_before_error() {
        let mut runner = runner();
        let convention = Flags { failing: &["B"], calls: Cell::new(0) };
        let err = runner.is(&convention, &classes(&["A", "B", "C"])).unwrap_err();
        assert!(err.is_convention_failure());
        assert_eq!(runner.reports().len(), 1);
        assert_eq!(runner.reports()[0].failures()[0].text(), "B");
    }

    #[test]
    fn approved_mode_attaches_exceptions() {
        let mut runner = runner();
        let convention = Flags { failing: &["B"], calls: Cell::new(0) };
        let err = runner
            .is_with_approved_exceptions(&convention, &classes(&["A", "B"]))
            .unwrap_err();
        assert!(err.is_not_yet_approved());
        assert_eq!(runner.reports()[0].approved_exceptions(), Some("- B"));
    }

    struct Explained;

    impl Convention<ItemSource<String>, String> for Explained {
        fn title(&self) -> String {
            "MustBeSealed".to_string()
        }

        fn failing_data(&self, _data: &ItemSource<String>) -> Vec<String> {
            Vec::new()
        }

        fn reason(&self) -> Option<String> {
            Some("Sealed classes cannot be subclassed by accident".to_string())
        }
    }

    #[test]
    fn reason_is_carried_onto_the_report() {
        let mut runner = runner();
        runner.is(&Explained, &classes(&["A"])).unwrap();
        let convention = Flags { failing: &[], calls: Cell::new(0) };
        runner.is(&convention, &classes(&["A"])).unwrap();

        assert_eq!(
            runner.reports()[0].reason(),
            Some("Sealed classes cannot be subclassed by accident")
        );
        assert_eq!(runner.reports()[1].reason(), None);
    }
}
