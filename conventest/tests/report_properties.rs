//! Property tests over arbitrary sources and failure selections.

use std::collections::HashSet;

use conventest::{
    ApprovalStore, Convention, ConventionReport, ConventionRunner, ItemSource,
    MemoryApprovalStore, ReportLine, ReportStatus, Settings, TextRenderer,
};
use proptest::prelude::*;

/// Fails every item whose index is in the set.
struct FailsIndices(HashSet<usize>);

impl Convention<ItemSource<(usize, String)>, (usize, String)> for FailsIndices {
    fn title(&self) -> String {
        "Selected items".to_string()
    }

    fn failing_data(&self, data: &ItemSource<(usize, String)>) -> Vec<(usize, String)> {
        data.items()
            .iter()
            .filter(|(i, _)| self.0.contains(i))
            .cloned()
            .collect()
    }
}

fn source(names: &[String]) -> ItemSource<(usize, String)> {
    ItemSource::new(
        "Generated",
        names.iter().cloned().enumerate().collect(),
        |(i, name): &(usize, String)| format!("{i}: {name}").into(),
    )
}

fn approved_text(failures: &[String]) -> String {
    let renderer = TextRenderer::new();
    let lines = failures.iter().map(|f| ReportLine::new(f.as_str())).collect();
    let mut report = ConventionReport::new("Selected items", "Generated", lines);
    let items = renderer.render_items(&report);
    report.with_approved_exceptions(items);
    renderer.render(&[report])
}

fn quiet_runner() -> ConventionRunner {
    ConventionRunner::from_settings(&Settings::default().with_trace(false))
        .with_aggregate_renderers(Vec::new())
        .with_approval_store(MemoryApprovalStore::new())
}

proptest! {
    #[test]
    fn report_lines_follow_evaluation_order(
        names in prop::collection::vec("[a-zA-Z]{1,8}", 1..20),
        picks in prop::collection::hash_set(0usize..20, 0..20),
    ) {
        let data = source(&names);
        let convention = FailsIndices(picks);
        let expected: Vec<String> = convention
            .failing_data(&data)
            .iter()
            .map(|(i, n)| format!("{i}: {n}"))
            .collect();

        let mut runner = quiet_runner();
        let outcome = runner.is(&convention, &data);

        let report = &runner.reports()[0];
        let lines: Vec<String> = report.failures().iter().map(|l| l.text().to_string()).collect();
        prop_assert_eq!(&lines, &expected);
        prop_assert_eq!(report.status() == ReportStatus::Passed, expected.is_empty());
        prop_assert_eq!(outcome.is_ok(), expected.is_empty());
    }

    #[test]
    fn text_rendering_is_idempotent(
        names in prop::collection::vec("[a-z ]{0,12}", 1..10),
        picks in prop::collection::hash_set(0usize..10, 0..10),
    ) {
        let mut runner = quiet_runner();
        let _ = runner.is(&FailsIndices(picks), &source(&names));
        let renderer = TextRenderer::new();
        prop_assert_eq!(renderer.render(runner.reports()), renderer.render(runner.reports()));
    }

    #[test]
    fn approving_own_rendering_never_reports_a_difference(
        names in prop::collection::vec("[a-z]{1,6}", 1..10),
        picks in prop::collection::hash_set(0usize..10, 0..10),
    ) {
        let data = source(&names);
        let convention = FailsIndices(picks);

        let mut runner = quiet_runner();
        let first = runner.is_with_approved_exceptions(&convention, &data);
        prop_assert!(first.unwrap_err().is_not_yet_approved());

        let key = conventest::ApprovalKey::for_report(&runner.reports()[0]);
        let received = TextRenderer::new().render(runner.reports());
        runner.approval_store_mut().approve(&key, &received).unwrap();

        prop_assert!(runner.is_with_approved_exceptions(&convention, &data).is_ok());
        prop_assert!(runner.is_with_approved_exceptions(&convention, &data).is_ok());
    }

    #[test]
    fn different_failure_lists_render_differently(
        first in prop::collection::vec("[a-z ]{0,3}", 0..5),
        second in prop::collection::vec("[a-z ]{0,3}", 0..5),
    ) {
        prop_assume!(first != second);
        prop_assert_ne!(approved_text(&first), approved_text(&second));
    }
}
