//! Result aggregation.

use spyglass_core::{Finding, ModuleOutcome, OutcomeStatus};

/// Flatten module outcomes into the final findings list.
///
/// Findings keep the completion order of their outcomes; the "None
/// found" sentinel rows are dropped. No deduplication happens across
/// sources: two modules reporting the same fact yield two findings.
#[must_use]
pub fn collect_findings(outcomes: &[ModuleOutcome]) -> Vec<Finding> {
    outcomes
        .iter()
        .filter(|outcome| outcome.status != OutcomeStatus::Skipped)
        .flat_map(|outcome| outcome.findings.iter())
        .filter(|finding| !finding.is_none_found())
        .cloned()
        .collect()
}
