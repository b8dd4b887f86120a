use crate::scan::{ScanIndex, scan_tree};
use crate::tree::WorkTree;
use packfix_types::finding::{Finding, FindingCode};
use packfix_types::report::ValidationReport;
use tracing::debug;

mod content_types;
mod orphans;
mod relationships;
mod required;
mod wellformed;

/// One integrity check over the working tree.
///
/// Checks are read-only and independent; each converts per-file
/// trouble into findings instead of failing.
pub trait Check {
    fn name(&self) -> &'static str;

    /// Finding codes this check can emit.
    fn codes(&self) -> &'static [FindingCode];

    fn run(&self, tree: &WorkTree, scan: &ScanIndex) -> Vec<Finding>;
}

/// All checks, in report order.
pub fn builtin_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(required::RequiredParts),
        Box::new(wellformed::WellFormedness),
        Box::new(relationships::RelationshipIntegrity),
        Box::new(content_types::ContentTypes),
        Box::new(orphans::OrphanSlides),
    ]
}

/// Run the full checker pipeline once.
///
/// Fails only on the scanner's root precondition; everything else
/// lands in the report.
pub fn run_checks(tree: &WorkTree) -> anyhow::Result<ValidationReport> {
    let scan = scan_tree(tree)?;
    let mut findings = Vec::new();
    for check in builtin_checks() {
        let found = check.run(tree, &scan);
        debug!(check = check.name(), findings = found.len(), "check complete");
        findings.extend(found);
    }
    Ok(ValidationReport::from_findings(findings))
}
