use super::Check;
use crate::scan::ScanIndex;
use crate::tree::WorkTree;
use camino::Utf8Path;
use packfix_types::finding::{Finding, FindingCode};

/// Parts a presentation package cannot exist without.
pub const REQUIRED_PARTS: [&str; 4] = [
    "[Content_Types].xml",
    "_rels/.rels",
    "ppt/presentation.xml",
    "ppt/_rels/presentation.xml.rels",
];

/// Confirms the package-mandatory parts are present.
///
/// Missing parts are not reconstructible by heuristics, so these
/// findings are never fixable.
pub struct RequiredParts;

impl Check for RequiredParts {
    fn name(&self) -> &'static str {
        "required-parts"
    }

    fn codes(&self) -> &'static [FindingCode] {
        &[FindingCode::MissingRequiredFile]
    }

    fn run(&self, tree: &WorkTree, _scan: &ScanIndex) -> Vec<Finding> {
        let mut findings = Vec::new();
        for part in REQUIRED_PARTS {
            if !tree.exists(Utf8Path::new(part)) {
                findings.push(
                    Finding::error(
                        FindingCode::MissingRequiredFile,
                        format!("required file missing: {part}"),
                    )
                    .with_file(part)
                    .with_suggestion(
                        "this file is essential for a valid package; \
                         restore it from the original container",
                    ),
                );
            }
        }
        findings
    }
}
