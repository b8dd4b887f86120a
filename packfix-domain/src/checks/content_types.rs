use super::Check;
use crate::scan::ScanIndex;
use crate::tree::WorkTree;
use crate::xml::extract_elements;
use camino::Utf8Path;
use packfix_types::finding::{Finding, FindingCode, FixOp};
use tracing::debug;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Checks that every content-type Override points at a real part.
///
/// Stray overrides are tolerated by PowerPoint-class consumers, so
/// this is advisory only: warnings, never errors.
pub struct ContentTypes;

impl Check for ContentTypes {
    fn name(&self) -> &'static str {
        "content-types"
    }

    fn codes(&self) -> &'static [FindingCode] {
        &[FindingCode::MissingContentTypeTarget]
    }

    fn run(&self, tree: &WorkTree, _scan: &ScanIndex) -> Vec<Finding> {
        let part = Utf8Path::new(CONTENT_TYPES_PART);
        if !tree.exists(part) {
            // The required-parts check already reports the absence.
            return Vec::new();
        }
        let content = match tree.read_to_string(part) {
            Ok(content) => content,
            Err(err) => {
                debug!(error = %err, "skipping unreadable content-type registry");
                return Vec::new();
            }
        };

        let mut findings = Vec::new();
        for entry in extract_elements(&content, "Override") {
            let Some(part_name) = entry.attr("PartName") else {
                continue;
            };
            let target = part_name.strip_prefix('/').unwrap_or(part_name);
            if !tree.exists(Utf8Path::new(target)) {
                findings.push(
                    Finding::warning(
                        FindingCode::MissingContentTypeTarget,
                        format!("content types references missing file: {part_name}"),
                    )
                    .with_file(CONTENT_TYPES_PART)
                    .with_suggestion(format!(
                        "remove the Override entry or add the file: {target}"
                    ))
                    .with_fix(FixOp::RemoveXmlFragment {
                        path: CONTENT_TYPES_PART.into(),
                        fragment: entry.fragment,
                    }),
                );
            }
        }
        findings
    }
}
