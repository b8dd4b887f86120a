use super::Check;
use crate::scan::ScanIndex;
use crate::tree::WorkTree;
use crate::xml::scan_well_formed;
use packfix_types::finding::{Finding, FindingCode, FixOp};

/// Parses every XML part for syntactic validity.
///
/// One corruption shape is auto-fixable: an element left open when a
/// later close tag (or end of input) arrives, the classic hand-edited
/// inline text run. Everything else stays for manual repair.
pub struct WellFormedness;

impl Check for WellFormedness {
    fn name(&self) -> &'static str {
        "well-formedness"
    }

    fn codes(&self) -> &'static [FindingCode] {
        &[FindingCode::MalformedXml, FindingCode::FileReadError]
    }

    fn run(&self, tree: &WorkTree, scan: &ScanIndex) -> Vec<Finding> {
        let mut findings = Vec::new();
        for part in &scan.xml_parts {
            let content = match tree.read_to_string(part) {
                Ok(content) => content,
                Err(err) => {
                    // Each file's check is isolated; keep going.
                    findings.push(
                        Finding::error(
                            FindingCode::FileReadError,
                            format!("could not read file: {err:#}"),
                        )
                        .with_file(part.clone()),
                    );
                    continue;
                }
            };

            if let Some(issue) = scan_well_formed(&content) {
                let mut finding = Finding::error(
                    FindingCode::MalformedXml,
                    format!("XML syntax error: {}", issue.message),
                )
                .with_file(part.clone())
                .with_line(issue.line)
                .with_suggestion("fix the XML syntax error and run validation again");

                if let Some(element) = issue.unclosed {
                    finding = finding.with_fix(FixOp::InsertClosingTag {
                        path: part.clone(),
                        line: issue.line,
                        element,
                    });
                }
                findings.push(finding);
            }
        }
        findings
    }
}
