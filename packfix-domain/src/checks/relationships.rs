use super::Check;
use crate::scan::ScanIndex;
use crate::tree::WorkTree;
use crate::xml::extract_elements;
use camino::{Utf8Path, Utf8PathBuf};
use packfix_types::finding::{Finding, FindingCode, FixOp};
use tracing::debug;

/// Resolves every non-external relationship target against the tree.
///
/// A relationship part at `X/_rels/Y.rels` describes part `X/Y`, so
/// relative targets resolve against `X`, two levels above the part.
pub struct RelationshipIntegrity;

impl Check for RelationshipIntegrity {
    fn name(&self) -> &'static str {
        "relationship-integrity"
    }

    fn codes(&self) -> &'static [FindingCode] {
        &[FindingCode::BrokenRelationship]
    }

    fn run(&self, tree: &WorkTree, scan: &ScanIndex) -> Vec<Finding> {
        let mut findings = Vec::new();
        for rels in &scan.rels_parts {
            let content = match tree.read_to_string(rels) {
                Ok(content) => content,
                Err(err) => {
                    // Unreadable relationship parts are not re-reported
                    // here; checks stay independent.
                    debug!(file = %rels, error = %err, "skipping unreadable relationship part");
                    continue;
                }
            };

            let base = owner_dir(rels);
            for entry in extract_elements(&content, "Relationship") {
                let Some(target) = entry.attr("Target") else {
                    continue;
                };
                if is_external(target) {
                    continue;
                }

                let resolved = resolve_target(&base, target);
                if !tree.exists(&resolved) {
                    findings.push(
                        Finding::error(
                            FindingCode::BrokenRelationship,
                            format!("broken relationship: {target} does not exist"),
                        )
                        .with_file(rels.clone())
                        .with_suggestion(format!(
                            "add the missing file or remove the relationship from {rels}"
                        ))
                        .with_fix(FixOp::RemoveXmlFragment {
                            path: rels.clone(),
                            fragment: entry.fragment,
                        }),
                    );
                }
            }
        }
        findings
    }
}

fn is_external(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

/// Directory owning the parts a relationship part describes: the
/// parent of its `_rels` directory.
fn owner_dir(rels: &Utf8Path) -> Utf8PathBuf {
    rels.parent()
        .and_then(Utf8Path::parent)
        .map(Utf8Path::to_path_buf)
        .unwrap_or_default()
}

fn resolve_target(base: &Utf8Path, target: &str) -> Utf8PathBuf {
    match target.strip_prefix('/') {
        // Absolute part names are root-relative.
        Some(rooted) => Utf8PathBuf::from(rooted),
        None => base.join(target),
    }
}
