use super::Check;
use crate::scan::ScanIndex;
use crate::tree::WorkTree;
use camino::Utf8Path;
use fs_err as fs;
use packfix_types::finding::{Finding, FindingCode, FixOp};
use tracing::debug;

const SLIDES_DIR: &str = "ppt/slides";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

/// Finds numbered slide parts the presentation never references.
///
/// Detection is textual: a slide is reachable iff its
/// `slides/slideN.xml` reference string occurs anywhere in the root
/// document's relationship part.
pub struct OrphanSlides;

impl Check for OrphanSlides {
    fn name(&self) -> &'static str {
        "orphan-slides"
    }

    fn codes(&self) -> &'static [FindingCode] {
        &[FindingCode::OrphanSlide]
    }

    fn run(&self, tree: &WorkTree, _scan: &ScanIndex) -> Vec<Finding> {
        let slides_dir = tree.abs(Utf8Path::new(SLIDES_DIR));
        if !slides_dir.is_dir() || !tree.exists(Utf8Path::new(PRESENTATION_RELS)) {
            return Vec::new();
        }
        let rels_content = match tree.read_to_string(Utf8Path::new(PRESENTATION_RELS)) {
            Ok(content) => content,
            Err(err) => {
                debug!(error = %err, "skipping orphan detection, presentation rels unreadable");
                return Vec::new();
            }
        };

        let mut findings = Vec::new();
        for name in numbered_slides(slides_dir.as_std_path()) {
            if rels_content.contains(&format!("slides/{name}")) {
                continue;
            }
            let slide_path = format!("{SLIDES_DIR}/{name}");
            let sidecar = format!("{SLIDES_DIR}/_rels/{name}.rels");
            findings.push(
                Finding::warning(
                    FindingCode::OrphanSlide,
                    format!("slide not referenced in presentation: {name}"),
                )
                .with_file(slide_path.clone())
                .with_suggestion(format!(
                    "add a relationship in {PRESENTATION_RELS} or delete the orphan slide"
                ))
                .with_fix(FixOp::DeleteFiles {
                    paths: vec![slide_path.into(), sidecar.into()],
                }),
            );
        }
        findings
    }
}

/// `slideN.xml` file names in the slides directory, ordered by N.
fn numbered_slides(dir: &std::path::Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut slides: Vec<(u64, String)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            slide_number(&name).map(|n| (n, name))
        })
        .collect();
    slides.sort();
    slides.into_iter().map(|(_, name)| name).collect()
}

fn slide_number(name: &str) -> Option<u64> {
    let digits = name.strip_prefix("slide")?.strip_suffix(".xml")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
