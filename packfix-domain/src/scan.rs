use crate::tree::WorkTree;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Directories that are never part of a package.
const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules"];

/// Relative paths to every XML part and every relationship part,
/// in deterministic traversal order.
#[derive(Debug, Clone, Default)]
pub struct ScanIndex {
    pub xml_parts: Vec<Utf8PathBuf>,
    pub rels_parts: Vec<Utf8PathBuf>,
}

/// Walk the tree and index its parts.
///
/// Traversal is lexicographic per directory level, so the index (and
/// everything downstream of it) is stable across filesystems.
pub fn scan_tree(tree: &WorkTree) -> anyhow::Result<ScanIndex> {
    let root = tree.root();
    let mut index = ScanIndex::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e));

    for entry in walker {
        let entry = entry.with_context(|| format!("walk {}", root))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root.as_std_path()) else {
            continue;
        };
        let Some(rel) = Utf8Path::from_path(rel) else {
            warn!(path = %rel.display(), "skipping non-UTF-8 path");
            continue;
        };

        let name = rel.file_name().unwrap_or_default();
        if name.ends_with(".rels") {
            index.rels_parts.push(rel.to_path_buf());
        } else if name.ends_with(".xml") {
            index.xml_parts.push(rel.to_path_buf());
        }
    }

    Ok(index)
}

fn is_excluded(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}
