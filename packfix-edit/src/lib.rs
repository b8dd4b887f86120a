//! Fix engine for packfix findings.
//!
//! Responsibilities:
//! - Interpret the tagged fix operations attached to findings.
//! - Apply them to the working tree, sequentially, recording a
//!   per-finding result and before/after file digests.
//! - Generate a unified diff of everything a pass changed.
//!
//! The engine never re-validates; callers must re-run the checker
//! pipeline after a pass with any successful fix, because fixes can
//! both resolve and create findings.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use fs_err as fs;
use packfix_types::finding::FixOp;
use packfix_types::fix::{FileChange, FixResult, FixStatus, FixSummary};
use packfix_types::report::ValidationReport;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::{debug, warn};

mod fragment;
mod unclosed;

/// Allow/deny gate over finding codes, `glob`-style patterns.
#[derive(Debug, Clone, Default)]
pub struct FixPolicy {
    /// If non-empty, only matching codes are eligible.
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl FixPolicy {
    pub fn admits(&self, code: &str) -> bool {
        if !self.allow.is_empty() && !self.allow.iter().any(|p| pattern_matches(p, code)) {
            return false;
        }
        !self.deny.iter().any(|p| pattern_matches(p, code))
    }
}

fn pattern_matches(pattern: &str, code: &str) -> bool {
    glob::Pattern::new(pattern)
        .map(|p| p.matches(code))
        .unwrap_or(false)
}

/// Outcome of one fix pass.
#[derive(Debug, Clone)]
pub struct FixPass {
    pub results: Vec<FixResult>,
    pub summary: FixSummary,
    /// Unified diff of every file the pass rewrote or deleted.
    pub patch: String,
}

/// Apply every fixable finding of a report, errors before warnings.
///
/// Failures are recorded, never propagated; one stubborn fix does not
/// stop the rest of the pass.
pub fn apply_fixes(root: &Utf8Path, report: &ValidationReport, policy: &FixPolicy) -> FixPass {
    let mut results = Vec::new();
    let mut summary = FixSummary::default();
    let mut before: BTreeMap<Utf8PathBuf, Option<String>> = BTreeMap::new();

    for finding in report.iter_all() {
        let Some(op) = &finding.fix else {
            continue;
        };

        if !policy.admits(finding.code.as_str()) {
            summary.skipped += 1;
            results.push(FixResult {
                code: finding.code,
                status: FixStatus::Skipped,
                message: finding.message.clone(),
                detail: Some("skipped: denied by policy".to_string()),
                files: Vec::new(),
            });
            continue;
        }

        summary.attempted += 1;

        let touched = op_paths(op);
        let mut snapshot = Vec::new();
        for path in &touched {
            let contents = read_optional(root, path);
            before.entry(path.clone()).or_insert_with(|| contents.clone());
            snapshot.push((path.clone(), contents));
        }

        let (status, detail) = match apply_fix_op(root, op) {
            Ok(true) => (FixStatus::Fixed, None),
            Ok(false) => (FixStatus::Failed, Some("fix made no change".to_string())),
            Err(err) => {
                warn!(code = %finding.code, error = %format!("{err:#}"), "fix failed");
                (FixStatus::Failed, Some(format!("{err:#}")))
            }
        };
        match status {
            FixStatus::Fixed => summary.fixed += 1,
            _ => summary.failed += 1,
        }

        results.push(FixResult {
            code: finding.code,
            status,
            message: finding.message.clone(),
            detail,
            files: file_changes(root, &snapshot),
        });
    }

    let patch = render_patch(root, &before);
    debug!(
        attempted = summary.attempted,
        fixed = summary.fixed,
        failed = summary.failed,
        skipped = summary.skipped,
        "fix pass complete"
    );
    FixPass {
        results,
        summary,
        patch,
    }
}

/// Interpret one fix operation. `Ok(true)` means the tree changed.
pub fn apply_fix_op(root: &Utf8Path, op: &FixOp) -> anyhow::Result<bool> {
    match op {
        FixOp::InsertClosingTag {
            path,
            line,
            element,
        } => unclosed::fix_unclosed_tag(&abs_path(root, path), *line, element),
        FixOp::RemoveXmlFragment { path, fragment } => {
            fragment::remove_from_file(&abs_path(root, path), fragment)
        }
        FixOp::DeleteFiles { paths } => delete_files(root, paths),
    }
}

/// Delete the listed files. The first path is the primary; the fix
/// only counts when it was actually removed. Missing trailing paths
/// (e.g. a slide without a rels sidecar) are fine.
fn delete_files(root: &Utf8Path, paths: &[Utf8PathBuf]) -> anyhow::Result<bool> {
    let mut primary_removed = false;
    for (i, path) in paths.iter().enumerate() {
        let abs = abs_path(root, path);
        if abs.exists() {
            fs::remove_file(&abs).with_context(|| format!("delete {}", abs))?;
            if i == 0 {
                primary_removed = true;
            }
        }
    }
    Ok(primary_removed)
}

fn op_paths(op: &FixOp) -> Vec<Utf8PathBuf> {
    match op {
        FixOp::InsertClosingTag { path, .. } | FixOp::RemoveXmlFragment { path, .. } => {
            vec![path.clone()]
        }
        FixOp::DeleteFiles { paths } => paths.clone(),
    }
}

fn abs_path(root: &Utf8Path, rel: &Utf8Path) -> Utf8PathBuf {
    if rel.is_absolute() {
        rel.to_path_buf()
    } else {
        root.join(rel)
    }
}

fn read_optional(root: &Utf8Path, rel: &Utf8Path) -> Option<String> {
    fs::read_to_string(abs_path(root, rel)).ok()
}

fn sha256_hex(contents: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents.as_bytes());
    hex::encode(hasher.finalize())
}

fn file_changes(root: &Utf8Path, snapshot: &[(Utf8PathBuf, Option<String>)]) -> Vec<FileChange> {
    let mut changes = Vec::new();
    for (path, old) in snapshot {
        let new = read_optional(root, path);
        if old == &new {
            continue;
        }
        changes.push(FileChange {
            path: path.to_string(),
            sha256_before: old.as_deref().map(sha256_hex),
            sha256_after: new.as_deref().map(sha256_hex),
        });
    }
    changes
}

fn render_patch(root: &Utf8Path, before: &BTreeMap<Utf8PathBuf, Option<String>>) -> String {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for (path, old) in before {
        let old = old.clone().unwrap_or_default();
        let new = read_optional(root, path).unwrap_or_default();
        if old == new {
            continue;
        }

        out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
        out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

        let patch = diffy::create_patch(&old, &new);
        out.push_str(&formatter.fmt_patch(&patch).to_string());
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}
