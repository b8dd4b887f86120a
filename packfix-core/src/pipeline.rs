//! The validate pipeline: scan, check, optionally fix, re-check.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use fs_err as fs;
use packfix_domain::{WorkTree, run_checks};
use packfix_edit::{FixPass, FixPolicy, apply_fixes};
use packfix_types::artifact::{PackfixReport, RunInfo, ToolInfo};
use packfix_types::report::ValidationReport;
use tracing::{debug, info};

use crate::settings::ValidateSettings;

/// A failure of the tool itself, as opposed to findings about the
/// tree. Callers map this to the setup-failure exit code.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Everything one validate run produced.
#[derive(Debug)]
pub struct ValidateOutcome {
    /// The report that reflects the tree as it is now. After a pass
    /// with any successful fix this is a fresh re-check, never the
    /// pre-fix report.
    pub report: ValidationReport,

    /// Present when `--fix` ran (even if nothing was fixable).
    pub fix_pass: Option<FixPass>,

    pub artifact: PackfixReport,
}

/// Run the whole pipeline against `settings.work_dir`.
pub fn run_validate(
    settings: &ValidateSettings,
    tool: ToolInfo,
) -> Result<ValidateOutcome, ToolError> {
    let started = Utc::now();
    info!(work_dir = %settings.work_dir, fix = settings.fix, "validating");

    let tree = WorkTree::open(settings.work_dir.clone())?;
    let mut report = run_checks(&tree)?;

    let fix_pass = if settings.fix {
        let policy = FixPolicy {
            allow: settings.allow.clone(),
            deny: settings.deny.clone(),
        };
        let pass = apply_fixes(tree.root(), &report, &policy);
        if pass.summary.fixed > 0 {
            // Fixes can both resolve and create findings; the report
            // must describe the tree as it is after the pass.
            debug!(fixed = pass.summary.fixed, "re-checking after fixes");
            report = run_checks(&tree)?;
        }
        Some(pass)
    } else {
        None
    };

    let ended = Utc::now();
    let run = RunInfo {
        started_at: started.to_rfc3339(),
        ended_at: Some(ended.to_rfc3339()),
        duration_ms: Some((ended - started).num_milliseconds().max(0) as u64),
    };

    let mut artifact = PackfixReport::new(tool, run, report.clone());
    if let Some(pass) = &fix_pass {
        artifact.fixes = Some(pass.summary);
    }

    Ok(ValidateOutcome {
        report,
        fix_pass,
        artifact,
    })
}

/// Write `report.json` under `out_dir`, creating it if needed.
pub fn write_report_artifact(
    out_dir: &Utf8Path,
    artifact: &PackfixReport,
) -> anyhow::Result<Utf8PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join("report.json");
    let mut body = serde_json::to_string_pretty(artifact)?;
    body.push('\n');
    fs::write(&path, body)?;
    Ok(path)
}
