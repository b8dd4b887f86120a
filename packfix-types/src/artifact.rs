use crate::fix::FixSummary;
use crate::report::{ReportCounts, ValidationReport};
use serde::{Deserialize, Serialize};

/// On-disk report artifact (`report.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackfixReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub status: ReportStatus,
    pub counts: ReportCounts,
    pub report: ValidationReport,

    /// Present when a fix pass ran before the final re-check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixes: Option<FixSummary>,
}

impl PackfixReport {
    pub fn new(tool: ToolInfo, run: RunInfo, report: ValidationReport) -> Self {
        let status = if !report.errors.is_empty() {
            ReportStatus::Fail
        } else if !report.warnings.is_empty() {
            ReportStatus::Warn
        } else {
            ReportStatus::Pass
        };
        Self {
            schema: crate::schema::PACKFIX_REPORT_V1.to_string(),
            tool,
            run,
            status,
            counts: report.counts(),
            report,
            fixes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub started_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pass,
    Warn,
    Fail,
}
