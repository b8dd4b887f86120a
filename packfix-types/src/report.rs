use crate::finding::{Finding, Severity};
use serde::{Deserialize, Serialize};

/// The outcome of one full checker pass over a working tree.
///
/// Bucket order follows checker execution order, then discovery order
/// within a checker. `valid` means "no errors"; warnings alone do not
/// block packaging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,

    #[serde(default)]
    pub errors: Vec<Finding>,

    #[serde(default)]
    pub warnings: Vec<Finding>,

    #[serde(default)]
    pub info: Vec<Finding>,
}

impl ValidationReport {
    /// Bucket findings by severity, preserving their relative order.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let mut report = ValidationReport::default();
        for finding in findings {
            match finding.severity {
                Severity::Error => report.errors.push(finding),
                Severity::Warning => report.warnings.push(finding),
                Severity::Info => report.info.push(finding),
            }
        }
        report.valid = report.errors.is_empty();
        report
    }

    /// Errors first, then warnings, then info; the order the fix
    /// engine consumes findings in.
    pub fn iter_all(&self) -> impl Iterator<Item = &Finding> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.info.iter())
    }

    pub fn counts(&self) -> ReportCounts {
        ReportCounts {
            info: self.info.len() as u64,
            warnings: self.warnings.len() as u64,
            errors: self.errors.len() as u64,
        }
    }

    /// Number of findings the edit engine could attempt to repair.
    pub fn fixable_count(&self) -> u64 {
        self.iter_all().filter(|f| f.fixable()).count() as u64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub info: u64,
    pub warnings: u64,
    pub errors: u64,
}
