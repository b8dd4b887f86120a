use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a finding. Only errors block packaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Stable finding codes.
///
/// These strings are part of the wire contract shared with downstream
/// packaging tooling; they must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCode {
    MissingRequiredFile,
    MalformedXml,
    FileReadError,
    BrokenRelationship,
    MissingContentTypeTarget,
    OrphanSlide,
}

impl FindingCode {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingCode::MissingRequiredFile => "MISSING_REQUIRED_FILE",
            FindingCode::MalformedXml => "MALFORMED_XML",
            FindingCode::FileReadError => "FILE_READ_ERROR",
            FindingCode::BrokenRelationship => "BROKEN_RELATIONSHIP",
            FindingCode::MissingContentTypeTarget => "MISSING_CONTENT_TYPE_TARGET",
            FindingCode::OrphanSlide => "ORPHAN_SLIDE",
        }
    }

    pub fn all() -> &'static [FindingCode] {
        &[
            FindingCode::MissingRequiredFile,
            FindingCode::MalformedXml,
            FindingCode::FileReadError,
            FindingCode::BrokenRelationship,
            FindingCode::MissingContentTypeTarget,
            FindingCode::OrphanSlide,
        ]
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repair operation attached to a finding.
///
/// Fix operations carry the full inputs of the repair so they can be
/// serialized with the finding and replayed by the edit engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FixOp {
    /// Insert `</element>` into `path`, guided by the 1-based line the
    /// parser reported.
    InsertClosingTag {
        path: Utf8PathBuf,
        line: u64,
        element: String,
    },
    /// Remove one exact XML fragment (a whole element) from `path`.
    RemoveXmlFragment {
        path: Utf8PathBuf,
        fragment: String,
    },
    /// Delete files; the first path is the primary and must go away
    /// for the fix to count as applied.
    DeleteFiles { paths: Vec<Utf8PathBuf> },
}

impl FixOp {
    /// The file this operation is primarily about, for reporting.
    pub fn primary_path(&self) -> &Utf8Path {
        match self {
            FixOp::InsertClosingTag { path, .. } => path,
            FixOp::RemoveXmlFragment { path, .. } => path,
            FixOp::DeleteFiles { paths } => paths
                .first()
                .map(Utf8PathBuf::as_path)
                .unwrap_or_else(|| Utf8Path::new("")),
        }
    }
}

/// One validation finding.
///
/// Findings are immutable value records; the attached fix operation is
/// stateless data interpreted by `packfix-edit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: FindingCode,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixOp>,
}

impl Finding {
    pub fn error(code: FindingCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: FindingCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn new(severity: Severity, code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            file: None,
            line: None,
            suggestion: None,
            fix: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<Utf8PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_fix(mut self, fix: FixOp) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Whether the edit engine can attempt an automatic repair.
    pub fn fixable(&self) -> bool {
        self.fix.is_some()
    }
}
