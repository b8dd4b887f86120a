//! Wire-format stability tests for findings, fixes, and reports.

use packfix_types::artifact::{PackfixReport, ReportStatus, RunInfo, ToolInfo};
use packfix_types::finding::{Finding, FindingCode, FixOp, Severity};
use packfix_types::report::ValidationReport;
use pretty_assertions::assert_eq;

#[test]
fn finding_codes_serialize_to_stable_strings() {
    let cases = [
        (FindingCode::MissingRequiredFile, "MISSING_REQUIRED_FILE"),
        (FindingCode::MalformedXml, "MALFORMED_XML"),
        (FindingCode::FileReadError, "FILE_READ_ERROR"),
        (FindingCode::BrokenRelationship, "BROKEN_RELATIONSHIP"),
        (
            FindingCode::MissingContentTypeTarget,
            "MISSING_CONTENT_TYPE_TARGET",
        ),
        (FindingCode::OrphanSlide, "ORPHAN_SLIDE"),
    ];
    for (code, expected) in cases {
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, format!("\"{expected}\""));
        assert_eq!(code.as_str(), expected);
        assert_eq!(code.to_string(), expected);
    }
}

#[test]
fn fix_op_uses_tagged_representation() {
    let op = FixOp::InsertClosingTag {
        path: "ppt/slides/slide1.xml".into(),
        line: 2,
        element: "a:t".to_string(),
    };
    let value = serde_json::to_value(&op).unwrap();
    assert_eq!(value["type"], "insert_closing_tag");
    assert_eq!(value["path"], "ppt/slides/slide1.xml");
    assert_eq!(value["line"], 2);
    assert_eq!(value["element"], "a:t");

    let back: FixOp = serde_json::from_value(value).unwrap();
    assert_eq!(back, op);
}

#[test]
fn finding_roundtrips_with_fix_attached() {
    let finding = Finding::error(FindingCode::BrokenRelationship, "broken relationship")
        .with_file("ppt/_rels/presentation.xml.rels")
        .with_suggestion("remove the relationship entry")
        .with_fix(FixOp::RemoveXmlFragment {
            path: "ppt/_rels/presentation.xml.rels".into(),
            fragment: "<Relationship Id=\"rId9\" Target=\"slides/slide9.xml\"/>".to_string(),
        });

    assert!(finding.fixable());
    let json = serde_json::to_string(&finding).unwrap();
    let back: Finding = serde_json::from_str(&json).unwrap();
    assert_eq!(back, finding);
}

#[test]
fn optional_fields_are_omitted_when_absent() {
    let finding = Finding::error(FindingCode::FileReadError, "could not read file");
    let value = serde_json::to_value(&finding).unwrap();
    let obj = value.as_object().unwrap();
    assert!(!obj.contains_key("file"));
    assert!(!obj.contains_key("line"));
    assert!(!obj.contains_key("suggestion"));
    assert!(!obj.contains_key("fix"));
}

#[test]
fn report_buckets_by_severity_and_tracks_validity() {
    let findings = vec![
        Finding::warning(FindingCode::OrphanSlide, "orphan"),
        Finding::error(FindingCode::MalformedXml, "bad xml"),
        Finding::new(Severity::Info, FindingCode::OrphanSlide, "note"),
    ];
    let report = ValidationReport::from_findings(findings);
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.info.len(), 1);
    assert_eq!(report.counts().errors, 1);

    let order: Vec<_> = report.iter_all().map(|f| f.severity).collect();
    assert_eq!(order, vec![Severity::Error, Severity::Warning, Severity::Info]);
}

#[test]
fn empty_report_is_valid() {
    let report = ValidationReport::from_findings(vec![]);
    assert!(report.valid);
    assert_eq!(report.fixable_count(), 0);
}

#[test]
fn report_artifact_roundtrips() {
    let report = ValidationReport::from_findings(vec![Finding::warning(
        FindingCode::MissingContentTypeTarget,
        "stray override",
    )]);
    let artifact = PackfixReport::new(
        ToolInfo {
            name: "packfix".to_string(),
            version: "0.1.0".to_string(),
        },
        RunInfo {
            started_at: "2026-01-01T00:00:00Z".to_string(),
            ended_at: None,
            duration_ms: Some(12),
        },
        report,
    );
    assert_eq!(artifact.status, ReportStatus::Warn);

    let json = serde_json::to_string_pretty(&artifact).unwrap();
    let back: PackfixReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.schema, "packfix.report.v1");
    assert_eq!(back.counts.warnings, 1);
    assert_eq!(back.status, ReportStatus::Warn);
}
