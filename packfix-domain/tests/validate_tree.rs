//! Checker pipeline tests over on-disk fixture trees.

use camino::Utf8PathBuf;
use packfix_domain::{WorkTree, run_checks};
use packfix_types::finding::{Finding, FindingCode};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
  <Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
  <Override PartName="/ppt/slides/slide2.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
</Types>
"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>
"#;

const PRESENTATION_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/>
</Relationships>
"#;

const PRESENTATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldIdLst/></p:presentation>
"#;

fn slide(text: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <p:sld xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" \
         xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">\
         <p:cSld><a:r><a:t>{text}</a:t></a:r></p:cSld></p:sld>\n"
    )
}

struct Fixture {
    td: TempDir,
}

impl Fixture {
    fn valid() -> Self {
        let td = tempfile::tempdir().expect("tempdir");
        let root = td.path();
        for dir in ["_rels", "ppt/_rels", "ppt/slides/_rels"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("[Content_Types].xml"), CONTENT_TYPES).unwrap();
        fs::write(root.join("_rels/.rels"), ROOT_RELS).unwrap();
        fs::write(root.join("ppt/presentation.xml"), PRESENTATION).unwrap();
        fs::write(root.join("ppt/_rels/presentation.xml.rels"), PRESENTATION_RELS).unwrap();
        fs::write(root.join("ppt/slides/slide1.xml"), slide("One")).unwrap();
        fs::write(root.join("ppt/slides/slide2.xml"), slide("Two")).unwrap();
        Self { td }
    }

    fn path(&self, rel: &str) -> std::path::PathBuf {
        self.td.path().join(rel)
    }

    fn tree(&self) -> WorkTree {
        let root = Utf8PathBuf::from_path_buf(self.td.path().to_path_buf()).unwrap();
        WorkTree::open(root).unwrap()
    }
}

fn with_code<'a>(findings: &'a [Finding], code: FindingCode) -> Vec<&'a Finding> {
    findings.iter().filter(|f| f.code == code).collect()
}

#[test]
fn valid_tree_produces_empty_report() {
    let fixture = Fixture::valid();
    let report = run_checks(&fixture.tree()).unwrap();
    assert!(report.valid, "unexpected findings: {report:#?}");
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn each_missing_required_part_is_reported_exactly_once() {
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "ppt/presentation.xml",
        "ppt/_rels/presentation.xml.rels",
    ] {
        let fixture = Fixture::valid();
        fs::remove_file(fixture.path(part)).unwrap();

        let report = run_checks(&fixture.tree()).unwrap();
        assert!(!report.valid);
        let missing = with_code(&report.errors, FindingCode::MissingRequiredFile);
        assert_eq!(missing.len(), 1, "for removed part {part}");
        assert_eq!(missing[0].file.as_deref(), Some(camino::Utf8Path::new(part)));
        assert!(!missing[0].fixable());
    }
}

#[test]
fn unclosed_inline_text_yields_one_fixable_malformed_xml() {
    let fixture = Fixture::valid();
    let corrupted = slide("One").replace("<a:t>One</a:t>", "<a:t>One<a:r></a:r>");
    assert!(corrupted.contains("<a:t>One<a:r>"), "fixture must stay corrupted");
    fs::write(fixture.path("ppt/slides/slide1.xml"), corrupted).unwrap();

    let report = run_checks(&fixture.tree()).unwrap();
    let malformed = with_code(&report.errors, FindingCode::MalformedXml);
    assert_eq!(malformed.len(), 1);
    let finding = malformed[0];
    assert!(finding.fixable());
    assert_eq!(
        finding.file.as_deref(),
        Some(camino::Utf8Path::new("ppt/slides/slide1.xml"))
    );
    assert!(finding.line.is_some());
}

#[test]
fn unreadable_file_does_not_abort_other_checks() {
    let fixture = Fixture::valid();
    // A directory where an XML part is expected: read fails, scan still
    // lists it as a part.
    fs::remove_file(fixture.path("ppt/slides/slide2.xml")).unwrap();
    fs::create_dir(fixture.path("ppt/slides/slide2.xml")).unwrap();

    let report = run_checks(&fixture.tree()).unwrap();
    // slide2 read error is reported, slide1 is still checked cleanly.
    assert!(report.errors.iter().any(|f| f.code == FindingCode::FileReadError));
}

#[test]
fn broken_relationship_is_reported_with_removal_fix() {
    let fixture = Fixture::valid();
    fs::remove_file(fixture.path("ppt/slides/slide2.xml")).unwrap();

    let report = run_checks(&fixture.tree()).unwrap();
    let broken = with_code(&report.errors, FindingCode::BrokenRelationship);
    assert_eq!(broken.len(), 1);
    let finding = broken[0];
    assert!(finding.message.contains("slides/slide2.xml"));
    assert_eq!(
        finding.file.as_deref(),
        Some(camino::Utf8Path::new("ppt/_rels/presentation.xml.rels"))
    );
    assert!(finding.fixable());
}

#[test]
fn external_targets_are_never_broken_relationships() {
    let fixture = Fixture::valid();
    let rels = PRESENTATION_RELS.replace(
        "</Relationships>",
        "  <Relationship Id=\"rId9\" Type=\"t\" Target=\"https://example.com/deck\"/>\n</Relationships>",
    );
    fs::write(fixture.path("ppt/_rels/presentation.xml.rels"), rels).unwrap();

    let report = run_checks(&fixture.tree()).unwrap();
    assert!(with_code(&report.errors, FindingCode::BrokenRelationship).is_empty());
}

#[test]
fn stray_content_type_override_is_advisory() {
    let fixture = Fixture::valid();
    let registry = CONTENT_TYPES.replace(
        "</Types>",
        "  <Override PartName=\"/ppt/slides/slide9.xml\" ContentType=\"ct\"/>\n</Types>",
    );
    fs::write(fixture.path("[Content_Types].xml"), registry).unwrap();

    let report = run_checks(&fixture.tree()).unwrap();
    assert!(report.valid, "stray overrides must not block packaging");
    let stray = with_code(&report.warnings, FindingCode::MissingContentTypeTarget);
    assert_eq!(stray.len(), 1);
    assert!(stray[0].fixable());
    assert!(stray[0].message.contains("/ppt/slides/slide9.xml"));
}

#[test]
fn unreferenced_slide_is_an_orphan_warning() {
    let fixture = Fixture::valid();
    fs::write(fixture.path("ppt/slides/slide3.xml"), slide("Three")).unwrap();
    fs::write(
        fixture.path("ppt/slides/_rels/slide3.xml.rels"),
        "<?xml version=\"1.0\"?>\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"/>\n",
    )
    .unwrap();

    let report = run_checks(&fixture.tree()).unwrap();
    assert!(report.valid, "orphans are advisory: {report:#?}");
    let orphans = with_code(&report.warnings, FindingCode::OrphanSlide);
    assert_eq!(orphans.len(), 1);
    assert!(orphans[0].message.contains("slide3.xml"));
    assert!(orphans[0].fixable());
}

#[test]
fn validation_is_idempotent() {
    let fixture = Fixture::valid();
    fs::remove_file(fixture.path("ppt/slides/slide2.xml")).unwrap();
    fs::write(fixture.path("ppt/slides/slide4.xml"), slide("Four")).unwrap();

    let first = run_checks(&fixture.tree()).unwrap();
    let second = run_checks(&fixture.tree()).unwrap();
    assert_eq!(first, second);
}
