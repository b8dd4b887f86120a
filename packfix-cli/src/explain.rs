//! Finding-code explanations for the `packfix explain` command.

use packfix_types::finding::FindingCode;

/// Reference entry for one finding code.
#[derive(Debug, Clone)]
pub struct CodeExplanation {
    pub code: FindingCode,
    /// Human-readable title.
    pub title: &'static str,
    /// Severity the checkers assign this code.
    pub severity: &'static str,
    /// Whether the edit engine can repair it automatically.
    pub fixable: bool,
    /// What the finding means.
    pub description: &'static str,
    /// Manual remediation guidance.
    pub remediation: &'static str,
}

/// Registry of all finding codes, in report order.
pub static CODE_REGISTRY: &[CodeExplanation] = &[
    CodeExplanation {
        code: FindingCode::MissingRequiredFile,
        title: "Missing Required File",
        severity: "error",
        fixable: false,
        description: r#"A file every unpacked presentation package must contain is absent.

The required parts are:
  - [Content_Types].xml
  - _rels/.rels
  - ppt/presentation.xml
  - ppt/_rels/presentation.xml.rels

Without them the package cannot be repacked into a working .pptx."#,
        remediation: r#"Restore the file from the original package: re-extract the pristine
.pptx and copy the missing part back into the working tree. There is
no automatic fix because the tool cannot invent the file's content."#,
    },
    CodeExplanation {
        code: FindingCode::MalformedXml,
        title: "Malformed XML",
        severity: "error",
        fixable: true,
        description: r#"An .xml or .rels part failed to parse.

When the parser can name a single unclosed element, the finding carries
an automatic fix that inserts the missing closing tag at the reported
line (or, failing that, after the first matching open tag in the file).
Other syntax errors must be repaired by hand."#,
        remediation: r#"Open the file at the reported line and balance the markup. If the
damage is extensive, restore the part from the original package
instead of editing it in place."#,
    },
    CodeExplanation {
        code: FindingCode::FileReadError,
        title: "File Read Error",
        severity: "error",
        fixable: false,
        description: r#"An XML part exists in the tree but could not be read, typically
because of permissions or because a directory sits where a file is
expected. The part's content was not validated."#,
        remediation: r#"Check permissions and the entry's type on disk, then re-run
validation. The other parts are still checked in the same run."#,
    },
    CodeExplanation {
        code: FindingCode::BrokenRelationship,
        title: "Broken Relationship",
        severity: "error",
        fixable: true,
        description: r#"A .rels file references a target part that does not exist in the
tree. Relationship targets resolve relative to the directory that owns
the _rels folder; leading-slash targets resolve from the package root.
External targets (http/https) are never checked.

The automatic fix removes the dangling <Relationship> entry."#,
        remediation: r#"Either restore the missing target part or delete the relationship
entry that points at it. Removing the entry is safe when the target
is gone for good; restoring the part is right when it was deleted by
mistake."#,
    },
    CodeExplanation {
        code: FindingCode::MissingContentTypeTarget,
        title: "Missing Content-Type Target",
        severity: "warning",
        fixable: true,
        description: r#"[Content_Types].xml declares an <Override> for a part that does not
exist. Stray overrides do not block most consumers, so this is a
warning, but strict ones reject the package.

The automatic fix removes the stray <Override> entry."#,
        remediation: r#"Delete the <Override> element whose PartName has no file behind it,
or restore the part it declares."#,
    },
    CodeExplanation {
        code: FindingCode::OrphanSlide,
        title: "Orphan Slide",
        severity: "warning",
        fixable: true,
        description: r#"A slideN.xml part exists under ppt/slides/ but is not referenced by
any relationship in ppt/_rels/presentation.xml.rels. The slide will
never be shown and only bloats the package.

The automatic fix deletes the slide part and its _rels sidecar. Its
content-type override only becomes stray once the slide is gone, so a
second fixing run prunes that too."#,
        remediation: r#"If the slide should be in the deck, add a slide relationship for it
to ppt/_rels/presentation.xml.rels (and an entry in the presentation's
slide id list). Otherwise delete the slide and its sidecar."#,
    },
];

/// Look up a code by its wire name, case-insensitively.
pub fn lookup_code(key: &str) -> Option<&'static CodeExplanation> {
    CODE_REGISTRY
        .iter()
        .find(|e| e.code.as_str().eq_ignore_ascii_case(key))
}

/// All known code names, for error messages.
pub fn list_code_keys() -> Vec<&'static str> {
    CODE_REGISTRY.iter().map(|e| e.code.as_str()).collect()
}
