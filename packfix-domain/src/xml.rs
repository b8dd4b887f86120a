//! XML scanning utilities shared by the checkers.
//!
//! Two jobs only: a strict well-formedness scan that classifies the
//! repairable unclosed-element shape, and extraction of elements with
//! their exact source fragments (the fragments feed literal-text
//! removal fixes, so they must be byte-exact).

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// First well-formedness problem found in a document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct XmlIssue {
    pub message: String,
    /// 1-based line of the offending position.
    pub line: u64,
    /// Set when a close tag (or end of input) arrived while this
    /// element was still open, the one shape the fix engine repairs.
    pub unclosed: Option<String>,
}

/// Scan for syntactic validity only: matched tags, correct nesting,
/// parseable markup. No schema awareness.
pub(crate) fn scan_well_formed(content: &str) -> Option<XmlIssue> {
    let mut reader = Reader::from_str(content);
    // End-tag pairing is tracked here so mismatches can be classified.
    reader.config_mut().check_end_names = false;

    let mut stack: Vec<String> = Vec::new();
    loop {
        let at = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match stack.last() {
                    Some(top) if *top == name => {
                        stack.pop();
                    }
                    Some(top) => {
                        let top = top.clone();
                        // A close for an element deeper in the stack means
                        // everything above it was left unclosed.
                        let unclosed = stack.iter().any(|n| *n == name);
                        return Some(if unclosed {
                            XmlIssue {
                                message: format!("expected closing tag </{top}> before </{name}>"),
                                line: line_at(content, at),
                                unclosed: Some(top),
                            }
                        } else {
                            XmlIssue {
                                message: format!(
                                    "closing tag </{name}> has no matching opening tag"
                                ),
                                line: line_at(content, at),
                                unclosed: None,
                            }
                        });
                    }
                    None => {
                        return Some(XmlIssue {
                            message: format!("closing tag </{name}> has no matching opening tag"),
                            line: line_at(content, at),
                            unclosed: None,
                        });
                    }
                }
            }
            Ok(Event::Eof) => {
                return stack.pop().map(|top| XmlIssue {
                    message: format!("expected closing tag </{top}> before end of file"),
                    line: line_at(content, content.len()),
                    unclosed: Some(top),
                });
            }
            Ok(_) => {}
            Err(e) => {
                return Some(XmlIssue {
                    message: e.to_string(),
                    line: line_at(content, reader.buffer_position() as usize),
                    unclosed: None,
                });
            }
        }
    }
}

/// 1-based line number of a byte offset.
fn line_at(content: &str, offset: usize) -> u64 {
    let end = offset.min(content.len());
    content.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() as u64 + 1
}

/// An element pulled out of a document together with its exact source
/// text, `<` through `>` inclusive.
#[derive(Debug, Clone)]
pub(crate) struct RawElement {
    pub fragment: String,
    attrs: Vec<(String, String)>,
}

impl RawElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Extract every element with the given local name, in document order.
///
/// Parse errors end extraction quietly; the well-formedness checker
/// owns reporting those.
pub(crate) fn extract_elements(content: &str, local_name: &str) -> Vec<RawElement> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().check_end_names = false;

    let mut out = Vec::new();
    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Empty(e)) if e.local_name().as_ref() == local_name.as_bytes() => {
                let end = reader.buffer_position() as usize;
                out.push(RawElement {
                    fragment: content[start..end].to_string(),
                    attrs: collect_attrs(&e),
                });
            }
            Ok(Event::Start(e)) if e.local_name().as_ref() == local_name.as_bytes() => {
                let attrs = collect_attrs(&e);
                if reader.read_to_end(e.name()).is_err() {
                    break;
                }
                // Position now sits just past the matching close tag.
                let end = reader.buffer_position() as usize;
                out.push(RawElement {
                    fragment: content[start..end].to_string(),
                    attrs,
                });
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }
    out
}

fn collect_attrs(e: &BytesStart<'_>) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        attrs.push((key, value));
    }
    attrs
}
