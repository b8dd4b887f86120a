//! Closing-tag insertion for the unclosed-element corruption shape.
//!
//! Strategies, tried in order against the parser-reported line first
//! and the whole file second:
//! 1. insert the closing tag before the next tag-opening that is not
//!    already that closing tag, preserving the text between;
//! 2. append the closing tag after trailing text that follows the
//!    last opening tag on the line;
//! 3. whole-file: find the first `<element ...>text</...` run whose
//!    close belongs to a different element and insert there.
//!
//! Best-effort by design: one corruption per invocation, anything
//! fancier is left to a re-validation loop.

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use std::ops::Range;

/// Repair one unclosed `element` in `path`. `Ok(true)` iff a targeted
/// edit was written; `Ok(false)` leaves the file untouched for manual
/// resolution.
pub(crate) fn fix_unclosed_tag(path: &Utf8Path, line: u64, element: &str) -> anyhow::Result<bool> {
    let content = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    let lines: Vec<&str> = content.split('\n').collect();

    if line >= 1 && (line as usize) <= lines.len() {
        let idx = line as usize - 1;
        if let Some(fixed_line) = close_on_line(lines[idx], element) {
            let mut fixed: Vec<&str> = lines.clone();
            fixed[idx] = &fixed_line;
            // Full-buffer write; no incremental rewriting.
            fs::write(path, fixed.join("\n")).with_context(|| format!("write {}", path))?;
            return Ok(true);
        }
    }

    if let Some(fixed) = close_in_file(&content, element) {
        fs::write(path, fixed).with_context(|| format!("write {}", path))?;
        return Ok(true);
    }

    Ok(false)
}

/// Line-local strategies 1 and 2.
pub(crate) fn close_on_line(line: &str, element: &str) -> Option<String> {
    let close = format!("</{element}>");
    let opens = open_tag_spans(line, element);
    if opens.is_empty() || opens.len() <= count_matches(line, &close) {
        return None;
    }

    // 1: before the next tag-opening that is not our closing tag.
    for span in &opens {
        if let Some(lt) = line[span.end..].find('<') {
            let at = span.end + lt;
            if !line[at..].starts_with(&close) {
                let mut fixed = String::with_capacity(line.len() + close.len());
                fixed.push_str(&line[..at]);
                fixed.push_str(&close);
                fixed.push_str(&line[at..]);
                return Some(fixed);
            }
        }
    }

    // 2: after trailing text at end of line.
    let last = opens.last()?;
    let trailing = &line[last.end..];
    if !trailing.is_empty() && !trailing.contains('<') {
        return Some(format!("{line}{close}"));
    }

    None
}

/// Whole-file strategy 3: first `<element ...>text</other` occurrence.
pub(crate) fn close_in_file(content: &str, element: &str) -> Option<String> {
    let close = format!("</{element}>");
    let opens = open_tag_spans(content, element);
    if opens.len() <= count_matches(content, &close) {
        return None;
    }

    for span in &opens {
        let rest = &content[span.end..];
        let Some(lt) = rest.find('<') else { continue };
        let at = span.end + lt;
        if content[at..].starts_with("</") && !content[at..].starts_with(&close) {
            let mut fixed = String::with_capacity(content.len() + close.len());
            fixed.push_str(&content[..at]);
            fixed.push_str(&close);
            fixed.push_str(&content[at..]);
            return Some(fixed);
        }
    }

    None
}

/// Spans of non-self-closing opening tags of `element`, `<` through `>`.
fn open_tag_spans(s: &str, element: &str) -> Vec<Range<usize>> {
    let needle = format!("<{element}");
    let bytes = s.as_bytes();
    let mut spans = Vec::new();
    let mut at = 0;

    while let Some(found) = s[at..].find(&needle) {
        let start = at + found;
        let after = start + needle.len();
        match bytes.get(after) {
            Some(b'>') => {
                spans.push(start..after + 1);
                at = after + 1;
            }
            Some(&c) if c.is_ascii_whitespace() || c == b'/' => match s[after..].find('>') {
                Some(gt) => {
                    let end = after + gt + 1;
                    if bytes[end - 2] != b'/' {
                        spans.push(start..end);
                    }
                    at = end;
                }
                None => break,
            },
            // A longer element name, e.g. `<a:tc` while looking for `<a:t`.
            _ => at = after,
        }
    }

    spans
}

fn count_matches(s: &str, needle: &str) -> usize {
    s.matches(needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inserts_before_next_sibling_tag() {
        let line = "<a:p><a:r><a:t>Hello<a:r><a:t>world</a:t></a:r></a:r></a:p>";
        let fixed = close_on_line(line, "a:t").unwrap();
        assert_eq!(
            fixed,
            "<a:p><a:r><a:t>Hello</a:t><a:r><a:t>world</a:t></a:r></a:r></a:p>"
        );
    }

    #[test]
    fn preserves_text_between_tags() {
        let line = "<a:t>some text<a:r>";
        assert_eq!(close_on_line(line, "a:t").unwrap(), "<a:t>some text</a:t><a:r>");
    }

    #[test]
    fn appends_after_trailing_text() {
        let line = "<a:p><a:t>dangling";
        assert_eq!(close_on_line(line, "a:t").unwrap(), "<a:p><a:t>dangling</a:t>");
    }

    #[test]
    fn balanced_line_is_left_alone() {
        assert_eq!(close_on_line("<a:t>fine</a:t>", "a:t"), None);
        assert_eq!(close_on_line("no tags here", "a:t"), None);
    }

    #[test]
    fn self_closing_tags_do_not_count_as_open() {
        assert_eq!(close_on_line("<a:t/>", "a:t"), None);
        assert_eq!(close_on_line("<a:t />", "a:t"), None);
    }

    #[test]
    fn longer_names_are_not_confused_with_the_element() {
        assert_eq!(close_on_line("<a:tc>cell</a:tc>", "a:t"), None);
    }

    #[test]
    fn attributes_on_the_opening_tag_are_handled() {
        let line = "<a:t lang=\"en\">text<a:r>";
        assert_eq!(
            close_on_line(line, "a:t").unwrap(),
            "<a:t lang=\"en\">text</a:t><a:r>"
        );
    }

    #[test]
    fn skips_already_matched_opens() {
        let line = "<a:t>ok</a:t><a:t>broken<a:r>";
        assert_eq!(
            close_on_line(line, "a:t").unwrap(),
            "<a:t>ok</a:t><a:t>broken</a:t><a:r>"
        );
    }

    #[test]
    fn whole_file_fallback_targets_foreign_close() {
        let content = "<a:p>\n<a:r><a:t>text</a:r>\n</a:p>";
        let fixed = close_in_file(content, "a:t").unwrap();
        assert_eq!(fixed, "<a:p>\n<a:r><a:t>text</a:t></a:r>\n</a:p>");
    }

    #[test]
    fn whole_file_fallback_requires_an_unmatched_open() {
        let content = "<a:p><a:t>text</a:t></a:p>";
        assert_eq!(close_in_file(content, "a:t"), None);
    }
}
