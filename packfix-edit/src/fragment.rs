//! Literal XML-fragment removal.
//!
//! Removal is exact substring splice, not pattern matching, so
//! regex-special characters in fragments need no escaping and cannot
//! over-match. Surrounding whitespace collapses to a single newline.

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;

/// Remove `fragment` from the file. `Ok(false)` when the fragment is
/// no longer present (e.g. already fixed), leaving the file untouched.
pub(crate) fn remove_from_file(path: &Utf8Path, fragment: &str) -> anyhow::Result<bool> {
    let content = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    match remove_fragment(&content, fragment) {
        Some(fixed) => {
            fs::write(path, fixed).with_context(|| format!("write {}", path))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub(crate) fn remove_fragment(content: &str, fragment: &str) -> Option<String> {
    if fragment.is_empty() {
        return None;
    }
    let start = content.find(fragment)?;
    let end = start + fragment.len();

    let bytes = content.as_bytes();
    let mut from = start;
    while from > 0 && bytes[from - 1].is_ascii_whitespace() {
        from -= 1;
    }
    let mut to = end;
    while to < bytes.len() && bytes[to].is_ascii_whitespace() {
        to += 1;
    }

    let mut out = String::with_capacity(content.len() - (to - from) + 1);
    out.push_str(&content[..from]);
    out.push('\n');
    out.push_str(&content[to..]);
    Some(out)
}
