//! Volume path handling.
//!
//! Volume paths use `\` as separator and always start with one; the volume
//! root is `\`. Input may use `/` and repeated separators, both of which
//! [`clean`] folds away.

/// Separator between path components on a volume.
pub const SEPARATOR: char = '\\';

/// The root directory of a volume.
pub const ROOT: &str = "\\";

/// Normalize `raw` to a rooted, `\`-separated path without empty components
/// or trailing separator.
pub fn clean(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    for component in components(raw) {
        out.push(SEPARATOR);
        out.push_str(component);
    }
    if out.is_empty() {
        out.push(SEPARATOR);
    }
    out
}

/// Non-empty components of `raw`, split on either separator style.
pub fn components(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(['\\', '/']).filter(|c| !c.is_empty())
}

/// Append `name` to the directory `dir` with exactly one separator.
pub fn join(dir: &str, name: &str) -> String {
    let mut out = String::with_capacity(dir.len() + name.len() + 1);
    out.push_str(dir.trim_end_matches(SEPARATOR));
    out.push(SEPARATOR);
    out.push_str(name.trim_start_matches(SEPARATOR));
    out
}

/// Split a cleaned path at its last separator into directory and final
/// component. A path with a single component lives in the root.
pub fn split_last(path: &str) -> (&str, &str) {
    match path.rfind(SEPARATOR) {
        Some(0) => (ROOT, &path[1..]),
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => (ROOT, path),
    }
}

/// Directory holding `path` (the root for top-level entries).
pub fn parent(path: &str) -> &str {
    split_last(path).0
}

/// Split an optional `Volume:` qualifier off the front of `raw`.
///
/// The qualifier is whatever precedes a `:` that appears before the first
/// separator, e.g. `ESP:\EFI\BOOT\BOOTX64.EFI`.
pub fn split_volume(raw: &str) -> (Option<&str>, &str) {
    let first_sep = raw.find(['\\', '/']).unwrap_or(raw.len());
    match raw[..first_sep].find(':') {
        Some(colon) if colon > 0 => (Some(&raw[..colon]), &raw[colon + 1..]),
        _ => (None, raw),
    }
}

/// Length of `path` in UTF-16 code units, the unit firmware path limits use.
pub fn wide_len(path: &str) -> usize {
    path.encode_utf16().count()
}
