//! Conversions from record values to the strings terms are tested against.

use std::borrow::Cow;

use serde_json::Value as JsonValue;

/// Flattens a metadata value into its string representations.
///
/// Arrays flatten recursively, objects serialize to one JSON string, and
/// scalars stringify directly.
pub fn flatten_value(value: &JsonValue) -> Vec<Cow<'_, str>> {
    let mut out = Vec::new();
    flatten_into(value, &mut out);
    out
}

fn flatten_into<'a>(value: &'a JsonValue, out: &mut Vec<Cow<'a, str>>) {
    match value {
        JsonValue::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        JsonValue::String(s) => out.push(Cow::Borrowed(s.as_str())),
        other => out.push(Cow::Owned(other.to_string())),
    }
}

/// Picks the title shown for a record.
///
/// A non-empty explicit title wins. Otherwise the last path segment is used
/// with a trailing extension such as `.md` removed.
pub fn display_title<'a>(title: Option<&'a str>, path: &'a str) -> Cow<'a, str> {
    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        return Cow::Borrowed(title);
    }
    let segment = path.rsplit(['/', '\\']).next().unwrap_or(path);
    Cow::Borrowed(strip_extension(segment))
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => name,
    }
}
