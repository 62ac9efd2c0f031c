//! Shared fragment utilities: JSON Pointer path construction and read-only
//! accessors over JSON Schema fragments.
//!
//! Handlers never mutate the fragment they are given. Anything that rewrites a
//! fragment (multi-type normalization, union branch filtering) builds a new
//! [`Value`] from these accessors.

use std::borrow::Cow;

use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// JSON Pointer escaping (RFC 6901)
// ---------------------------------------------------------------------------

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Build a JSON Pointer path by appending segments to a parent path.
///
/// # Example
/// ```
/// use contract_graph_core::build_path;
/// assert_eq!(build_path("#", &["properties", "a/b"]), "#/properties/a~1b");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_pointer_segment(segment));
    }
    path
}

// ---------------------------------------------------------------------------
// Fragment accessors
// ---------------------------------------------------------------------------

/// The single `type` keyword when it is a string (`{"type": "string"}`).
pub(crate) fn single_type(fragment: &Value) -> Option<&str> {
    fragment.get("type").and_then(Value::as_str)
}

/// `true` when the fragment declares exactly `type: <expected>`.
pub(crate) fn has_type(fragment: &Value, expected: &str) -> bool {
    single_type(fragment) == Some(expected)
}

/// The `type` keyword when it is an array (`{"type": ["string", "null"]}`).
pub(crate) fn type_list(fragment: &Value) -> Option<Vec<&str>> {
    let types = fragment.get("type").and_then(Value::as_array)?;
    Some(types.iter().filter_map(Value::as_str).collect())
}

/// The `format` keyword.
pub(crate) fn format(fragment: &Value) -> Option<&str> {
    fragment.get("format").and_then(Value::as_str)
}

/// `true` for `{"type": "string", "format": <format>}`.
pub(crate) fn is_formatted_string(fragment: &Value, expected: &str) -> bool {
    has_type(fragment, "string") && format(fragment) == Some(expected)
}

/// The `title` keyword, used as an author-assigned type name.
pub(crate) fn title(fragment: &Value) -> Option<&str> {
    fragment
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
}

/// The `description` keyword.
pub(crate) fn description(fragment: &Value) -> Option<String> {
    fragment
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// The `properties` map, if present and well-formed.
pub(crate) fn properties(fragment: &Value) -> Option<&Map<String, Value>> {
    fragment.get("properties").and_then(Value::as_object)
}

/// Property names listed in `required`. Non-string entries are ignored.
pub(crate) fn required(fragment: &Value) -> Vec<&str> {
    fragment
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// The branches of `anyOf` (preferred) or `oneOf`, with the keyword used.
pub(crate) fn union_branches(fragment: &Value) -> Option<(&'static str, &Vec<Value>)> {
    for keyword in ["anyOf", "oneOf"] {
        if let Some(branches) = fragment.get(keyword).and_then(Value::as_array) {
            return Some((keyword, branches));
        }
    }
    None
}

/// `true` for a fragment that only allows `null`.
pub(crate) fn is_null_only(fragment: &Value) -> bool {
    has_type(fragment, "null") || fragment.get("const").is_some_and(Value::is_null)
}
