//! Identifier synthesis: casing conversion, enum value naming, and the
//! contract-to-type naming rule shared by the `Card` interface and every
//! concrete card type.
//!
//! All output identifiers match `[_A-Za-z][_0-9A-Za-z]*`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// A 3-part semantic version (`1.0.0`).
pub(crate) static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid semver pattern"));

/// The `type` of a contract-definition card (`type@1.0.0`).
pub(crate) static TYPE_CONTRACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^type@").expect("valid type pattern"));

/// A literal that reads as a negative number.
static NEGATIVE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\d").expect("valid negative number pattern"));

/// Split on anything that is not an ASCII letter or digit.
fn words(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `support-thread` → `SupportThread`, `created_at` → `CreatedAt`.
///
/// Inner capitals of a word are kept (`fooBar` → `FooBar`).
pub fn pascal_case(input: &str) -> String {
    words(input).map(capitalize).collect()
}

/// `created_at` → `createdAt`, `x-foo` → `xFoo`, `ID` → `id`.
pub fn camel_case(input: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(input).enumerate() {
        if i == 0 {
            if word.chars().all(|c| !c.is_ascii_lowercase()) {
                out.push_str(&word.to_ascii_lowercase());
            } else {
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    out.push(first.to_ascii_lowercase());
                    out.push_str(chars.as_str());
                }
            }
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

fn leading_digit_guard(mut name: String) -> String {
    if name.is_empty() {
        return "_".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Output field name for a property key.
pub fn field_name(key: &str) -> String {
    leading_digit_guard(camel_case(key))
}

/// Output type name for an author-assigned title or a path segment.
pub fn type_name(input: &str) -> String {
    leading_digit_guard(pascal_case(input))
}

/// Concrete type name for a contract: `Pascal(slug)` + `V` + version with
/// dots replaced by underscores.
///
/// ```
/// use contract_graph_core::naming::card_type_name;
/// assert_eq!(card_type_name("support-thread", "2.1.0"), "SupportThreadV2_1_0");
/// ```
pub fn card_type_name(slug: &str, version: &str) -> String {
    format!("{}V{}", pascal_case(slug), version.replace('.', "_"))
}

/// Split a `<slug>@<version>` type reference.
pub fn parse_type_reference(reference: &str) -> Option<(&str, &str)> {
    let (slug, version) = reference.rsplit_once('@')?;
    if slug.is_empty() || version.is_empty() {
        return None;
    }
    Some((slug, version))
}

/// Replace every run of non-alphanumeric characters with a single `_`,
/// trimming separators at either end.
pub fn slugify(input: &str) -> String {
    words(input).collect::<Vec<_>>().join("_")
}

/// `fooBar_baz` → `FOO_BAR_BAZ`.
pub fn upper_snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower = false;
    for c in input.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase();
        out.push(c.to_ascii_uppercase());
    }
    out
}

/// Enum value identifier for a scalar literal. Returns `None` for arrays and
/// objects, which cannot be enum members.
///
/// - `"in progress"` → `IN_PROGRESS`
/// - `1` → `OPTION_1`
/// - `-2` → `OPTION_NEG2`
pub fn enum_value_name(literal: &Value) -> Option<String> {
    let raw = match literal {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    let name = if NEGATIVE_NUMBER.is_match(&raw) {
        format!("OPTION_NEG{}", slugify(&raw[1..]))
    } else {
        let slug = slugify(&raw);
        if slug.is_empty() {
            "EMPTY".to_string()
        } else if slug.starts_with(|c: char| c.is_ascii_digit()) {
            format!("OPTION_{slug}")
        } else {
            slug
        }
    };

    Some(upper_snake_case(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("support-thread"), "SupportThread");
        assert_eq!(pascal_case("created_at"), "CreatedAt");
        assert_eq!(pascal_case("fooBar"), "FooBar");
        assert_eq!(pascal_case("--"), "");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("created_at"), "createdAt");
        assert_eq!(camel_case("x-foo"), "xFoo");
        assert_eq!(camel_case("ID"), "id");
        assert_eq!(camel_case("alreadyCamel"), "alreadyCamel");
        assert_eq!(camel_case("Name"), "name");
    }

    #[test]
    fn test_field_name_guards() {
        assert_eq!(field_name("2fa_enabled"), "_2faEnabled");
        assert_eq!(field_name("$$"), "_");
    }

    #[test]
    fn test_card_type_name() {
        assert_eq!(card_type_name("message", "1.0.0"), "MessageV1_0_0");
        assert_eq!(card_type_name("support-thread", "2.1.0"), "SupportThreadV2_1_0");
    }

    #[test]
    fn test_parse_type_reference() {
        assert_eq!(
            parse_type_reference("support-thread@2.1.0"),
            Some(("support-thread", "2.1.0"))
        );
        assert_eq!(parse_type_reference("message"), None);
        assert_eq!(parse_type_reference("@1.0.0"), None);
        assert_eq!(parse_type_reference("message@"), None);
    }

    #[test]
    fn test_enum_value_names() {
        assert_eq!(enum_value_name(&json!(1)).unwrap(), "OPTION_1");
        assert_eq!(enum_value_name(&json!("a")).unwrap(), "A");
        assert_eq!(enum_value_name(&json!(-2)).unwrap(), "OPTION_NEG2");
        assert_eq!(enum_value_name(&json!(-2.5)).unwrap(), "OPTION_NEG2_5");
        assert_eq!(enum_value_name(&json!("in  progress!")).unwrap(), "IN_PROGRESS");
        assert_eq!(enum_value_name(&json!("fooBar")).unwrap(), "FOO_BAR");
        assert_eq!(enum_value_name(&json!("3d")).unwrap(), "OPTION_3D");
        assert_eq!(enum_value_name(&json!(true)).unwrap(), "TRUE");
        assert_eq!(enum_value_name(&json!("")).unwrap(), "EMPTY");
    }

    #[test]
    fn test_enum_value_name_rejects_compound_literals() {
        assert_eq!(enum_value_name(&json!([1])), None);
        assert_eq!(enum_value_name(&json!({ "a": 1 })), None);
        assert_eq!(enum_value_name(&Value::Null), None);
    }

    #[test]
    fn test_patterns() {
        assert!(SEMVER.is_match("1.0.0"));
        assert!(!SEMVER.is_match("1.0"));
        assert!(!SEMVER.is_match("1.0.0-beta"));
        assert!(TYPE_CONTRACT.is_match("type@1.0.0"));
        assert!(!TYPE_CONTRACT.is_match("card@1.0.0"));
    }
}
