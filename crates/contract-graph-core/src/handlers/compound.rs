//! Compound handlers: loose multi-type normalization, `anyOf`/`oneOf` unions
//! and arrays.

use serde_json::{json, Map, Value};

use crate::context::TypeContext;
use crate::error::CompileError;
use crate::schema_utils::{build_path, has_type, is_null_only, type_list, union_branches};
use crate::types::{NamedType, OutputType, Scalar, UnionType};

use super::Child;

// ---------------------------------------------------------------------------
// Multi-type normalization
// ---------------------------------------------------------------------------

/// Keywords carried over to the per-type fragment for each JSON type.
const STRING_KEYWORDS: &[&str] = &["format", "pattern", "minLength", "maxLength"];
const NUMBER_KEYWORDS: &[&str] = &[
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
];
const OBJECT_KEYWORDS: &[&str] = &[
    "properties",
    "required",
    "additionalProperties",
    "patternProperties",
];
const ARRAY_KEYWORDS: &[&str] = &["items", "minItems", "maxItems", "uniqueItems"];

pub(super) fn is_multi_type(f: &Value) -> bool {
    f.get("type").is_some_and(Value::is_array)
}

pub(super) fn multi_type_children(f: &Value) -> Vec<Child> {
    vec![Child::rewritten(normalize_type_list(f))]
}

/// The rewritten fragment stands in for the original, so its type is the
/// result unchanged.
pub(super) fn process_multi_type(children: Vec<OutputType>) -> OutputType {
    children.into_iter().next().unwrap_or(OutputType::Null)
}

/// Rewrite `{type: [t1, t2, ...]}` without touching the input:
///
/// - `"null"` entries are dropped; nullability is a field-level concern.
/// - One remaining type: the plain single-type fragment.
/// - Several: an `anyOf` of object-shaped per-type branches.
/// - With `enum` present the `type` list is dropped and the enum handler
///   takes over.
pub(crate) fn normalize_type_list(f: &Value) -> Value {
    let Some(obj) = f.as_object() else {
        return f.clone();
    };
    let listed = type_list(f).unwrap_or_default();

    let mut types: Vec<&str> = Vec::new();
    for t in listed.iter().copied() {
        if t != "null" && !types.contains(&t) {
            types.push(t);
        }
    }

    if obj.contains_key("enum") {
        let mut rewritten = obj.clone();
        rewritten.remove("type");
        return Value::Object(rewritten);
    }

    match types.as_slice() {
        [] => {
            if listed.contains(&"null") {
                json!({ "type": "null" })
            } else {
                let mut rewritten = obj.clone();
                rewritten.remove("type");
                Value::Object(rewritten)
            }
        }
        [single] => {
            let mut rewritten = obj.clone();
            rewritten.insert("type".to_string(), json!(single));
            Value::Object(rewritten)
        }
        many => {
            let mut union = Map::new();
            for keyword in ["title", "description"] {
                if let Some(v) = obj.get(keyword) {
                    union.insert(keyword.to_string(), v.clone());
                }
            }
            let branches: Vec<Value> = many.iter().map(|t| type_branch(obj, t)).collect();
            union.insert("anyOf".to_string(), Value::Array(branches));
            Value::Object(union)
        }
    }
}

/// Object-shaped branch for one type of a multi-type fragment. Non-object
/// types are boxed as `{value: T}`; plain scalars get a fixed name so every
/// occurrence shares one wrapper type.
fn type_branch(obj: &Map<String, Value>, ty: &str) -> Value {
    let keywords: &[&str] = match ty {
        "string" => STRING_KEYWORDS,
        "number" | "integer" => NUMBER_KEYWORDS,
        "object" => OBJECT_KEYWORDS,
        "array" => ARRAY_KEYWORDS,
        _ => &[],
    };

    let mut base = Map::new();
    base.insert("type".to_string(), json!(ty));
    for keyword in keywords {
        if let Some(v) = obj.get(*keyword) {
            base.insert(keyword.to_string(), v.clone());
        }
    }

    if ty == "object" {
        return Value::Object(base);
    }

    let plain = base.len() == 1;
    let mut wrapper = json!({
        "type": "object",
        "properties": { "value": Value::Object(base) },
        "required": ["value"]
    });
    if plain {
        let title = match ty {
            "string" => Some("StringValue"),
            "number" => Some("FloatValue"),
            "integer" => Some("IntValue"),
            "boolean" => Some("BooleanValue"),
            _ => None,
        };
        if let Some(title) = title {
            wrapper["title"] = json!(title);
        }
    }
    wrapper
}

// ---------------------------------------------------------------------------
// Unions
// ---------------------------------------------------------------------------

pub(super) fn is_union(f: &Value) -> bool {
    union_branches(f).is_some()
}

/// Non-null branches with their original index.
fn union_members(f: &Value) -> Vec<(usize, &Value)> {
    union_branches(f)
        .map(|(_, branches)| {
            branches
                .iter()
                .enumerate()
                .filter(|(_, b)| !is_null_only(b))
                .collect()
        })
        .unwrap_or_default()
}

pub(super) fn union_children(f: &Value, ctx: &TypeContext) -> Vec<Child> {
    let keyword = union_branches(f).map(|(k, _)| k).unwrap_or("anyOf");
    let named_path = ctx.path_name().is_some();
    let members = union_members(f);
    let single = members.len() == 1;
    members
        .into_iter()
        .map(|(i, branch)| Child {
            fragment: branch.clone(),
            segment: (named_path && !single).then(|| format!("Variant{}", i + 1)),
            path: vec![keyword.to_string(), i.to_string()],
        })
        .collect()
}

/// Build the union. Every member must already be an object type; scalar
/// branches that were not normalized upstream fail the build.
pub(super) fn process_union(
    f: &Value,
    children: Vec<OutputType>,
    ctx: &mut TypeContext,
    path: &str,
) -> Result<OutputType, CompileError> {
    let keyword = union_branches(f).map(|(k, _)| k).unwrap_or("anyOf");
    let members = union_members(f);

    if children.len() <= 1 {
        return Ok(children.into_iter().next().unwrap_or(OutputType::Null));
    }

    let mut names: Vec<String> = Vec::with_capacity(children.len());
    for ((i, _), child) in members.iter().zip(&children) {
        match child {
            OutputType::Object(name) => {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            other => {
                return Err(CompileError::InvalidUnionMember {
                    path: build_path(path, &[keyword, &i.to_string()]),
                    found: other.describe(),
                })
            }
        }
    }

    if let [only] = names.as_slice() {
        return Ok(OutputType::Object(only.clone()));
    }

    ctx.register_named(f, "Union", path, |name| {
        NamedType::Union(UnionType {
            name,
            members: names.clone(),
        })
    })
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

pub(super) fn is_array(f: &Value) -> bool {
    has_type(f, "array")
}

/// A single `items` schema is compiled; tuple-form and missing `items` yield
/// `[JSON!]`.
pub(super) fn array_children(f: &Value) -> Vec<Child> {
    match f.get("items") {
        Some(items @ (Value::Object(_) | Value::Bool(_))) => vec![Child {
            fragment: items.clone(),
            segment: None,
            path: vec!["items".to_string()],
        }],
        _ => Vec::new(),
    }
}

pub(super) fn process_array(children: Vec<OutputType>) -> OutputType {
    let item = children
        .into_iter()
        .next()
        .unwrap_or(OutputType::Scalar(Scalar::Json));
    OutputType::List(Box::new(item))
}
