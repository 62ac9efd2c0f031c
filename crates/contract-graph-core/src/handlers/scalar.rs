//! Leaf handlers: every fragment shape that maps onto a scalar (or onto no
//! type at all).

use serde_json::Value;

use crate::error::CompileError;
use crate::schema_utils::{has_type, is_formatted_string, is_null_only, union_branches};
use crate::types::{OutputType, Scalar};

pub(super) fn is_string(f: &Value) -> bool {
    has_type(f, "string")
}

pub(super) fn is_date_time(f: &Value) -> bool {
    is_formatted_string(f, "date-time")
}

pub(super) fn is_markdown(f: &Value) -> bool {
    is_formatted_string(f, "markdown")
}

pub(super) fn is_uuid(f: &Value) -> bool {
    is_formatted_string(f, "uuid")
}

pub(super) fn is_email(f: &Value) -> bool {
    is_formatted_string(f, "email")
}

/// `{type: array, items: {type: string, format: email}}`
pub(super) fn is_email_array(f: &Value) -> bool {
    has_type(f, "array") && f.get("items").is_some_and(is_email)
}

/// An `anyOf`/`oneOf` of email strings and email arrays, with at least one
/// array branch. `null` branches are ignored; a plain email with only `null`
/// beside it is an ordinary nullable email, left to the union handler.
pub(super) fn is_email_any_of(f: &Value) -> bool {
    let Some((_, branches)) = union_branches(f) else {
        return false;
    };
    let mut saw_array = false;
    for branch in branches {
        if is_null_only(branch) {
            continue;
        }
        if is_email_array(branch) {
            saw_array = true;
        } else if !is_email(branch) {
            return false;
        }
    }
    saw_array
}

pub(super) fn is_number(f: &Value) -> bool {
    has_type(f, "number")
}

pub(super) fn is_integer(f: &Value) -> bool {
    has_type(f, "integer")
}

pub(super) fn is_boolean(f: &Value) -> bool {
    has_type(f, "boolean")
}

pub(super) fn is_null(f: &Value) -> bool {
    is_null_only(f)
}

/// `{const: <literal>}` with a non-null literal.
pub(super) fn is_const(f: &Value) -> bool {
    f.get("const").is_some_and(|c| !c.is_null())
}

/// The `false` schema, or `{not: {}}`.
pub(super) fn is_never(f: &Value) -> bool {
    match f {
        Value::Bool(b) => !b,
        Value::Object(obj) => obj
            .get("not")
            .and_then(Value::as_object)
            .is_some_and(|not| not.is_empty()),
        _ => false,
    }
}

pub(super) fn is_reference(f: &Value) -> bool {
    f.get("$ref").is_some_and(Value::is_string)
}

pub(super) fn process_const(f: &Value) -> OutputType {
    let scalar = match f.get("const") {
        Some(Value::String(_)) => Scalar::String,
        Some(Value::Number(_)) => Scalar::Float,
        Some(Value::Bool(_)) => Scalar::Boolean,
        _ => Scalar::Json,
    };
    OutputType::Scalar(scalar)
}

pub(super) fn process_reference(f: &Value, path: &str) -> Result<OutputType, CompileError> {
    let reference = f
        .get("$ref")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Err(CompileError::UnsupportedReference {
        path: path.to_string(),
        reference,
    })
}

pub(super) fn email_list() -> OutputType {
    OutputType::List(Box::new(OutputType::Scalar(Scalar::Email)))
}
