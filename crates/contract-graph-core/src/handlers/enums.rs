//! `enum` handler: one named value per distinct scalar literal.

use std::collections::HashSet;

use serde_json::Value;

use crate::context::TypeContext;
use crate::error::CompileError;
use crate::naming::enum_value_name;
use crate::schema_utils::build_path;
use crate::types::{EnumType, EnumValue, NamedType, OutputType, Scalar};

pub(super) fn is_enum(f: &Value) -> bool {
    f.get("enum").is_some_and(Value::is_array)
}

/// Build (and register) the enum type for `{enum: [...]}`.
///
/// `null` members are dropped: nullability lives on the field. Identifiers
/// that collide after slugification get `_2`, `_3`, ... suffixes in literal
/// order.
pub(super) fn process_enum(
    f: &Value,
    ctx: &mut TypeContext,
    path: &str,
) -> Result<OutputType, CompileError> {
    let literals = f
        .get("enum")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut values: Vec<EnumValue> = Vec::with_capacity(literals.len());
    let mut taken: HashSet<String> = HashSet::new();
    let mut saw_null = false;

    for (i, literal) in literals.iter().enumerate() {
        if literal.is_null() {
            saw_null = true;
            continue;
        }
        if values.iter().any(|v| &v.value == literal) {
            continue;
        }
        let base = enum_value_name(literal).ok_or_else(|| CompileError::MalformedLiteral {
            path: build_path(path, &["enum", &i.to_string()]),
            message: format!("enum member {literal} is not a scalar"),
        })?;

        let mut name = base.clone();
        let mut n = 1;
        while !taken.insert(name.clone()) {
            n += 1;
            name = format!("{base}_{n}");
        }
        values.push(EnumValue {
            name,
            value: literal.clone(),
        });
    }

    if values.is_empty() {
        // `enum: [null]` only admits null; `enum: []` admits nothing.
        return Ok(if saw_null {
            OutputType::Null
        } else {
            OutputType::Scalar(Scalar::Never)
        });
    }

    ctx.register_named(f, "Enum", path, |name| {
        NamedType::Enum(EnumType {
            name,
            values: values.clone(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn values_of(ctx: &TypeContext, name: &str) -> Vec<String> {
        match ctx.get(name) {
            Some(NamedType::Enum(e)) => e.values.iter().map(|v| v.name.clone()).collect(),
            other => panic!("expected enum {name}, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_literals() {
        let mut ctx = TypeContext::new();
        let out = process_enum(&json!({ "enum": [1, "a", -2] }), &mut ctx, "#").unwrap();
        assert_eq!(out, OutputType::Enum("Enum1".to_string()));
        assert_eq!(values_of(&ctx, "Enum1"), vec!["OPTION_1", "A", "OPTION_NEG2"]);
    }

    #[test]
    fn test_colliding_identifiers_are_suffixed() {
        let mut ctx = TypeContext::new();
        process_enum(&json!({ "enum": ["a b", "a-b", "a_b", "a b"] }), &mut ctx, "#").unwrap();
        assert_eq!(values_of(&ctx, "Enum1"), vec!["A_B", "A_B_2", "A_B_3"]);
    }

    #[test]
    fn test_named_from_title_then_stack() {
        let mut ctx = TypeContext::new();
        process_enum(&json!({ "title": "status", "enum": ["open"] }), &mut ctx, "#").unwrap();
        assert!(ctx.get("Status").is_some());

        let mut scope = ctx.enter("Profile");
        let mut scope = scope.enter("Name");
        let out = process_enum(&json!({ "enum": ["x"] }), &mut scope, "#").unwrap();
        assert_eq!(out, OutputType::Enum("ProfileName".to_string()));
    }

    #[test]
    fn test_non_scalar_member_is_malformed() {
        let mut ctx = TypeContext::new();
        let err = process_enum(&json!({ "enum": ["a", { "b": 1 }] }), &mut ctx, "#/properties/x")
            .unwrap_err();
        match err {
            CompileError::MalformedLiteral { path, .. } => {
                assert_eq!(path, "#/properties/x/enum/1");
            }
            other => panic!("expected MalformedLiteral, got {other:?}"),
        }
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_null_members() {
        let mut ctx = TypeContext::new();
        process_enum(&json!({ "enum": ["a", null] }), &mut ctx, "#").unwrap();
        assert_eq!(values_of(&ctx, "Enum1"), vec!["A"]);

        assert_eq!(
            process_enum(&json!({ "enum": [null] }), &mut ctx, "#").unwrap(),
            OutputType::Null
        );
        assert_eq!(
            process_enum(&json!({ "enum": [] }), &mut ctx, "#").unwrap(),
            OutputType::Scalar(Scalar::Never)
        );
    }
}
