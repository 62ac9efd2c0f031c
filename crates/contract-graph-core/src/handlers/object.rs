//! Object handlers: plain objects, the `Card` interface and concrete card
//! objects.
//!
//! Objects are assembled in a fixed pipeline:
//!
//! 1. raw map of compiled child types keyed by property name
//! 2. field descriptors
//! 3. named field overrides (card roots only)
//! 4. non-null wrapping for `required` keys
//! 5. camelCase field names, keeping the original key for resolution

use std::collections::HashSet;

use serde_json::Value;

use crate::contract::{BASE_CARD_SLUG, CARD_INTERFACE};
use crate::context::TypeContext;
use crate::error::CompileError;
use crate::naming::{self, SEMVER, TYPE_CONTRACT};
use crate::schema_utils::{build_path, description, has_type, properties, required};
use crate::types::{Field, InterfaceType, NamedType, ObjectType, OutputType, Scalar, TypeRef};

use super::Child;

static EMPTY: Value = Value::Null;

/// Card properties with bespoke types. They vary per concrete card, are not
/// traversed, and are left off the `Card` interface.
fn field_override(key: &str) -> Option<TypeRef> {
    let json = || TypeRef::named(Scalar::Json.name());
    match key {
        "links" => Some(TypeRef::non_null(json())),
        "requires" | "capabilities" => Some(TypeRef::non_null(TypeRef::list(
            TypeRef::non_null(json()),
        ))),
        "markers" => Some(TypeRef::non_null(TypeRef::list(TypeRef::non_null(
            TypeRef::named(Scalar::String.name()),
        )))),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

pub(super) fn is_object(f: &Value) -> bool {
    has_type(f, "object") || (f.get("type").is_none() && properties(f).is_some())
}

fn str_field<'a>(f: &'a Value, key: &str) -> Option<&'a str> {
    f.get(key).and_then(Value::as_str)
}

/// A contract-definition envelope at the traversal root.
pub(super) fn is_card_object(f: &Value, depth: usize) -> bool {
    depth == 0
        && str_field(f, "slug").is_some_and(|s| !s.is_empty())
        && str_field(f, "version").is_some_and(|v| SEMVER.is_match(v))
        && str_field(f, "type").is_some_and(|t| TYPE_CONTRACT.is_match(t))
}

/// The canonical base card contract at the traversal root.
pub(super) fn is_card_interface(f: &Value, depth: usize) -> bool {
    is_card_object(f, depth)
        && str_field(f, "slug") == Some(BASE_CARD_SLUG)
        && f.get("active") == Some(&Value::Bool(true))
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

fn card_schema(f: &Value) -> &Value {
    f.pointer("/data/schema").unwrap_or(&EMPTY)
}

fn property_children(schema: &Value, base: &[&str], overrides: bool) -> Vec<Child> {
    let Some(props) = properties(schema) else {
        return Vec::new();
    };
    props
        .iter()
        .filter(|(key, _)| !(overrides && field_override(key).is_some()))
        .map(|(key, prop)| {
            let mut path: Vec<String> = base.iter().map(|s| s.to_string()).collect();
            path.push("properties".to_string());
            path.push(key.clone());
            Child {
                fragment: prop.clone(),
                segment: Some(naming::type_name(key)),
                path,
            }
        })
        .collect()
}

pub(super) fn object_children(f: &Value) -> Vec<Child> {
    property_children(f, &[], false)
}

pub(super) fn card_children(f: &Value) -> Vec<Child> {
    property_children(card_schema(f), &["data", "schema"], true)
}

// ---------------------------------------------------------------------------
// Field pipeline
// ---------------------------------------------------------------------------

fn build_fields(schema: &Value, children: Vec<OutputType>, overrides: bool) -> Vec<Field> {
    let Some(props) = properties(schema) else {
        return Vec::new();
    };
    let mut compiled = children.into_iter();

    // 1. Raw map. Overridden keys were never compiled.
    let mut raw: Vec<(&String, Option<TypeRef>)> = Vec::with_capacity(props.len());
    for key in props.keys() {
        if overrides && field_override(key).is_some() {
            raw.push((key, None));
        } else {
            let ty = compiled.next().and_then(|out| out.to_type_ref());
            if ty.is_some() {
                raw.push((key, ty));
            }
        }
    }

    // 2. Field descriptors.
    let mut fields: Vec<Field> = raw
        .into_iter()
        .map(|(key, ty)| Field {
            name: key.clone(),
            key: key.clone(),
            ty: ty.unwrap_or_else(|| TypeRef::named(Scalar::Json.name())),
            description: props.get(key).and_then(description),
        })
        .collect();

    // 3. Overrides.
    if overrides {
        for field in &mut fields {
            if let Some(ty) = field_override(&field.key) {
                field.ty = ty;
            }
        }
    }

    // 4. Required.
    let required = required(schema);
    for field in &mut fields {
        if required.contains(&field.key.as_str()) {
            field.ty = TypeRef::non_null(field.ty.clone());
        }
    }

    // 5. Output names.
    let mut taken: HashSet<String> = HashSet::new();
    for field in &mut fields {
        let base = naming::field_name(&field.key);
        let mut name = base.clone();
        let mut n = 1;
        while !taken.insert(name.clone()) {
            n += 1;
            name = format!("{base}{n}");
        }
        field.name = name;
    }

    fields
}

// ---------------------------------------------------------------------------
// Process
// ---------------------------------------------------------------------------

/// Objects without any representable field become `JSON`: an output object
/// needs at least one field.
pub(super) fn process_object(
    f: &Value,
    children: Vec<OutputType>,
    ctx: &mut TypeContext,
    path: &str,
) -> Result<OutputType, CompileError> {
    let fields = build_fields(f, children, false);
    if fields.is_empty() {
        return Ok(OutputType::Scalar(Scalar::Json));
    }
    let description = description(f);
    ctx.register_named(f, "Object", path, |name| {
        NamedType::Object(ObjectType {
            name,
            fields: fields.clone(),
            interfaces: Vec::new(),
            description: description.clone(),
        })
    })
}

/// Registers the `Card` interface (without `data` and overridden fields) and
/// the base contract's own concrete type.
pub(super) fn process_card_interface(
    f: &Value,
    children: Vec<OutputType>,
    ctx: &mut TypeContext,
    path: &str,
) -> Result<OutputType, CompileError> {
    let fields = build_fields(card_schema(f), children, true);
    let shared: Vec<Field> = fields
        .iter()
        .filter(|field| field.key != "data" && field_override(&field.key).is_none())
        .cloned()
        .collect();

    let out = ctx.register(
        NamedType::Interface(InterfaceType {
            name: CARD_INTERFACE.to_string(),
            fields: shared,
            discriminator: "type".to_string(),
        }),
        path,
    )?;
    ctx.set_card_interface(CARD_INTERFACE);

    register_card_object(f, fields, ctx, path)?;
    Ok(out)
}

pub(super) fn process_card_object(
    f: &Value,
    children: Vec<OutputType>,
    ctx: &mut TypeContext,
    path: &str,
) -> Result<OutputType, CompileError> {
    let fields = build_fields(card_schema(f), children, true);
    register_card_object(f, fields, ctx, path)
}

/// Register a concrete card under `Pascal(slug)V<version>`, conforming its
/// fields to the `Card` interface when one exists.
fn register_card_object(
    f: &Value,
    own: Vec<Field>,
    ctx: &mut TypeContext,
    path: &str,
) -> Result<OutputType, CompileError> {
    let slug = str_field(f, "slug").unwrap_or_default();
    let version = str_field(f, "version").unwrap_or_default();
    let name = naming::card_type_name(slug, version);

    let (fields, interfaces) = match ctx.card_interface() {
        Some(iface) => (conform(own, iface, path)?, vec![iface.name.clone()]),
        None => (own, Vec::new()),
    };

    let out = ctx.register(
        NamedType::Object(ObjectType {
            name: name.clone(),
            fields,
            interfaces,
            description: description(card_schema(f)),
        }),
        path,
    )?;
    ctx.record_card_type(format!("{slug}@{version}"), name);
    Ok(out)
}

/// Interface fields first (the object's own declaration where it has one,
/// non-null when the interface's is), then the object's remaining fields.
///
/// An own declaration must have the interface field's type, up to an extra
/// non-null wrapper.
fn conform(
    own: Vec<Field>,
    iface: &InterfaceType,
    path: &str,
) -> Result<Vec<Field>, CompileError> {
    let mut rest = own;
    let mut fields = Vec::with_capacity(rest.len() + iface.fields.len());
    for shared in &iface.fields {
        match rest.iter().position(|f| f.name == shared.name) {
            Some(i) => {
                let mut field = rest.remove(i);
                if field.ty.nullable() != shared.ty.nullable() {
                    return Err(CompileError::InterfaceMismatch {
                        path: build_path(path, &["data", "schema", "properties", &field.key]),
                        interface: iface.name.clone(),
                        field: field.name,
                        expected: shared.ty.to_string(),
                        found: field.ty.to_string(),
                    });
                }
                if shared.ty.is_non_null() {
                    field.ty = TypeRef::non_null(field.ty);
                }
                fields.push(field);
            }
            None => fields.push(shared.clone()),
        }
    }
    fields.extend(rest);
    Ok(fields)
}
