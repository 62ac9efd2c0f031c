//! The compiled, immutable output schema.
//!
//! Built once per contract set (at start-up and on reload) and shared
//! read-only while serving. Query-time helpers resolve the concrete type of a
//! `Card` value and read field values through their original property keys.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use serde::Serialize;
use serde_json::Value;

use crate::error::ResolveError;
use crate::naming;
use crate::types::{
    EnumType, Field, InterfaceType, NamedType, ObjectType, Scalar, TypeRef, UnionType,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSchema {
    types: BTreeMap<String, NamedType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_interface: Option<String>,
    card_types: BTreeMap<String, String>,
}

impl CompiledSchema {
    pub(crate) fn new(
        types: BTreeMap<String, NamedType>,
        card_interface: Option<String>,
        card_types: BTreeMap<String, String>,
    ) -> Self {
        Self {
            types,
            card_interface,
            card_types,
        }
    }

    pub fn get(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        match self.types.get(name) {
            Some(NamedType::Object(t)) => Some(t),
            _ => None,
        }
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        match self.types.get(name) {
            Some(NamedType::Enum(t)) => Some(t),
            _ => None,
        }
    }

    pub fn union_type(&self, name: &str) -> Option<&UnionType> {
        match self.types.get(name) {
            Some(NamedType::Union(t)) => Some(t),
            _ => None,
        }
    }

    pub fn card_interface(&self) -> Option<&InterfaceType> {
        match self.types.get(self.card_interface.as_deref()?) {
            Some(NamedType::Interface(t)) => Some(t),
            _ => None,
        }
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// `(slug@version, type name)` for every compiled contract.
    pub fn card_type_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.card_types
            .iter()
            .map(|(reference, name)| (reference.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolve a `Card` value to its concrete object type from its
    /// `<slug>@<version>` type field. Only types compiled from a contract
    /// qualify, and there is no fallback: an unregistered type is an error.
    pub fn resolve_card_type(&self, value: &Value) -> Result<&ObjectType, ResolveError> {
        let field = self
            .card_interface()
            .map(|iface| iface.discriminator.as_str())
            .unwrap_or("type");
        let reference = value
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| ResolveError::MissingDiscriminator {
                field: field.to_string(),
            })?;
        let (slug, version) = naming::parse_type_reference(reference).ok_or_else(|| {
            ResolveError::MalformedTypeReference {
                reference: reference.to_string(),
            }
        })?;
        let unknown = || ResolveError::UnknownType {
            reference: reference.to_string(),
            type_name: naming::card_type_name(slug, version),
        };
        let type_name = self
            .card_types
            .get(&format!("{slug}@{version}"))
            .ok_or_else(unknown)?;
        self.object(type_name).ok_or_else(unknown)
    }

    /// Read a field's value through its original property key.
    pub fn resolve_field<'v>(&self, field: &Field, value: &'v Value) -> Option<&'v Value> {
        value.get(&field.key)
    }

    /// Custom scalars referenced by any field.
    pub fn scalars(&self) -> BTreeSet<Scalar> {
        let mut used = BTreeSet::new();
        let mut note = |ty: &TypeRef| {
            if let Some(s) = Scalar::ALL.iter().find(|s| s.name() == ty.base_name()) {
                if s.is_custom() {
                    used.insert(*s);
                }
            }
        };
        for ty in self.types.values() {
            let fields = match ty {
                NamedType::Object(t) => &t.fields,
                NamedType::Interface(t) => &t.fields,
                NamedType::Union(_) | NamedType::Enum(_) => continue,
            };
            for field in fields {
                note(&field.ty);
            }
        }
        used
    }

    /// Render as GraphQL SDL: custom scalars, then every type by name.
    pub fn to_sdl(&self) -> String {
        let mut out = String::new();
        for scalar in self.scalars() {
            let _ = writeln!(out, "scalar {}\n", scalar.name());
        }
        for ty in self.types.values() {
            match ty {
                NamedType::Enum(t) => {
                    let _ = writeln!(out, "enum {} {{", t.name);
                    for v in &t.values {
                        let _ = writeln!(out, "  {}", v.name);
                    }
                    out.push_str("}\n\n");
                }
                NamedType::Union(t) => {
                    let _ = writeln!(out, "union {} = {}\n", t.name, t.members.join(" | "));
                }
                NamedType::Interface(t) => {
                    let _ = writeln!(out, "interface {} {{", t.name);
                    write_fields(&mut out, &t.fields);
                    out.push_str("}\n\n");
                }
                NamedType::Object(t) => {
                    if let Some(desc) = &t.description {
                        let _ = writeln!(out, "{}", sdl_string(desc));
                    }
                    let _ = write!(out, "type {}", t.name);
                    if !t.interfaces.is_empty() {
                        let _ = write!(out, " implements {}", t.interfaces.join(" & "));
                    }
                    out.push_str(" {\n");
                    write_fields(&mut out, &t.fields);
                    out.push_str("}\n\n");
                }
            }
        }
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }
}

fn write_fields(out: &mut String, fields: &[Field]) {
    for field in fields {
        if let Some(desc) = &field.description {
            let _ = writeln!(out, "  {}", sdl_string(desc));
        }
        let _ = writeln!(out, "  {}: {}", field.name, field.ty);
    }
}

/// A JSON string literal is a valid single-line SDL string.
fn sdl_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnumValue, InterfaceType, UnionType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn field(name: &str, key: &str, ty: TypeRef) -> Field {
        Field {
            name: name.to_string(),
            key: key.to_string(),
            ty,
            description: None,
        }
    }

    fn fixture() -> CompiledSchema {
        let mut types = BTreeMap::new();
        types.insert(
            "Card".to_string(),
            NamedType::Interface(InterfaceType {
                name: "Card".to_string(),
                fields: vec![field(
                    "type",
                    "type",
                    TypeRef::non_null(TypeRef::named("String")),
                )],
                discriminator: "type".to_string(),
            }),
        );
        types.insert(
            "SupportThreadV2_1_0".to_string(),
            NamedType::Object(ObjectType {
                name: "SupportThreadV2_1_0".to_string(),
                fields: vec![
                    field("type", "type", TypeRef::non_null(TypeRef::named("String"))),
                    field("createdAt", "created_at", TypeRef::named("DateTime")),
                ],
                interfaces: vec!["Card".to_string()],
                description: Some("A support thread".to_string()),
            }),
        );
        types.insert(
            "Status".to_string(),
            NamedType::Enum(EnumType {
                name: "Status".to_string(),
                values: vec![EnumValue {
                    name: "OPEN".to_string(),
                    value: json!("open"),
                }],
            }),
        );
        types.insert(
            "Either".to_string(),
            NamedType::Union(UnionType {
                name: "Either".to_string(),
                members: vec!["A".to_string(), "B".to_string()],
            }),
        );
        let mut card_types = BTreeMap::new();
        card_types.insert(
            "support-thread@2.1.0".to_string(),
            "SupportThreadV2_1_0".to_string(),
        );
        CompiledSchema::new(types, Some("Card".to_string()), card_types)
    }

    #[test]
    fn test_resolve_card_type() {
        let schema = fixture();
        let resolved = schema
            .resolve_card_type(&json!({ "type": "support-thread@2.1.0" }))
            .unwrap();
        assert_eq!(resolved.name, "SupportThreadV2_1_0");
    }

    #[test]
    fn test_resolve_card_type_fails_loudly() {
        let schema = fixture();
        assert_eq!(
            schema.resolve_card_type(&json!({ "type": "support-thread@3.0.0" })),
            Err(ResolveError::UnknownType {
                reference: "support-thread@3.0.0".to_string(),
                type_name: "SupportThreadV3_0_0".to_string(),
            })
        );
        assert_eq!(
            schema.resolve_card_type(&json!({ "type": "support-thread" })),
            Err(ResolveError::MalformedTypeReference {
                reference: "support-thread".to_string(),
            })
        );
        assert_eq!(
            schema.resolve_card_type(&json!({ "slug": "x" })),
            Err(ResolveError::MissingDiscriminator {
                field: "type".to_string(),
            })
        );
        assert_eq!(
            schema.resolve_card_type(&json!({ "type": 7 })),
            Err(ResolveError::MissingDiscriminator {
                field: "type".to_string(),
            })
        );
    }

    #[test]
    fn test_resolve_card_type_ignores_non_card_objects() {
        let mut schema = fixture();
        // A nested object that happens to carry a card-shaped name.
        schema.types.insert(
            "GhostV1_0_0".to_string(),
            NamedType::Object(ObjectType {
                name: "GhostV1_0_0".to_string(),
                fields: vec![field("a", "a", TypeRef::named("String"))],
                interfaces: Vec::new(),
                description: None,
            }),
        );
        assert_eq!(
            schema.resolve_card_type(&json!({ "type": "ghost@1.0.0" })),
            Err(ResolveError::UnknownType {
                reference: "ghost@1.0.0".to_string(),
                type_name: "GhostV1_0_0".to_string(),
            })
        );
    }

    #[test]
    fn test_resolve_field_uses_original_key() {
        let schema = fixture();
        let object = schema.object("SupportThreadV2_1_0").unwrap();
        let created = object.field("createdAt").unwrap();
        let value = json!({ "created_at": "2024-01-01T00:00:00Z" });
        assert_eq!(
            schema.resolve_field(created, &value),
            Some(&json!("2024-01-01T00:00:00Z"))
        );
    }

    #[test]
    fn test_sdl_rendering() {
        let sdl = fixture().to_sdl();
        let expected = r#"scalar DateTime

interface Card {
  type: String!
}

union Either = A | B

enum Status {
  OPEN
}

"A support thread"
type SupportThreadV2_1_0 implements Card {
  type: String!
  createdAt: DateTime
}
"#;
        assert_eq!(sdl, expected);
    }

    #[test]
    fn test_json_serialization() {
        let value = serde_json::to_value(fixture()).unwrap();
        assert_eq!(value["card_interface"], json!("Card"));
        assert_eq!(
            value["types"]["SupportThreadV2_1_0"]["fields"][1],
            json!({ "name": "createdAt", "key": "created_at", "type": "DateTime" })
        );
        assert_eq!(
            value["card_types"]["support-thread@2.1.0"],
            json!("SupportThreadV2_1_0")
        );
    }
}
