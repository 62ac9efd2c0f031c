//! Output type model: the typed graph schema produced by compilation.
//!
//! [`OutputType`] is what a handler returns for one fragment. Named types
//! (objects, interfaces, unions, enums) are registered in the
//! [`TypeContext`](crate::context::TypeContext) and referenced by name.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Built-in and custom leaf scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Scalar {
    String,
    Int,
    Float,
    Boolean,
    DateTime,
    Markdown,
    Uuid,
    Email,
    /// Any JSON value.
    Json,
    /// A value that can never be satisfied (`false` schema).
    Never,
}

impl Scalar {
    /// Name of the scalar in the output schema.
    pub fn name(self) -> &'static str {
        match self {
            Scalar::String => "String",
            Scalar::Int => "Int",
            Scalar::Float => "Float",
            Scalar::Boolean => "Boolean",
            Scalar::DateTime => "DateTime",
            Scalar::Markdown => "Markdown",
            Scalar::Uuid => "UUID",
            Scalar::Email => "Email",
            Scalar::Json => "JSON",
            Scalar::Never => "Never",
        }
    }

    /// `false` for scalars every graph schema has built in.
    pub fn is_custom(self) -> bool {
        !matches!(
            self,
            Scalar::String | Scalar::Int | Scalar::Float | Scalar::Boolean
        )
    }

    /// Every scalar, in declaration order.
    pub const ALL: [Scalar; 10] = [
        Scalar::String,
        Scalar::Int,
        Scalar::Float,
        Scalar::Boolean,
        Scalar::DateTime,
        Scalar::Markdown,
        Scalar::Uuid,
        Scalar::Email,
        Scalar::Json,
        Scalar::Never,
    ];
}

/// Result of processing one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputType {
    /// The fragment carries no representable type; no field is emitted.
    Null,
    Scalar(Scalar),
    Enum(String),
    Object(String),
    Interface(String),
    Union(String),
    List(Box<OutputType>),
}

impl OutputType {
    /// `true` for a registered object type, the only legal union member.
    pub fn is_object(&self) -> bool {
        matches!(self, OutputType::Object(_))
    }

    /// Field type reference, or `None` for [`OutputType::Null`]. List
    /// elements are non-null.
    pub fn to_type_ref(&self) -> Option<TypeRef> {
        match self {
            OutputType::Null => None,
            OutputType::Scalar(s) => Some(TypeRef::named(s.name())),
            OutputType::Enum(name)
            | OutputType::Object(name)
            | OutputType::Interface(name)
            | OutputType::Union(name) => Some(TypeRef::named(name)),
            OutputType::List(inner) => {
                let item = inner
                    .to_type_ref()
                    .unwrap_or_else(|| TypeRef::named(Scalar::Json.name()));
                Some(TypeRef::list(TypeRef::non_null(item)))
            }
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            OutputType::Null => "null".to_string(),
            OutputType::Scalar(s) => format!("scalar `{}`", s.name()),
            OutputType::Enum(n) => format!("enum `{n}`"),
            OutputType::Object(n) => format!("object `{n}`"),
            OutputType::Interface(n) => format!("interface `{n}`"),
            OutputType::Union(n) => format!("union `{n}`"),
            OutputType::List(inner) => format!("list of {}", inner.describe()),
        }
    }
}

/// A reference to a type from a field: named, list, or non-null wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Wrap in non-null. Already non-null references are returned unchanged.
    pub fn non_null(inner: TypeRef) -> Self {
        match inner {
            TypeRef::NonNull(_) => inner,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// The reference without its outer non-null wrapper.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An output field, retaining the original property key for value
/// resolution at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub key: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectType {
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ObjectType {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An interface whose concrete type is chosen at query time from the value's
/// `discriminator` field (see [`CompiledSchema::resolve_card_type`]).
///
/// [`CompiledSchema::resolve_card_type`]: crate::schema::CompiledSchema::resolve_card_type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceType {
    pub name: String,
    pub fields: Vec<Field>,
    pub discriminator: String,
}

impl InterfaceType {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnionType {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<EnumValue>,
}

impl EnumType {
    /// Identifier of the enum value whose literal equals `literal`.
    pub fn name_for(&self, literal: &Value) -> Option<&str> {
        self.values
            .iter()
            .find(|v| &v.value == literal)
            .map(|v| v.name.as_str())
    }
}

/// A type registered under a unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamedType {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            NamedType::Object(t) => &t.name,
            NamedType::Interface(t) => &t.name,
            NamedType::Union(t) => &t.name,
            NamedType::Enum(t) => &t.name,
        }
    }

    /// The [`OutputType`] that refers to this type.
    pub fn output(&self) -> OutputType {
        let name = self.name().to_string();
        match self {
            NamedType::Object(_) => OutputType::Object(name),
            NamedType::Interface(_) => OutputType::Interface(name),
            NamedType::Union(_) => OutputType::Union(name),
            NamedType::Enum(_) => OutputType::Enum(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_type_ref_display() {
        let t = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("Email"))));
        assert_eq!(t.to_string(), "[Email!]!");
        assert_eq!(t.base_name(), "Email");
    }

    #[test]
    fn test_non_null_is_idempotent() {
        let t = TypeRef::non_null(TypeRef::non_null(TypeRef::named("String")));
        assert_eq!(t.to_string(), "String!");
    }

    #[test]
    fn test_list_output_to_type_ref() {
        let out = OutputType::List(Box::new(OutputType::Scalar(Scalar::Uuid)));
        assert_eq!(out.to_type_ref().unwrap().to_string(), "[UUID!]");
        assert_eq!(OutputType::Null.to_type_ref(), None);
    }

    #[test]
    fn test_enum_name_for_literal() {
        let e = EnumType {
            name: "Status".to_string(),
            values: vec![
                EnumValue {
                    name: "OPEN".to_string(),
                    value: json!("open"),
                },
                EnumValue {
                    name: "OPTION_1".to_string(),
                    value: json!(1),
                },
            ],
        };
        assert_eq!(e.name_for(&json!(1)), Some("OPTION_1"));
        assert_eq!(e.name_for(&json!("closed")), None);
    }

    #[test]
    fn test_named_type_serializes_with_kind_tag() {
        let t = NamedType::Union(UnionType {
            name: "U".to_string(),
            members: vec!["A".to_string()],
        });
        assert_eq!(
            serde_json::to_value(&t).unwrap(),
            json!({ "kind": "union", "name": "U", "members": ["A"] })
        );
    }
}
