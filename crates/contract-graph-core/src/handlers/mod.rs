//! Fragment handlers.
//!
//! Each [`HandlerKind`] is one strategy: a predicate (`can_handle`), a
//! priority (`weight`), a child extraction step (`children`) and a type
//! construction step (`process`). The set is closed; [`select`] evaluates
//! every variant against a fragment and keeps the highest-weight match, with
//! ties going to the variant declared first in [`HANDLERS`].
//!
//! | Module       | Handlers                                                   |
//! |--------------|------------------------------------------------------------|
//! | `scalar`     | string + formats, email shapes, number, integer, boolean, null, const, `$ref`, `false`, catch-all |
//! | `enums`      | `enum`                                                     |
//! | `compound`   | multi-type normalization, `anyOf`/`oneOf` unions, arrays   |
//! | `object`     | objects, the `Card` interface, concrete card objects       |

mod compound;
mod enums;
mod object;
mod scalar;

use serde_json::Value;

use crate::context::TypeContext;
use crate::error::CompileError;
use crate::types::{OutputType, Scalar};

/// Weight of a handler that does not need to outrank anything.
pub const DEFAULT_WEIGHT: i32 = 50;

/// The closed set of handler variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    CardInterface,
    CardObject,
    Reference,
    MultiType,
    Never,
    EmailAnyOf,
    EmailArray,
    Enum,
    Email,
    DateTime,
    Markdown,
    Uuid,
    Const,
    Null,
    Object,
    Union,
    Array,
    Number,
    Integer,
    Boolean,
    String,
    Any,
}

/// Declaration order. Earlier entries win weight ties.
pub const HANDLERS: [HandlerKind; 22] = [
    HandlerKind::CardInterface,
    HandlerKind::CardObject,
    HandlerKind::Reference,
    HandlerKind::MultiType,
    HandlerKind::Never,
    HandlerKind::EmailAnyOf,
    HandlerKind::EmailArray,
    HandlerKind::Enum,
    HandlerKind::Email,
    HandlerKind::DateTime,
    HandlerKind::Markdown,
    HandlerKind::Uuid,
    HandlerKind::Const,
    HandlerKind::Null,
    HandlerKind::Object,
    HandlerKind::Union,
    HandlerKind::Array,
    HandlerKind::Number,
    HandlerKind::Integer,
    HandlerKind::Boolean,
    HandlerKind::String,
    HandlerKind::Any,
];

/// A child fragment to compile before the parent's `process` runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub fragment: Value,
    /// Name-stack segment pushed while the child compiles.
    pub segment: Option<String>,
    /// JSON Pointer segments from the parent fragment to this child.
    pub path: Vec<String>,
}

impl Child {
    /// A rewritten stand-in for the parent fragment itself.
    pub(crate) fn rewritten(fragment: Value) -> Self {
        Self {
            fragment,
            segment: None,
            path: Vec::new(),
        }
    }
}

/// A handler instance bound to one fragment at one traversal depth.
#[derive(Debug, Clone, Copy)]
pub struct Handler<'a> {
    kind: HandlerKind,
    fragment: &'a Value,
    depth: usize,
}

impl<'a> Handler<'a> {
    pub fn new(kind: HandlerKind, fragment: &'a Value, depth: usize) -> Self {
        Self {
            kind,
            fragment,
            depth,
        }
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    pub fn can_handle(&self) -> bool {
        let f = self.fragment;
        match self.kind {
            HandlerKind::CardInterface => object::is_card_interface(f, self.depth),
            HandlerKind::CardObject => object::is_card_object(f, self.depth),
            HandlerKind::Reference => scalar::is_reference(f),
            HandlerKind::MultiType => compound::is_multi_type(f),
            HandlerKind::Never => scalar::is_never(f),
            HandlerKind::EmailAnyOf => scalar::is_email_any_of(f),
            HandlerKind::EmailArray => scalar::is_email_array(f),
            HandlerKind::Enum => enums::is_enum(f),
            HandlerKind::Email => scalar::is_email(f),
            HandlerKind::DateTime => scalar::is_date_time(f),
            HandlerKind::Markdown => scalar::is_markdown(f),
            HandlerKind::Uuid => scalar::is_uuid(f),
            HandlerKind::Const => scalar::is_const(f),
            HandlerKind::Null => scalar::is_null(f),
            HandlerKind::Object => object::is_object(f),
            HandlerKind::Union => compound::is_union(f),
            HandlerKind::Array => compound::is_array(f),
            HandlerKind::Number => scalar::is_number(f),
            HandlerKind::Integer => scalar::is_integer(f),
            HandlerKind::Boolean => scalar::is_boolean(f),
            HandlerKind::String => scalar::is_string(f),
            HandlerKind::Any => true,
        }
    }

    pub fn weight(&self) -> i32 {
        match self.kind {
            HandlerKind::CardInterface => 100,
            HandlerKind::CardObject => 90,
            HandlerKind::Reference => 85,
            HandlerKind::MultiType => 80,
            HandlerKind::Never => 75,
            HandlerKind::EmailAnyOf | HandlerKind::EmailArray => 60,
            HandlerKind::Object
            | HandlerKind::Union
            | HandlerKind::Array
            | HandlerKind::Number
            | HandlerKind::Integer
            | HandlerKind::Boolean => 40,
            // Any stricter string matcher must win over plain `type: string`.
            HandlerKind::String => 10,
            HandlerKind::Any => 0,
            _ => DEFAULT_WEIGHT,
        }
    }

    /// Child fragments, in the order their results are passed to `process`.
    pub fn children(&self, ctx: &TypeContext) -> Vec<Child> {
        let f = self.fragment;
        match self.kind {
            HandlerKind::CardInterface | HandlerKind::CardObject => object::card_children(f),
            HandlerKind::MultiType => compound::multi_type_children(f),
            HandlerKind::Object => object::object_children(f),
            HandlerKind::Union => compound::union_children(f, ctx),
            HandlerKind::Array => compound::array_children(f),
            _ => Vec::new(),
        }
    }

    /// Build the output type from the compiled children.
    pub fn process(
        &self,
        children: Vec<OutputType>,
        ctx: &mut TypeContext,
        path: &str,
    ) -> Result<OutputType, CompileError> {
        let f = self.fragment;
        match self.kind {
            HandlerKind::CardInterface => object::process_card_interface(f, children, ctx, path),
            HandlerKind::CardObject => object::process_card_object(f, children, ctx, path),
            HandlerKind::Reference => scalar::process_reference(f, path),
            HandlerKind::MultiType => Ok(compound::process_multi_type(children)),
            HandlerKind::Enum => enums::process_enum(f, ctx, path),
            HandlerKind::Object => object::process_object(f, children, ctx, path),
            HandlerKind::Union => compound::process_union(f, children, ctx, path),
            HandlerKind::Array => Ok(compound::process_array(children)),
            HandlerKind::Const => Ok(scalar::process_const(f)),
            HandlerKind::EmailAnyOf | HandlerKind::EmailArray => Ok(scalar::email_list()),
            HandlerKind::Email => Ok(OutputType::Scalar(Scalar::Email)),
            HandlerKind::DateTime => Ok(OutputType::Scalar(Scalar::DateTime)),
            HandlerKind::Markdown => Ok(OutputType::Scalar(Scalar::Markdown)),
            HandlerKind::Uuid => Ok(OutputType::Scalar(Scalar::Uuid)),
            HandlerKind::Number => Ok(OutputType::Scalar(Scalar::Float)),
            HandlerKind::Integer => Ok(OutputType::Scalar(Scalar::Int)),
            HandlerKind::Boolean => Ok(OutputType::Scalar(Scalar::Boolean)),
            HandlerKind::String => Ok(OutputType::Scalar(Scalar::String)),
            HandlerKind::Never => Ok(OutputType::Scalar(Scalar::Never)),
            HandlerKind::Any => Ok(OutputType::Scalar(Scalar::Json)),
            HandlerKind::Null => Ok(OutputType::Null),
        }
    }
}

/// Pick the handler for a fragment: the highest weight among variants whose
/// predicate accepts it, first-declared on ties.
pub fn select(fragment: &Value, depth: usize) -> Option<Handler<'_>> {
    let mut best: Option<Handler<'_>> = None;
    for kind in HANDLERS {
        let candidate = Handler::new(kind, fragment, depth);
        if !candidate.can_handle() {
            continue;
        }
        let outranks = best
            .as_ref()
            .map_or(true, |current| candidate.weight() > current.weight());
        if outranks {
            best = Some(candidate);
        }
    }
    best
}

/// Every variant that accepts the fragment, in declaration order.
pub fn matching(fragment: &Value, depth: usize) -> Vec<HandlerKind> {
    HANDLERS
        .into_iter()
        .filter(|kind| Handler::new(*kind, fragment, depth).can_handle())
        .collect()
}
