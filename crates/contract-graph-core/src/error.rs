//! Error types for schema compilation and query-time type resolution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes.
///
/// Variant names and their serialized `snake_case` strings are part of the
/// public contract: tooling that reports build failures keys off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// JSON (de)serialization error.
    JsonParseError,
    /// No handler accepted a fragment.
    NoHandlerMatch,
    /// Two distinct shapes would register under one type name.
    NameCollision,
    /// An `enum` member (or other literal) has an unrepresentable value.
    MalformedLiteral,
    /// A union branch resolved to something other than an object type.
    InvalidUnionMember,
    /// Fragment nesting exceeded the configured maximum depth.
    DepthExceeded,
    /// A `$ref` was encountered; references are not followed.
    UnsupportedReference,
    /// A contract record cannot produce a valid type name.
    InvalidContract,
    /// A card redeclares an interface field with a different type.
    InterfaceMismatch,
}

/// A fatal schema build failure.
///
/// Every variant aborts the entire build; no partial schema is ever returned.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No handler accepts the fragment at {path}")]
    NoHandlerMatch { path: String },

    #[error("Type name collision at {path}: `{name}` is already registered with a different shape")]
    NameCollision { path: String, name: String },

    #[error("Malformed literal at {path}: {message}")]
    MalformedLiteral { path: String, message: String },

    #[error("Invalid union member at {path}: branch resolves to {found}, expected an object type")]
    InvalidUnionMember { path: String, found: String },

    #[error("Fragment nesting depth exceeded at {path} (max: {max_depth})")]
    DepthExceeded { path: String, max_depth: usize },

    #[error("Unsupported reference at {path}: {reference}")]
    UnsupportedReference { path: String, reference: String },

    #[error("Invalid contract `{slug}`: {message}")]
    InvalidContract { slug: String, message: String },

    #[error("Field `{field}` at {path} is {found}, but interface `{interface}` declares {expected}")]
    InterfaceMismatch {
        path: String,
        interface: String,
        field: String,
        expected: String,
        found: String,
    },
}

impl CompileError {
    /// Stable error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            CompileError::Json(_) => ErrorCode::JsonParseError,
            CompileError::NoHandlerMatch { .. } => ErrorCode::NoHandlerMatch,
            CompileError::NameCollision { .. } => ErrorCode::NameCollision,
            CompileError::MalformedLiteral { .. } => ErrorCode::MalformedLiteral,
            CompileError::InvalidUnionMember { .. } => ErrorCode::InvalidUnionMember,
            CompileError::DepthExceeded { .. } => ErrorCode::DepthExceeded,
            CompileError::UnsupportedReference { .. } => ErrorCode::UnsupportedReference,
            CompileError::InvalidContract { .. } => ErrorCode::InvalidContract,
            CompileError::InterfaceMismatch { .. } => ErrorCode::InterfaceMismatch,
        }
    }

    /// JSON Pointer of the offending fragment, when the failure has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            CompileError::NoHandlerMatch { path }
            | CompileError::NameCollision { path, .. }
            | CompileError::MalformedLiteral { path, .. }
            | CompileError::InvalidUnionMember { path, .. }
            | CompileError::DepthExceeded { path, .. }
            | CompileError::UnsupportedReference { path, .. }
            | CompileError::InterfaceMismatch { path, .. } => Some(path),
            CompileError::Json(_) | CompileError::InvalidContract { .. } => None,
        }
    }
}

/// Failure to resolve a runtime value to a concrete output type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Value has no string `{field}` field to resolve its type from")]
    MissingDiscriminator { field: String },

    #[error("Malformed type reference `{reference}`: expected `<slug>@<version>`")]
    MalformedTypeReference { reference: String },

    #[error("Type `{type_name}` (from `{reference}`) is not registered as a concrete object type")]
    UnknownType {
        reference: String,
        type_name: String,
    },
}
