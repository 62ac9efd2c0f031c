//! # contract-graph-core
//!
//! Compile runtime-declared, versioned JSON Schema contracts into one typed
//! graph schema: a `Card` interface, one concrete object type per contract,
//! and every enum, union and scalar their fields need.
//!
//! ## Quick Start
//!
//! ```rust
//! use contract_graph_core::{compile, CompileOptions, ContractDefinition};
//! use serde_json::json;
//!
//! let contracts = vec![ContractDefinition::new(
//!     "message",
//!     "1.0.0",
//!     json!({
//!         "type": "object",
//!         "properties": {
//!             "data": {
//!                 "type": "object",
//!                 "properties": { "payload": { "type": "string" } },
//!                 "required": ["payload"]
//!             }
//!         }
//!     }),
//! )];
//!
//! let schema = compile(&contracts, &CompileOptions::default()).unwrap();
//! let message = schema
//!     .resolve_card_type(&json!({ "type": "message@1.0.0" }))
//!     .unwrap();
//! assert_eq!(message.name, "MessageV1_0_0");
//! println!("{}", schema.to_sdl());
//! ```
//!
//! ## Compilation
//!
//! Each contract's schema is traversed depth-first. Every fragment is matched
//! against a closed set of [`handlers`]; the highest-weight match compiles its
//! children first and then builds the fragment's output type, registering
//! named types in the per-build [`TypeContext`]. Builds are all-or-nothing:
//! any [`CompileError`] aborts the whole compilation.

pub mod config;
pub mod context;
pub mod contract;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod naming;
pub mod schema;
pub mod schema_utils;
pub mod types;

pub use config::CompileOptions;
pub use context::{NameScope, TypeContext};
pub use contract::{parse_contracts, ContractDefinition, BASE_CARD_SLUG, CARD_INTERFACE};
pub use engine::{compile, compile_fragment};
pub use error::{CompileError, ErrorCode, ResolveError};
pub use schema::CompiledSchema;
pub use schema_utils::build_path;
pub use types::{
    EnumType, EnumValue, Field, InterfaceType, NamedType, ObjectType, OutputType, Scalar,
    TypeRef, UnionType,
};
