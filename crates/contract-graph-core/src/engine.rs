//! Traversal engine: depth-first, post-order compilation of fragments.
//!
//! For each fragment the engine selects a handler ([`handlers::select`]),
//! compiles the handler's children at `depth + 1` in order, and only then
//! calls the handler's `process` with the children's results. A parent never
//! runs before all of its children have returned.

use serde_json::Value;

use crate::config::CompileOptions;
use crate::context::TypeContext;
use crate::contract::ContractDefinition;
use crate::error::CompileError;
use crate::handlers;
use crate::schema::CompiledSchema;
use crate::schema_utils::build_path;
use crate::types::OutputType;

/// Compile an ordered contract collection into one schema.
///
/// Base `card` contracts are compiled first so the `Card` interface exists
/// before any concrete card conforms to it; the rest keep their input order.
/// Any failure aborts the whole build.
pub fn compile(
    contracts: &[ContractDefinition],
    options: &CompileOptions,
) -> Result<CompiledSchema, CompileError> {
    let base_card;
    let mut ordered: Vec<&ContractDefinition> =
        contracts.iter().filter(|c| c.is_base_card()).collect();
    if ordered.is_empty() && options.base_card {
        tracing::warn!("no `card` contract supplied; using the built-in card@1.0.0");
        base_card = ContractDefinition::base_card();
        ordered.push(&base_card);
    }
    ordered.extend(contracts.iter().filter(|c| !c.is_base_card()));

    let mut ctx = TypeContext::new();
    for contract in ordered {
        contract.validate()?;
        tracing::debug!(contract = %contract.type_reference(), "compiling contract");

        let fragment = contract.to_fragment();
        let root = format!("{}#", contract.type_reference());
        let mut scope = ctx.enter(contract.type_name());
        build(&fragment, &root, 0, &mut scope, options)?;
    }

    tracing::info!(types = ctx.len(), "schema compiled");
    Ok(ctx.into_schema())
}

/// Compile one bare fragment into `ctx`.
pub fn compile_fragment(
    fragment: &Value,
    ctx: &mut TypeContext,
    options: &CompileOptions,
) -> Result<OutputType, CompileError> {
    build(fragment, "#", 0, ctx, options)
}

fn build(
    fragment: &Value,
    path: &str,
    depth: usize,
    ctx: &mut TypeContext,
    options: &CompileOptions,
) -> Result<OutputType, CompileError> {
    if depth > options.max_depth {
        return Err(CompileError::DepthExceeded {
            path: path.to_string(),
            max_depth: options.max_depth,
        });
    }

    let handler = handlers::select(fragment, depth).ok_or_else(|| CompileError::NoHandlerMatch {
        path: path.to_string(),
    })?;
    tracing::trace!(path, depth, handler = ?handler.kind(), "selected handler");

    let children = handler.children(ctx);
    let mut results = Vec::with_capacity(children.len());
    for child in children {
        let segments: Vec<&str> = child.path.iter().map(String::as_str).collect();
        let child_path = build_path(path, &segments);
        let out = match child.segment {
            Some(segment) => {
                let mut scope = ctx.enter(segment);
                build(&child.fragment, &child_path, depth + 1, &mut scope, options)?
            }
            None => build(&child.fragment, &child_path, depth + 1, ctx, options)?,
        };
        results.push(out);
    }

    handler.process(results, ctx, path)
}
