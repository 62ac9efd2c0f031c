//! Per-build compiler state: the named-type registry, the name stack used to
//! derive names for anonymous nested types, and per-prefix counters for
//! minted names.
//!
//! One [`TypeContext`] belongs to exactly one build. It is passed by `&mut`
//! through the traversal and converted into an immutable
//! [`CompiledSchema`] when the build succeeds.

use std::collections::{BTreeMap, HashMap};
use std::ops::{Deref, DerefMut};

use serde_json::Value;

use crate::error::CompileError;
use crate::naming;
use crate::schema::CompiledSchema;
use crate::schema_utils;
use crate::types::{InterfaceType, NamedType, OutputType, Scalar};

#[derive(Debug, Default)]
pub struct TypeContext {
    types: BTreeMap<String, NamedType>,
    name_stack: Vec<String>,
    counters: HashMap<String, usize>,
    card_interface: Option<String>,
    card_types: BTreeMap<String, String>,
}

impl TypeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named type.
    ///
    /// Registering an identical shape under an existing name is a no-op, so a
    /// fragment reached twice resolves to the same type. A different shape
    /// under a taken name (including a scalar's name) fails the build.
    pub fn register(&mut self, ty: NamedType, path: &str) -> Result<OutputType, CompileError> {
        let name = ty.name().to_string();
        let taken_by_scalar = is_scalar_name(&name);
        match self.types.get(&name) {
            Some(existing) if existing == &ty => {}
            Some(_) => {
                return Err(CompileError::NameCollision {
                    path: path.to_string(),
                    name,
                })
            }
            None if taken_by_scalar => {
                return Err(CompileError::NameCollision {
                    path: path.to_string(),
                    name,
                })
            }
            None => {
                tracing::trace!(name = %name, path, "registered type");
                self.types.insert(name, ty.clone());
            }
        }
        Ok(ty.output())
    }

    pub fn get(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Push a name segment for the duration of the returned guard.
    ///
    /// The stack is truncated back to its previous depth when the guard drops,
    /// on success and error paths alike.
    pub fn enter(&mut self, segment: impl Into<String>) -> NameScope<'_> {
        let depth = self.name_stack.len();
        self.name_stack.push(segment.into());
        NameScope { ctx: self, depth }
    }

    /// Current name stack, outermost first.
    pub fn name_stack(&self) -> &[String] {
        &self.name_stack
    }

    /// Concatenation of the name stack, or `None` when it is empty.
    pub fn path_name(&self) -> Option<String> {
        if self.name_stack.is_empty() {
            None
        } else {
            Some(self.name_stack.concat())
        }
    }

    /// Mint `<prefix><n>` from the per-prefix counter, skipping names that are
    /// already registered.
    pub fn mint(&mut self, prefix: &str) -> String {
        loop {
            let counter = self.counters.entry(prefix.to_string()).or_insert(0);
            *counter += 1;
            let candidate = format!("{prefix}{counter}");
            if !self.types.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Name for a new anonymous-or-titled type: the fragment's `title`, else
    /// the name-stack path, else a minted `<prefix><n>`.
    pub fn name_for(&mut self, fragment: &Value, prefix: &str) -> String {
        if let Some(name) = title_name(fragment) {
            return name;
        }
        match self.path_name() {
            Some(name) => name,
            None => self.mint(prefix),
        }
    }

    /// Register a type under the name [`name_for`](Self::name_for) picks.
    ///
    /// A title is the author's own name and collides like any explicit
    /// registration. A path-derived or minted name is not: when a different
    /// shape already holds it, the first free `<name><n>` (from 2) is used.
    pub fn register_named(
        &mut self,
        fragment: &Value,
        prefix: &str,
        path: &str,
        make: impl Fn(String) -> NamedType,
    ) -> Result<OutputType, CompileError> {
        if let Some(name) = title_name(fragment) {
            return self.register(make(name), path);
        }
        let base = match self.path_name() {
            Some(name) => name,
            None => self.mint(prefix),
        };

        let mut n = 1;
        loop {
            let name = if n == 1 {
                base.clone()
            } else {
                format!("{base}{n}")
            };
            let ty = make(name.clone());
            let free = match self.types.get(&name) {
                Some(existing) => existing == &ty,
                None => !is_scalar_name(&name),
            };
            if free {
                if n > 1 {
                    tracing::debug!(base = %base, name = %name, path, "derived type name taken");
                }
                return self.register(ty, path);
            }
            n += 1;
        }
    }

    pub(crate) fn set_card_interface(&mut self, name: &str) {
        self.card_interface = Some(name.to_string());
    }

    /// The registered `Card` interface, once the base contract is compiled.
    pub fn card_interface(&self) -> Option<&InterfaceType> {
        match self.types.get(self.card_interface.as_deref()?) {
            Some(NamedType::Interface(iface)) => Some(iface),
            _ => None,
        }
    }

    pub(crate) fn record_card_type(&mut self, reference: String, type_name: String) {
        self.card_types.insert(reference, type_name);
    }

    /// Freeze the registry into an immutable schema.
    pub fn into_schema(self) -> CompiledSchema {
        CompiledSchema::new(self.types, self.card_interface, self.card_types)
    }
}

fn is_scalar_name(name: &str) -> bool {
    Scalar::ALL.iter().any(|s| s.name() == name)
}

/// The fragment's `title` as a type name, ignoring titles with no usable
/// characters.
fn title_name(fragment: &Value) -> Option<String> {
    let name = naming::type_name(schema_utils::title(fragment)?);
    (name != "_").then_some(name)
}

/// Scoped name-stack segment; see [`TypeContext::enter`].
pub struct NameScope<'a> {
    ctx: &'a mut TypeContext,
    depth: usize,
}

impl Deref for NameScope<'_> {
    type Target = TypeContext;

    fn deref(&self) -> &TypeContext {
        self.ctx
    }
}

impl DerefMut for NameScope<'_> {
    fn deref_mut(&mut self) -> &mut TypeContext {
        self.ctx
    }
}

impl Drop for NameScope<'_> {
    fn drop(&mut self) {
        self.ctx.name_stack.truncate(self.depth);
    }
}
