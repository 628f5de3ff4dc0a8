//! The type registry (namespace).
//!
//! Owns every descriptor of one compilation. Descriptors are stored densely
//! and addressed by `TypeId`; a hash index maps qualified names to handles.
//!
//! # Design
//!
//! - Built-ins are bootstrapped first, in `TypeId` constant order
//! - Qualified names are unique; registration never replaces an entry
//! - Short-name lookup scans in registration order, so built-ins win

mod builtins;

use std::fmt::Write;

use bidl_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use bidl_ir::{InterfaceDecl, ParcelableDecl, TypeId, TypeNames};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::descriptor::TypeDescriptor;
use crate::GenericTemplate;

/// Why a registration was refused.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Conflict {
    /// The name belongs to a built-in.
    BuiltIn { existing: TypeId },
    /// The name was declared with a different kind.
    KindMismatch { existing: TypeId },
}

/// Registry of all resolvable types.
#[derive(Clone, Debug)]
pub struct Registry {
    types: Vec<TypeDescriptor>,
    by_name: FxHashMap<String, TypeId>,
    templates: Vec<GenericTemplate>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry holding the built-in types and templates.
    pub fn new() -> Self {
        let mut registry = Registry {
            types: Vec::with_capacity(TypeId::BUILTIN_COUNT as usize * 2),
            by_name: FxHashMap::default(),
            templates: builtins::builtin_templates(),
        };
        for (expected, desc) in builtins::builtin_types() {
            let id = registry.insert(desc);
            debug_assert_eq!(id, expected, "built-in bootstrapped out of order");
        }
        registry
    }

    /// Append a descriptor that is known not to collide.
    fn insert(&mut self, mut desc: TypeDescriptor) -> TypeId {
        // Registries never approach u32::MAX entries.
        #[allow(clippy::cast_possible_truncation)]
        let id = TypeId::from_raw(self.types.len() as u32);
        desc.set_id(id);
        self.by_name.insert(desc.qualified_name().to_string(), id);
        self.types.push(desc);
        id
    }

    /// Register without reporting.
    ///
    /// Returns the canonical handle: the new one, or the existing one when an
    /// equal-kind descriptor was already present.
    pub fn try_register(&mut self, desc: TypeDescriptor) -> Result<TypeId, Conflict> {
        let Some(existing) = self.find_exact(desc.qualified_name()) else {
            let id = self.insert(desc);
            debug!(
                name = self.types[id.index()].qualified_name(),
                %id,
                "registered type"
            );
            return Ok(id);
        };

        let prior = self.get(existing);
        if prior.kind().is_builtin() {
            Err(Conflict::BuiltIn { existing })
        } else if prior.kind() != desc.kind() {
            Err(Conflict::KindMismatch { existing })
        } else {
            trace!(name = desc.qualified_name(), "re-declaration ignored");
            Ok(existing)
        }
    }

    /// Register a descriptor, reporting conflicts to `diags`.
    ///
    /// Returns `false` when the registration was refused; the registry is
    /// left unchanged in that case.
    pub fn register(&mut self, desc: TypeDescriptor, diags: &mut DiagnosticQueue) -> bool {
        let site = desc.decl_site().cloned();
        let name = desc.qualified_name().to_string();
        let kind = desc.kind();
        match self.try_register(desc) {
            Ok(_) => true,
            Err(conflict) => {
                debug!(%name, ?conflict, "registration refused");
                let diag = match conflict {
                    Conflict::BuiltIn { .. } => Diagnostic::error(ErrorCode::E2001)
                        .with_message(format!("attempt to redefine built in class {name}"))
                        .with_label(site, "redefined here"),
                    Conflict::KindMismatch { existing } => {
                        let prior = self.get(existing);
                        Diagnostic::error(ErrorCode::E2002)
                            .with_message(format!(
                                "attempt to redefine {name} as {},",
                                kind.human_readable()
                            ))
                            .with_label(site, "redefined here")
                            .with_secondary_label(
                                prior.decl_site().cloned(),
                                format!(
                                    "previously defined here as {}.",
                                    prior.human_readable_kind()
                                ),
                            )
                    }
                };
                diags.add(diag);
                false
            }
        }
    }

    /// Register a declared parcelable.
    pub fn register_parcelable(
        &mut self,
        decl: &ParcelableDecl,
        diags: &mut DiagnosticQueue,
    ) -> bool {
        self.register(TypeDescriptor::parcelable(decl), diags)
    }

    /// Register a declared interface together with its `Stub` and
    /// `Stub.Proxy` companions. All three registrations are attempted.
    pub fn register_interface(
        &mut self,
        decl: &InterfaceDecl,
        diags: &mut DiagnosticQueue,
    ) -> bool {
        let site = Some(decl.site.clone());
        let stub =
            TypeDescriptor::generated(&decl.package, format!("{}.Stub", decl.name), site.clone());
        let proxy =
            TypeDescriptor::generated(&decl.package, format!("{}.Stub.Proxy", decl.name), site);

        let mut ok = self.register(TypeDescriptor::interface(decl), diags);
        ok &= self.register(stub, diags);
        ok &= self.register(proxy, diags);
        ok
    }

    /// Look up by qualified name.
    pub fn find_exact(&self, qualified_name: &str) -> Option<TypeId> {
        let found = self.by_name.get(qualified_name).copied();
        trace!(qualified_name, ?found, "exact lookup");
        found
    }

    /// First descriptor, in registration order, whose short name matches.
    pub fn find_short(&self, name: &str) -> Option<TypeId> {
        let found = self
            .types
            .iter()
            .find(|t| t.name() == name)
            .map(TypeDescriptor::id);
        trace!(name, ?found, "short-name lookup");
        found
    }

    /// Look up `package.name`, or `name` alone in the default package.
    pub fn find(&self, package: &str, name: &str) -> Option<TypeId> {
        if package.is_empty() {
            self.find_exact(name)
        } else {
            self.find_exact(&format!("{package}.{name}"))
        }
    }

    /// Get the descriptor behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this registry.
    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeDescriptor {
        &self.types[id.index()]
    }

    pub fn try_get(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.types.get(id.index())
    }

    /// Find a generic template by qualified name, then by short name.
    pub fn find_template(&self, base: &str) -> Option<&GenericTemplate> {
        self.templates
            .iter()
            .find(|t| t.qualified_name() == base)
            .or_else(|| self.templates.iter().find(|t| t.name == base))
    }

    pub fn templates(&self) -> &[GenericTemplate] {
        &self.templates
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    /// One `type: package=.. name=.. qualifiedName=..` line per type.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for t in &self.types {
            let _ = writeln!(
                out,
                "type: package={} name={} qualifiedName={}",
                t.package(),
                t.name(),
                t.qualified_name()
            );
        }
        out
    }
}

impl TypeNames for Registry {
    fn qualified_name(&self, id: TypeId) -> &str {
        self.try_get(id).map_or("<unknown>", TypeDescriptor::qualified_name)
    }
}
