//! Type-reference resolution.
//!
//! `Registry::resolve` turns reference text into a handle. Plain names are
//! looked up directly; generic references (`List<pkg.Foo>`) are parsed,
//! their arguments resolved recursively, and the instantiation is built on
//! first use and memoized in the registry under its canonical name.

mod parse;

use bidl_diagnostic::{internal_error, Diagnostic, ErrorCode};
use bidl_ir::{DeclSite, TypeId};
use smallvec::SmallVec;
use tracing::debug;

use crate::descriptor::TypeDescriptor;
use crate::registry::Registry;

pub use parse::{parse_generic, GenericRef};

/// A fixed-arity generic container shape.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GenericTemplate {
    pub package: String,
    pub name: String,
    pub arity: usize,
}

impl GenericTemplate {
    pub fn new(package: impl Into<String>, name: impl Into<String>, arity: usize) -> Self {
        GenericTemplate {
            package: package.into(),
            name: name.into(),
            arity,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }

    /// Canonical name of an instantiation, e.g. `java.util.List<java.lang.String>`.
    pub fn instance_name<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> String {
        let args: Vec<&str> = args.into_iter().collect();
        format!("{}<{}>", self.qualified_name(), args.join(","))
    }
}

/// Failure to resolve a type reference.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown type {0}")]
    Unknown(String),

    #[error("unknown generic type {0}")]
    UnknownTemplate(String),

    #[error("{template} expects {expected} type argument(s), found {found}")]
    ArityMismatch {
        template: String,
        expected: usize,
        found: usize,
    },

    #[error("malformed generic type reference {0}")]
    Malformed(String),

    /// The template exists but no instantiation strategy is implemented.
    #[error("generic type {0} cannot be instantiated")]
    NoFactory(String),

    /// The canonical name of an instantiation is already taken by another kind.
    #[error("instantiation {0} conflicts with an existing type")]
    Conflict(String),
}

impl ResolveError {
    /// Internal failures point at a compiler bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, ResolveError::NoFactory(_) | ResolveError::Conflict(_))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ResolveError::Unknown(_) => ErrorCode::E2003,
            ResolveError::UnknownTemplate(_) => ErrorCode::E2004,
            ResolveError::ArityMismatch { .. } => ErrorCode::E2005,
            ResolveError::Malformed(_) => ErrorCode::E2006,
            ResolveError::NoFactory(_) | ResolveError::Conflict(_) => ErrorCode::E9001,
        }
    }

    /// Convert to a diagnostic pointing at the reference site.
    pub fn to_diagnostic(&self, site: Option<DeclSite>) -> Diagnostic {
        if self.is_internal() {
            return internal_error(self.to_string()).with_label(site, "while resolving this type");
        }
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(site, "referenced here")
    }
}

impl Registry {
    /// Resolve reference text to a registered type.
    ///
    /// Order: exact qualified name, short name, then generic instantiation.
    /// A failed argument fails the whole reference and registers nothing.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn resolve(&mut self, text: &str) -> Result<TypeId, ResolveError> {
        if let Some(id) = self.find_exact(text) {
            return Ok(id);
        }
        if let Some(id) = self.find_short(text) {
            return Ok(id);
        }
        if !text.contains('<') {
            return Err(ResolveError::Unknown(text.to_string()));
        }

        let normalized: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let generic = parse_generic(&normalized)?;

        let template = self
            .find_template(generic.base)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownTemplate(generic.base.to_string()))?;
        if template.arity != generic.args.len() {
            return Err(ResolveError::ArityMismatch {
                template: template.qualified_name(),
                expected: template.arity,
                found: generic.args.len(),
            });
        }

        let args = generic
            .args
            .iter()
            .map(|arg| self.resolve(arg))
            .collect::<Result<SmallVec<[TypeId; 2]>, _>>()?;

        let name = template.instance_name(args.iter().map(|&id| self.get(id).qualified_name()));
        if let Some(id) = self.find_exact(&name) {
            return Ok(id);
        }

        let desc = self.instantiate(&template, &args)?;
        debug!(%name, "instantiated generic type");
        self.try_register(desc).map_err(|_| ResolveError::Conflict(name))
    }

    /// Build the descriptor for `template<args>`.
    ///
    /// Only the one-argument list has a strategy; other templates fail closed.
    fn instantiate(
        &self,
        template: &GenericTemplate,
        args: &[TypeId],
    ) -> Result<TypeDescriptor, ResolveError> {
        match (template.package.as_str(), template.name.as_str(), args) {
            ("java.util", "List", &[element]) => Ok(TypeDescriptor::generic_list(
                template,
                element,
                self.get(element),
            )),
            _ => Err(ResolveError::NoFactory(template.qualified_name())),
        }
    }
}

#[cfg(test)]
mod tests;
