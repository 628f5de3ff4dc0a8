//! Compilation session.
//!
//! A `Session` owns the type registry and the diagnostic queue of one run.
//! Declarations and type references go in; every failure becomes a
//! diagnostic, so callers keep going and report everything at the end.
//!
//! Marshalling code is produced one [`MethodUnit`] at a time. A unit is one
//! generated method: it holds the output block and the class-loader slot
//! shared by every container read in that method.

use bidl_diagnostic::emitter::DiagnosticEmitter;
use bidl_diagnostic::queue::too_many_errors;
use bidl_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorGuaranteed};
use bidl_ir::{print_block, Block, DeclSite, InterfaceDecl, ParcelableDecl, TypeId, Variable};
use bidl_types::{ClassLoaderSlot, MarshalError, Registry, WriteFlags};
use tracing::debug;

use crate::SessionConfig;

/// One compilation run.
pub struct Session {
    config: SessionConfig,
    registry: Registry,
    diagnostics: DiagnosticQueue,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let diagnostics = DiagnosticQueue::with_config(config.diagnostics.clone());
        Session {
            config,
            registry: Registry::new(),
            diagnostics,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    /// Register a parcelable; conflicts are reported, not fatal.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(package = %decl.package, name = %decl.name)
    )]
    pub fn declare_parcelable(&mut self, decl: &ParcelableDecl) -> bool {
        self.registry.register_parcelable(decl, &mut self.diagnostics)
    }

    /// Register an interface and its stub companions.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(package = %decl.package, name = %decl.name)
    )]
    pub fn declare_interface(&mut self, decl: &InterfaceDecl) -> bool {
        self.registry.register_interface(decl, &mut self.diagnostics)
    }

    /// Resolve a type reference, reporting failure at `site`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resolve(&mut self, text: &str, site: Option<DeclSite>) -> Option<TypeId> {
        match self.registry.resolve(text) {
            Ok(id) => Some(id),
            Err(err) => {
                debug!(%err, "unresolved type reference");
                self.report(err.to_diagnostic(site));
                None
            }
        }
    }

    /// Check that values of `ty` have a wire encoding, reporting at `site`
    /// when they do not.
    ///
    /// Callers must pass this check before asking a unit to marshal `ty`.
    pub fn require_marshallable(&mut self, ty: TypeId, site: Option<DeclSite>) -> bool {
        let desc = self.registry.get(ty);
        if desc.can_marshal_directly() {
            return true;
        }
        let diag = Diagnostic::error(ErrorCode::E2007)
            .with_message(format!("type {} cannot be marshalled", desc.qualified_name()))
            .with_label(site, "referenced here")
            .with_note(format!(
                "{} is {} without a parcel encoding",
                desc.qualified_name(),
                desc.human_readable_kind()
            ));
        debug!(ty = desc.qualified_name(), "type cannot be marshalled");
        self.report(diag);
        false
    }

    /// Start a new generation unit.
    pub fn unit(&mut self) -> MethodUnit<'_> {
        MethodUnit {
            session: self,
            block: Block::new(),
            class_loader: ClassLoaderSlot::new(),
        }
    }

    fn report(&mut self, diag: Diagnostic) {
        self.diagnostics.add(diag);
    }

    /// Emit every queued diagnostic and a summary.
    ///
    /// Fails when at least one error was reported during the session.
    pub fn finish(&mut self, emitter: &mut dyn DiagnosticEmitter) -> Result<(), ErrorGuaranteed> {
        let error_count = self.diagnostics.error_count();
        let guarantee = self.diagnostics.has_errors();
        let truncated = self.diagnostics.dropped_count() > 0;
        let diagnostics = self.diagnostics.flush();
        let warning_count = diagnostics.iter().filter(|d| !d.is_error()).count();

        emitter.emit_all(&diagnostics);
        if truncated {
            emitter.emit(&too_many_errors(self.config.diagnostics.error_limit));
        }
        emitter.emit_summary(error_count, warning_count);
        emitter.flush();

        match guarantee {
            Some(guarantee) => Err(guarantee),
            None => Ok(()),
        }
    }
}

/// Output of one generated method.
pub struct MethodUnit<'s> {
    session: &'s mut Session,
    block: Block,
    class_loader: ClassLoaderSlot,
}

impl MethodUnit<'_> {
    /// Serialize `value`, typed by its declared type.
    pub fn write(&mut self, value: &Variable, parcel: &Variable, flags: WriteFlags) -> bool {
        let result = self.session.registry.marshaller(value.ty).emit_write(
            &mut self.block,
            value,
            parcel,
            flags,
        );
        self.record(result)
    }

    pub fn read(&mut self, value: &Variable, parcel: &Variable) -> bool {
        let result = self.session.registry.marshaller(value.ty).emit_read(
            &mut self.block,
            value,
            parcel,
            &mut self.class_loader,
        );
        self.record(result)
    }

    /// Read into an existing out or inout parameter.
    pub fn read_into(&mut self, value: &Variable, parcel: &Variable) -> bool {
        let result = self.session.registry.marshaller(value.ty).emit_read_into(
            &mut self.block,
            value,
            parcel,
            &mut self.class_loader,
        );
        self.record(result)
    }

    pub fn write_array(&mut self, value: &Variable, parcel: &Variable, flags: WriteFlags) -> bool {
        let result = self.session.registry.marshaller(value.ty).emit_write_array(
            &mut self.block,
            value,
            parcel,
            flags,
        );
        self.record(result)
    }

    pub fn read_array(&mut self, value: &Variable, parcel: &Variable) -> bool {
        let result = self
            .session
            .registry
            .marshaller(value.ty)
            .emit_read_array(&mut self.block, value, parcel);
        self.record(result)
    }

    pub fn read_array_into(&mut self, value: &Variable, parcel: &Variable) -> bool {
        let result = self
            .session
            .registry
            .marshaller(value.ty)
            .emit_read_array_into(&mut self.block, value, parcel);
        self.record(result)
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn class_loader(&self) -> &ClassLoaderSlot {
        &self.class_loader
    }

    /// Render the emitted code.
    pub fn print(&self) -> String {
        print_block(&self.session.registry, &self.block)
    }

    pub fn into_block(self) -> Block {
        self.block
    }

    /// A capability violation is a compiler bug; surface it as E9001.
    fn record(&mut self, result: Result<(), MarshalError>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.session.report(err.to_diagnostic());
                false
            }
        }
    }
}
