//! Marshalling code emission.
//!
//! A [`Marshaller`] borrows the registry and one descriptor, and appends the
//! parcel operations for a value of that type to a caller-supplied [`Block`].
//! Each operation is all-or-nothing: on error the block and the class-loader
//! slot are left exactly as they were.
//!
//! # Operations
//!
//! | operation              | requires                   |
//! |------------------------|----------------------------|
//! | `emit_write`           | `can_marshal_directly`     |
//! | `emit_read`            | `can_marshal_directly`     |
//! | `emit_read_into`       | `supports_out_parameter`   |
//! | `emit_*_array*`        | `supports_array_form`      |
//!
//! Asking for an operation the type does not support is a compiler bug and
//! yields a [`MarshalError`].

mod families;

use bidl_diagnostic::{internal_error, Diagnostic};
use bidl_ir::{Block, Expr, Stmt, TypeId, Variable};
use bitflags::bitflags;
use tracing::{error, trace};

use crate::descriptor::TypeDescriptor;
use crate::registry::Registry;

bitflags! {
    /// Flags passed to `writeToParcel`.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct WriteFlags: u32 {
        /// The value is a method's return value.
        const RETURN_VALUE = 1 << 0;
    }
}

impl WriteFlags {
    /// The flags argument as an expression. Bits other than `RETURN_VALUE`
    /// have no wire meaning and render as `0`.
    pub fn to_expr(self) -> Expr {
        if self.contains(WriteFlags::RETURN_VALUE) {
            Expr::static_field(TypeId::PARCELABLE, "PARCELABLE_WRITE_RETURN_VALUE")
        } else {
            Expr::int(0)
        }
    }
}

/// The class loader of one generation unit, declared on first use.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ClassLoaderSlot {
    var: Option<Variable>,
}

impl ClassLoaderSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&Variable> {
        self.var.as_ref()
    }

    pub fn is_populated(&self) -> bool {
        self.var.is_some()
    }

    /// Return the class-loader local, declaring it in `out` the first time.
    pub(crate) fn ensure(&mut self, out: &mut Block) -> Variable {
        if let Some(var) = &self.var {
            return var.clone();
        }
        let var = Variable::new("cl", TypeId::CLASS_LOADER);
        let this_class = Expr::call(Expr::THIS, "getClass", Vec::new());
        out.push(Stmt::Declare {
            var: var.clone(),
            init: Expr::call(this_class, "getClassLoader", Vec::new()),
        });
        self.var = Some(var.clone());
        var
    }
}

/// An unsupported marshalling request.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum MarshalError {
    #[error("{ty} cannot be marshalled directly")]
    NotMarshallable { ty: String },

    #[error("{ty} has no array form")]
    NoArrayForm { ty: String },

    #[error("{ty} cannot be read into an existing value")]
    NoInPlaceRead { ty: String },

    #[error("interface {ty} has no registered {ty}.Stub")]
    MissingStub { ty: String },
}

impl MarshalError {
    /// Every marshalling error is an internal compiler error.
    pub fn to_diagnostic(&self) -> Diagnostic {
        internal_error(self.to_string())
    }
}

/// Emits marshalling code for one type.
#[derive(Copy, Clone, Debug)]
pub struct Marshaller<'r> {
    registry: &'r Registry,
    desc: &'r TypeDescriptor,
}

impl Registry {
    /// The marshaller for `id`.
    pub fn marshaller(&self, id: TypeId) -> Marshaller<'_> {
        Marshaller {
            registry: self,
            desc: self.get(id),
        }
    }
}

impl<'r> Marshaller<'r> {
    pub fn descriptor(&self) -> &'r TypeDescriptor {
        self.desc
    }

    /// Serialize `value` into `parcel`.
    pub fn emit_write(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
        flags: WriteFlags,
    ) -> Result<(), MarshalError> {
        self.emit("write", out, |block| self.write(block, value, parcel, flags))
    }

    /// Deserialize a new value from `parcel` and assign it to `value`.
    pub fn emit_read(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
        class_loader: &mut ClassLoaderSlot,
    ) -> Result<(), MarshalError> {
        let saved = class_loader.clone();
        let result = self.emit("read", out, |block| {
            self.read(block, value, parcel, class_loader)
        });
        if result.is_err() {
            *class_loader = saved;
        }
        result
    }

    /// Deserialize from `parcel` into the existing `value`.
    pub fn emit_read_into(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
        class_loader: &mut ClassLoaderSlot,
    ) -> Result<(), MarshalError> {
        let saved = class_loader.clone();
        let result = self.emit("read_into", out, |block| {
            self.read_into(block, value, parcel, class_loader)
        });
        if result.is_err() {
            *class_loader = saved;
        }
        result
    }

    pub fn emit_write_array(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
        flags: WriteFlags,
    ) -> Result<(), MarshalError> {
        self.emit("write_array", out, |block| {
            self.write_array(block, value, parcel, flags)
        })
    }

    /// Deserialize a new array.
    pub fn emit_read_array(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
    ) -> Result<(), MarshalError> {
        self.emit("read_array", out, |block| self.create_array(block, value, parcel))
    }

    /// Deserialize into an existing array.
    pub fn emit_read_array_into(
        &self,
        out: &mut Block,
        value: &Variable,
        parcel: &Variable,
    ) -> Result<(), MarshalError> {
        self.emit("read_array_into", out, |block| {
            self.read_array(block, value, parcel)
        })
    }

    /// Run `body` against a scratch block and append it to `out` on success.
    fn emit(
        &self,
        op: &'static str,
        out: &mut Block,
        body: impl FnOnce(&mut Block) -> Result<(), MarshalError>,
    ) -> Result<(), MarshalError> {
        let mut block = Block::new();
        match body(&mut block) {
            Ok(()) => {
                trace!(op, ty = self.desc.qualified_name(), stmts = block.len(), "emitted");
                out.append(block);
                Ok(())
            }
            Err(err) => {
                error!(op, ty = self.desc.qualified_name(), %err, "capability violation");
                Err(err)
            }
        }
    }

    fn type_name(&self) -> String {
        self.desc.qualified_name().to_string()
    }

    fn require_marshallable(&self) -> Result<(), MarshalError> {
        if self.desc.can_marshal_directly() {
            Ok(())
        } else {
            Err(MarshalError::NotMarshallable {
                ty: self.type_name(),
            })
        }
    }

    fn require_array_form(&self) -> Result<(), MarshalError> {
        self.require_marshallable()?;
        if self.desc.supports_array_form() {
            Ok(())
        } else {
            Err(MarshalError::NoArrayForm {
                ty: self.type_name(),
            })
        }
    }

    fn require_out_parameter(&self) -> Result<(), MarshalError> {
        self.require_marshallable()?;
        if self.desc.supports_out_parameter() {
            Ok(())
        } else {
            Err(MarshalError::NoInPlaceRead {
                ty: self.type_name(),
            })
        }
    }
}

#[cfg(test)]
mod tests;
