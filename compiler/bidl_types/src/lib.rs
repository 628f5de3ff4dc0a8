//! Type system of the bidl compiler.
//!
//! - [`Registry`]: every resolvable type of one compilation, keyed by
//!   qualified name and addressed by `TypeId`
//! - [`TypeDescriptor`]: names, kind, capabilities, and wire [`Family`]
//! - `Registry::resolve`: reference text to handle, instantiating generic
//!   lists on demand
//! - [`Marshaller`]: parcel read/write code for a resolved type
//!
//! # Architecture
//!
//! ```text
//! "List<pkg.Foo>"
//!     └── Registry::resolve ──> TypeId
//!             └── Registry::marshaller(id)
//!                     └── emit_write / emit_read / ... ──> bidl_ir::Block
//! ```

mod descriptor;
mod marshal;
mod registry;
mod resolve;

pub use descriptor::{
    ContainerKind, Creator, Family, GenericInfo, PrimitiveOps, TypeDescriptor, TypeKind,
};
pub use marshal::{ClassLoaderSlot, MarshalError, Marshaller, WriteFlags};
pub use registry::{Conflict, Registry};
pub use resolve::{parse_generic, GenericRef, GenericTemplate, ResolveError};

bidl_ir::static_assert_size!(Creator, 8);
