//! bidl IR - shared data structures for the bidl compiler.
//!
//! This crate contains the pieces every other phase agrees on:
//! - `TypeId` handles into the type registry, with fixed handles for built-ins
//! - `DeclSite` source locations for declared types
//! - Declaration inputs handed over by the IDL front end
//! - The output IR that marshalling code is emitted into
//!
//! # Design Philosophy
//!
//! - **Handles, not pointers**: types are referenced by `TypeId(u32)`
//! - **Write-only emission**: the IR is appended to through a `Block` cursor
//!   and never inspected by the code that emits it
//! - **Names resolved late**: the IR stores `TypeId`s and only the printer
//!   turns them into qualified names, through the `TypeNames` trait

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod decl;
pub mod ir;
mod site;
mod type_id;

pub use decl::{InterfaceDecl, ParcelableDecl};
pub use ir::{
    print_block, Block, CmpOp, Expr, Literal, MethodCall, Receiver, Stmt, TypeNames, Variable,
};
pub use site::DeclSite;
pub use type_id::TypeId;
