//! Command-line compilation.
//!
//! Declarations come first so that later references can see them. Each
//! positional type reference then gets its own unit holding the write and
//! read code for a parameter `_arg` through the parcel `data`.

use std::fmt::Write;

use bidl_diagnostic::emitter::DiagnosticEmitter;
use bidl_diagnostic::ErrorGuaranteed;
use bidl_ir::{DeclSite, InterfaceDecl, ParcelableDecl, TypeId, Variable};
use bidl_types::WriteFlags;
use tracing::debug;

use crate::{CliOptions, Declaration, Session};

/// Site used for everything that came from the command line.
const COMMAND_LINE: &str = "<command line>";

/// Result of a command-line compilation.
#[derive(Debug)]
pub struct Output {
    /// Generated code, and the type dump when requested.
    pub text: String,
    pub result: Result<(), ErrorGuaranteed>,
}

/// Run one compilation, reporting diagnostics through `emitter`.
pub fn compile(options: &CliOptions, emitter: &mut dyn DiagnosticEmitter) -> Output {
    let mut session = Session::new(options.session.clone());
    let mut text = String::new();
    let mut position: u32 = 0;
    let mut next_site = || {
        position += 1;
        DeclSite::new(COMMAND_LINE, position)
    };

    for declaration in &options.declarations {
        let site = next_site();
        match declaration {
            Declaration::Parcelable { package, name } => {
                let decl = ParcelableDecl::new(package.as_str(), name.as_str(), site);
                session.declare_parcelable(&decl);
            }
            Declaration::Interface {
                package,
                name,
                oneway,
            } => {
                let mut decl = InterfaceDecl::new(package.as_str(), name.as_str(), site);
                decl.oneway = *oneway;
                session.declare_interface(&decl);
            }
        }
    }

    let parcel = Variable::new("data", TypeId::PARCEL);
    for reference in &options.type_refs {
        let site = next_site();
        let Some(ty) = session.resolve(reference, Some(site.clone())) else {
            continue;
        };
        if !session.require_marshallable(ty, Some(site)) {
            continue;
        }
        debug!(reference = reference.as_str(), %ty, "generating marshalling code");

        let qualified = session.registry().get(ty).qualified_name().to_string();
        let arg = Variable::new("_arg", ty);
        let mut unit = session.unit();
        unit.write(&arg, &parcel, WriteFlags::empty());
        unit.read(&arg, &parcel);

        let _ = writeln!(text, "// {qualified}");
        text.push_str(&unit.print());
        text.push('\n');
    }

    if session.config().dump_types {
        text.push_str(&session.registry().dump());
    }

    let result = session.finish(emitter);
    Output { text, result }
}
