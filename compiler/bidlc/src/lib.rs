//! The bidl compiler driver.
//!
//! Ties the type system to a session that collects diagnostics, and exposes
//! the small command-line front end used by the `bidlc` binary.

pub mod config;
mod driver;
mod session;

use std::sync::Once;

pub use config::{parse_options, CliOptions, Declaration, OptionError, SessionConfig};
pub use driver::{compile, Output};
pub use session::{MethodUnit, Session};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set; safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(layer)
                .with(filter)
                .init();
        }
    });
}
