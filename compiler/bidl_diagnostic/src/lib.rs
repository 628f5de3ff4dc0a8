//! Diagnostic system for the bidl compiler.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary site (where it went wrong)
//! - Secondary labels (where the conflicting declaration lives)
//!
//! # Error Guarantees
//!
//! The `ErrorGuaranteed` type provides type-level proof that at least one
//! error was emitted:
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn finish() -> Result<Output, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{internal_error, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
