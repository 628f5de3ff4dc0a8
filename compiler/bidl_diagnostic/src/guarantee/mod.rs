//! Type-level proof that an error was reported.

use std::fmt;

/// Proof that at least one error diagnostic was emitted.
///
/// Only the diagnostic queue constructs one, so a function returning
/// `Result<T, ErrorGuaranteed>` cannot fail without having reported why.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Get proof from an error count, if any errors were counted.
    pub fn from_error_count(count: usize) -> Option<Self> {
        if count > 0 {
            Some(ErrorGuaranteed(()))
        } else {
            None
        }
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}
