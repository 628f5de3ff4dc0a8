//! Error codes for all compiler diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E2001`) with the first digit
//! indicating the phase that produced it.

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E2xxx: Type registration and resolution errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Type Errors (E2xxx)
    /// Attempt to redefine a built-in type
    E2001,
    /// Type redefined with a different kind
    E2002,
    /// Unknown type
    E2003,
    /// Unknown generic template
    E2004,
    /// Wrong number of generic arguments
    E2005,
    /// Malformed generic type reference
    E2006,
    /// Type has no wire encoding
    E2007,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    ///
    /// When adding a new variant: add it to the enum, `as_str()`, and here.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    /// Get the numeric code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// One-line description used by `--explain`-style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E2001 => "attempt to redefine a built-in type",
            ErrorCode::E2002 => "type redefined as a different kind",
            ErrorCode::E2003 => "unknown type",
            ErrorCode::E2004 => "unknown generic type",
            ErrorCode::E2005 => "wrong number of generic arguments",
            ErrorCode::E2006 => "malformed generic type reference",
            ErrorCode::E2007 => "type cannot be marshalled",
            ErrorCode::E9001 => "internal compiler error",
            ErrorCode::E9002 => "too many errors",
        }
    }

    /// Check if this is a registration or resolution error.
    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is a redefinition conflict.
    pub fn is_redefinition(&self) -> bool {
        matches!(self, ErrorCode::E2001 | ErrorCode::E2002)
    }

    /// Check if this is an internal compiler error.
    pub fn is_internal(&self) -> bool {
        self.as_str().starts_with("E9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
