//! Core diagnostic types for structured error reporting.
//!
//! Defines [`Diagnostic`], [`Label`] and [`Severity`], the building blocks
//! every phase uses to report errors. Locations are declaration sites
//! (file and line) rather than byte spans: the type registry only ever
//! knows where a type was declared.

use std::fmt;

use bidl_ir::DeclSite;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A located message attached to a diagnostic.
///
/// A label without a site refers to something with no source location,
/// such as a built-in type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub site: Option<DeclSite>,
    pub message: String,
    /// Whether this is the primary error location.
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(site: Option<DeclSite>, message: impl Into<String>) -> Self {
        Label {
            site,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(site: Option<DeclSite>, message: impl Into<String>) -> Self {
        Label {
            site,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic with everything an emitter needs.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    pub severity: Severity,
    /// Main error message.
    pub message: String,
    pub labels: Vec<Label>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, site: Option<DeclSite>, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(site, message));
        self
    }

    /// Add a secondary label, e.g. where a conflicting type was first declared.
    pub fn with_secondary_label(
        mut self,
        site: Option<DeclSite>,
        message: impl Into<String>,
    ) -> Self {
        self.labels.push(Label::secondary(site, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Get the primary site (first primary label's site).
    pub fn primary_site(&self) -> Option<&DeclSite> {
        self.labels
            .iter()
            .find(|l| l.is_primary)
            .and_then(|l| l.site.as_ref())
    }

    /// Check if this is an error (vs warning/note).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            match &label.site {
                Some(site) => write!(f, "\n  {marker} {site}: {}", label.message)?,
                None => write!(f, "\n  {marker} <built-in>: {}", label.message)?,
            }
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        Ok(())
    }
}

/// Create an "internal compiler error" diagnostic.
#[cold]
pub fn internal_error(message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9001)
        .with_message(message)
        .with_note("this is a bug in the compiler, not in the input")
}
