//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of repeated errors at the same site
//! - Stable ordering by declaration site on flush
//! - `ErrorGuaranteed` proof that errors were emitted

use std::hash::{Hash, Hasher};

use bidl_ir::DeclSite;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Hash a whole message for dedup comparison.
///
/// Sites are line-granular, so distinct errors on one line (two unknown
/// types in one signature) often share a long prefix. Only an identical
/// message counts as a repeat.
#[inline]
fn message_hash(msg: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg.hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before further errors are dropped (0 = unlimited).
    pub error_limit: usize,
    /// Drop an error repeating the previous error's site and exact message.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add(diagnostic);
/// // ... add more diagnostics
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    /// Errors dropped because the limit was reached.
    dropped: usize,
    /// Last (site, `message_hash`) for dedup.
    last_error: Option<(Option<DeclSite>, u64)>,
    config: DiagnosticConfig,
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            dropped: 0,
            last_error: None,
            config,
        }
    }

    /// Add a diagnostic to the queue.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();

        if is_error && self.limit_reached() {
            self.dropped += 1;
            return false;
        }

        if self.config.deduplicate && self.is_duplicate(&diag) {
            return false;
        }

        if is_error {
            self.last_error = Some((
                diag.primary_site().cloned(),
                message_hash(&diag.message),
            ));
            self.error_count += 1;
        }

        self.diagnostics.push(diag);
        true
    }

    /// Emit an error diagnostic and get proof it was emitted.
    ///
    /// A filtered duplicate still counts: the same error was already reported.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with a non-error");
        self.add(diag);
        ErrorGuaranteed::new()
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Get the number of errors dropped after the limit was reached.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Sort diagnostics by site and return them.
    ///
    /// Diagnostics without a site (built-ins, internal errors) come last.
    /// The sort is stable, so reports at one site keep their emission order.
    /// Clears the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut result = std::mem::take(&mut self.diagnostics);
        result.sort_by(|a, b| {
            let key_a = (a.primary_site().is_none(), a.primary_site());
            let key_b = (b.primary_site().is_none(), b.primary_site());
            key_a.cmp(&key_b)
        });

        self.error_count = 0;
        self.dropped = 0;
        self.last_error = None;

        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    fn is_duplicate(&self, diag: &Diagnostic) -> bool {
        if !diag.is_error() {
            return false;
        }
        match &self.last_error {
            Some((site, hash)) => {
                site.as_ref() == diag.primary_site() && *hash == message_hash(&diag.message)
            }
            None => false,
        }
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting after {limit} errors"))
        .with_note("use --error-limit to increase the limit")
}
