//! Diagnostic emitters.
//!
//! Only a plain terminal format is provided: one `file:line: severity[CODE]:
//! message` line per diagnostic, followed by secondary labels and notes.

use std::io::{self, Write};

use crate::Diagnostic;

/// Trait for emitting diagnostics in various formats.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Flush any buffered output.
    fn flush(&mut self);

    /// Emit a summary of errors/warnings.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}

/// Plain-text emitter for terminals and logs.
pub struct TerminalEmitter<W: Write> {
    writer: W,
}

impl TerminalEmitter<io::Stderr> {
    pub fn stderr() -> Self {
        TerminalEmitter {
            writer: io::stderr(),
        }
    }
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W) -> Self {
        TerminalEmitter { writer }
    }

    /// Consume the emitter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let location = diagnostic
            .primary_site()
            .map_or_else(|| "bidl".to_string(), ToString::to_string);
        // Write errors on a diagnostics stream have nowhere better to go.
        let _ = writeln!(
            self.writer,
            "{location}: {}[{}]: {}",
            diagnostic.severity, diagnostic.code, diagnostic.message
        );

        for label in diagnostic.labels.iter().filter(|l| !l.is_primary) {
            let _ = match &label.site {
                Some(site) => writeln!(self.writer, "{site}: note: {}", label.message),
                None => writeln!(self.writer, "<built-in>: note: {}", label.message),
            };
        }

        for note in &diagnostic.notes {
            let _ = writeln!(self.writer, "  = note: {note}");
        }
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        let _ = match (error_count, warning_count) {
            (0, 0) => Ok(()),
            (e, 0) => writeln!(self.writer, "{e} error{}", plural(e)),
            (0, w) => writeln!(self.writer, "{w} warning{}", plural(w)),
            (e, w) => writeln!(
                self.writer,
                "{e} error{}, {w} warning{}",
                plural(e),
                plural(w)
            ),
        };
    }
}
