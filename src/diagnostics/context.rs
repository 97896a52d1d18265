//! Diagnostic accumulator with counting and cutoff policy.

use super::codes::DiagCode;
use super::diagnostic::{Diagnostic, Severity};

/// Default error budget before a session stops reporting.
pub const DEFAULT_MAX_ERRORS: usize = 20;

/// Collects diagnostics for one compilation session in emission order.
///
/// Emission updates counters per severity and per code family; the parser
/// polls [`should_stop`](Self::should_stop) at member boundaries.
pub struct DiagnosticContext {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
    note_count: usize,
    parse_error_count: usize,
    semantic_error_count: usize,
    has_fatal: bool,
    /// 0 means unlimited.
    max_errors: usize,
    warnings_as_errors: bool,
}

impl DiagnosticContext {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
            note_count: 0,
            parse_error_count: 0,
            semantic_error_count: 0,
            has_fatal: false,
            max_errors: DEFAULT_MAX_ERRORS,
            warnings_as_errors: false,
        }
    }

    /// Set the error budget; 0 disables the limit.
    pub fn set_max_errors(&mut self, max_errors: usize) {
        self.max_errors = max_errors;
    }

    /// Promote warnings to errors at emission time.
    pub fn set_warnings_as_errors(&mut self, enabled: bool) {
        self.warnings_as_errors = enabled;
    }

    /// Append a diagnostic and update the counters.
    ///
    /// Warnings mutate to [`Severity::Error`] in place when promotion is
    /// enabled, and are counted as errors.
    pub fn emit(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.severity == Severity::Warning && self.warnings_as_errors {
            diagnostic.severity = Severity::Error;
        }
        match diagnostic.severity {
            Severity::Note => self.note_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Error | Severity::Fatal => {
                self.error_count += 1;
                if diagnostic.code.is_parse_family() {
                    self.parse_error_count += 1;
                } else if diagnostic.code.is_semantic_family() {
                    self.semantic_error_count += 1;
                }
                if diagnostic.severity == Severity::Fatal {
                    self.has_fatal = true;
                }
            }
        }
        self.diagnostics.push(diagnostic);
    }

    /// Convenience for the common emit shape.
    pub fn emit_error(
        &mut self,
        code: DiagCode,
        range: text_size::TextRange,
        message: impl Into<String>,
    ) {
        self.emit(Diagnostic::error(code, range, message));
    }

    /// True once the session should abandon further analysis: a fatal
    /// diagnostic was emitted, or the error budget is exhausted.
    pub fn should_stop(&self) -> bool {
        self.has_fatal || (self.max_errors > 0 && self.error_count >= self.max_errors)
    }

    /// Drop all diagnostics and reset counters.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.error_count = 0;
        self.warning_count = 0;
        self.note_count = 0;
        self.parse_error_count = 0;
        self.semantic_error_count = 0;
        self.has_fatal = false;
    }

    /// Diagnostics in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn note_count(&self) -> usize {
        self.note_count
    }

    pub fn parse_error_count(&self) -> usize {
        self.parse_error_count
    }

    pub fn semantic_error_count(&self) -> usize {
        self.semantic_error_count
    }

    pub fn has_fatal(&self) -> bool {
        self.has_fatal
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

impl Default for DiagnosticContext {
    fn default() -> Self {
        Self::new()
    }
}
