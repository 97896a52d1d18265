//! Diagnostic values: severity, edit suggestions, attached notes.

use text_size::TextRange;

use super::codes::DiagCode;

/// Severity of a diagnostic, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
    Error,
    /// Aborts the session at the next member boundary.
    Fatal,
}

impl Severity {
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

/// A machine-applicable edit suggestion: replace `range` with `replacement`.
///
/// An empty `range` inserts at that position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixit {
    pub range: TextRange,
    pub replacement: String,
}

/// A single diagnostic message with its source location and attachments.
///
/// Construction does not emit; hand the finished value to
/// [`DiagnosticContext::emit`](super::DiagnosticContext::emit).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: DiagCode,
    pub severity: Severity,
    /// Primary range; the invalid sentinel for diagnostics with no location.
    pub range: TextRange,
    pub message: String,
    pub help: Option<String>,
    pub fixits: Vec<Fixit>,
    /// Attached notes, rendered recursively after the parent.
    pub notes: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(
        code: DiagCode,
        severity: Severity,
        range: TextRange,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity,
            range,
            message: message.into(),
            help: None,
            fixits: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Shorthand for an error diagnostic.
    pub fn error(code: DiagCode, range: TextRange, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, range, message)
    }

    /// Shorthand for a warning diagnostic.
    pub fn warning(code: DiagCode, range: TextRange, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, range, message)
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_fixit(mut self, range: TextRange, replacement: impl Into<String>) -> Self {
        self.fixits.push(Fixit {
            range,
            replacement: replacement.into(),
        });
        self
    }

    /// Attach a note pointing at a related location. Notes are diagnostics
    /// of severity [`Severity::Note`] carrying the parent's code.
    pub fn with_note(mut self, range: TextRange, message: impl Into<String>) -> Self {
        self.notes
            .push(Diagnostic::new(self.code, Severity::Note, range, message));
        self
    }

    pub fn has_help(&self) -> bool {
        self.help.is_some()
    }

    pub fn has_fixits(&self) -> bool {
        !self.fixits.is_empty()
    }
}
