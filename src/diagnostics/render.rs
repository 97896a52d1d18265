//! Terminal rendering for diagnostics.
//!
//! Line format: `{path}:{line}:{col}: {severity}[{code}]: {message}`,
//! followed by an optional source window with a caret run under the primary
//! range, then help, edit suggestions, and recursively rendered notes. Each
//! diagnostic ends with a blank separator line.

use std::fmt::Write as _;
use std::io::IsTerminal;

use crate::base::{SourceFile, is_valid_range};

use super::context::DiagnosticContext;
use super::diagnostic::{Diagnostic, Severity};

/// When to emit ANSI color codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color iff stderr is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::stderr().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Options controlling diagnostic rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub color: ColorMode,
    /// Suppress the source-context window when false.
    pub hide_source: bool,
}

const RESET: &str = "\x1b[0m";

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error | Severity::Fatal => "\x1b[1;31m",
        Severity::Warning => "\x1b[1;33m",
        Severity::Note => "\x1b[1;36m",
    }
}

impl DiagnosticContext {
    /// Render every diagnostic in emission order into one string.
    pub fn render_all(&self, file: &SourceFile, options: &RenderOptions) -> String {
        let color = options.color.enabled();
        let mut out = String::new();
        for diagnostic in self.diagnostics() {
            render_one(&mut out, diagnostic, file, color, !options.hide_source);
            out.push('\n');
        }
        out
    }

    /// Render to stderr.
    pub fn print_all(&self, file: &SourceFile, options: &RenderOptions) {
        eprint!("{}", self.render_all(file, options));
    }

    /// `N error(s) and M warning(s) generated.`, or empty when clean.
    pub fn render_summary(&self) -> String {
        if self.error_count() == 0 && self.warning_count() == 0 {
            return String::new();
        }
        format!(
            "{} error(s) and {} warning(s) generated.\n",
            self.error_count(),
            self.warning_count()
        )
    }

    pub fn print_summary(&self) {
        eprint!("{}", self.render_summary());
    }
}

fn render_one(
    out: &mut String,
    diagnostic: &Diagnostic,
    file: &SourceFile,
    color: bool,
    show_source: bool,
) {
    let label = format!("{}[{}]", diagnostic.severity.as_str(), diagnostic.code);
    let label = if color {
        format!("{}{label}{RESET}", severity_color(diagnostic.severity))
    } else {
        label
    };

    if is_valid_range(diagnostic.range) {
        let loc = file.line_col(diagnostic.range.start());
        let _ = writeln!(
            out,
            "{}:{}:{}: {label}: {}",
            file.path(),
            loc.line,
            loc.col,
            diagnostic.message
        );
        if show_source {
            render_source_window(out, diagnostic, file);
        }
    } else {
        let _ = writeln!(out, "{}: {label}: {}", file.path(), diagnostic.message);
    }

    if let Some(help) = &diagnostic.help {
        let _ = writeln!(out, "   = help: {help}");
    }
    for fixit in &diagnostic.fixits {
        let _ = writeln!(out, "   = suggestion: replace with '{}'", fixit.replacement);
    }
    for note in &diagnostic.notes {
        render_one(out, note, file, color, show_source);
    }
}

fn render_source_window(out: &mut String, diagnostic: &Diagnostic, file: &SourceFile) {
    let start = file.line_col(diagnostic.range.start());
    let end = file.line_col(diagnostic.range.end());
    let line = file.line_text(start.line);
    let line_len = line.len();

    let start_col = ((start.col - 1) as usize).min(line_len);
    // Multi-line ranges underline to end-of-line on the start line only.
    let end_col = if end.line == start.line {
        ((end.col - 1) as usize).min(line_len)
    } else {
        line_len
    };

    let _ = writeln!(out, "{:>3}| {line}", start.line);

    // Indent mirrors the source up to the caret: tabs are copied verbatim so
    // the carets line up under tabbed code.
    let mut caret_row = String::from("   | ");
    let mut consumed = 0usize;
    for c in line.chars() {
        if consumed >= start_col {
            break;
        }
        caret_row.push(if c == '\t' { '\t' } else { ' ' });
        consumed += c.len_utf8();
    }

    let width = end_col
        .saturating_sub(start_col)
        .min(line_len.saturating_sub(start_col))
        .max(1);
    for _ in 0..width {
        caret_row.push('^');
    }
    let _ = writeln!(out, "{caret_row}");
}
