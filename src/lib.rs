//! # kermlc
//!
//! Front-end compiler for KerML and SysML v2 textual notation: lexer,
//! parser, diagnostics, and semantic analysis.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic    → symbol table, name resolution, two-pass validation
//!   ↓
//! parser      → logos lexer, recursive-descent parser, expression grammar
//!   ↓
//! ast         → arena-allocated typed AST
//!   ↓
//! diagnostics → codes, context, cutoff policy, terminal rendering
//!   ↓
//! base        → SourceFile, ranges, arena interning
//! ```
//!
//! ## Sessions
//!
//! A compilation session owns one [`bumpalo::Bump`] arena, one
//! [`Interner`], and one [`DiagnosticContext`]. Everything the pipeline
//! produces (AST nodes, interned names, symbols) lives in the arena and is
//! released when the arena is reset or dropped; the [`SourceFile`] content
//! is owned by the caller.
//!
//! ```
//! use bumpalo::Bump;
//! use kermlc::{DiagnosticContext, Interner, SourceFile};
//!
//! let file = SourceFile::new("demo.kerml", "package P { part def Wheel; }");
//! let arena = Bump::new();
//! let mut interner = Interner::new(&arena);
//! let mut diag = DiagnosticContext::new();
//!
//! let (root, _symbols) = kermlc::check(&file, &arena, &mut interner, &mut diag);
//! assert_eq!(root.members.len(), 1);
//! assert!(!diag.has_errors());
//! ```

/// Foundation types: SourceFile, ranges, interning
pub mod base;

/// Diagnostics: codes, severities, accumulation, rendering
pub mod diagnostics;

/// Typed AST allocated in the session arena
pub mod ast;

/// Lexer and recursive-descent parser
pub mod parser;

/// Symbol table and the two-pass semantic walk
pub mod semantic;

use bumpalo::Bump;

// Re-export the session-facing types
pub use ast::Namespace;
pub use base::{Interner, LineCol, Name, SourceFile, TextRange, TextSize};
pub use diagnostics::{
    ColorMode, DiagCode, Diagnostic, DiagnosticContext, Fixit, RenderOptions, Severity,
};
pub use parser::{Lexer, Parser, Token, TokenKind};
pub use semantic::{Symbol, SymbolKind, SymbolTable};

/// Parse one source file into its root namespace.
pub fn parse<'a>(
    file: &SourceFile,
    arena: &'a Bump,
    interner: &mut Interner<'a>,
    diag: &mut DiagnosticContext,
) -> &'a Namespace<'a> {
    let mut parser = Parser::new(file, arena, interner, diag);
    parser.parse()
}

/// Validate a parsed model, producing the populated symbol table.
pub fn analyze<'a>(
    root: &'a Namespace<'a>,
    interner: &mut Interner<'a>,
    diag: &mut DiagnosticContext,
) -> SymbolTable<'a> {
    semantic::analyze(root, interner, diag)
}

/// Parse and validate in one step. A session succeeds when the context
/// holds no errors afterwards.
pub fn check<'a>(
    file: &SourceFile,
    arena: &'a Bump,
    interner: &mut Interner<'a>,
    diag: &mut DiagnosticContext,
) -> (&'a Namespace<'a>, SymbolTable<'a>) {
    let root = parse(file, arena, interner, diag);
    let symbols = analyze(root, interner, diag);
    (root, symbols)
}
