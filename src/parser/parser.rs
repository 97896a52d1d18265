//! Recursive-descent parser core.
//!
//! Holds the token window (current/previous), the error machinery with
//! panic-mode suppression, and the five-level synchronization used for
//! recovery. The grammar itself lives in [`super::grammar`].

use bumpalo::Bump;
use text_size::{TextRange, TextSize};

use crate::ast::Namespace;
use crate::base::{Interner, Name, SourceFile};
use crate::diagnostics::{DiagCode, Diagnostic, DiagnosticContext};

use super::lexer::{Lexer, unescape};
use super::token::{Token, TokenKind, kind_to_name};

/// Synchronization boundaries, tightest first. A request at some level
/// honors every tighter boundary as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SyncLevel {
    /// Recover at `}`.
    Block,
    /// Recover just past a `;`.
    Statement,
    /// Recover at feature-starting or direction keywords.
    Feature,
    /// Recover at type/classifier-starting keywords.
    Type,
    /// Recover at namespace/package/library keywords.
    Namespace,
}

fn is_feature_sync(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::FeatureKw
            | TokenKind::ConnectorKw
            | TokenKind::BindingKw
            | TokenKind::SuccessionKw
            | TokenKind::InKw
            | TokenKind::OutKw
            | TokenKind::InoutKw
    )
}

fn is_type_sync(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::TypeKw
            | TokenKind::ClassifierKw
            | TokenKind::ClassKw
            | TokenKind::DatatypeKw
            | TokenKind::StructKw
            | TokenKind::AssocKw
            | TokenKind::BehaviorKw
            | TokenKind::FunctionKw
            | TokenKind::PredicateKw
            | TokenKind::PartKw
            | TokenKind::ActionKw
            | TokenKind::StateKw
            | TokenKind::RequirementKw
            | TokenKind::ConstraintKw
            | TokenKind::PortKw
            | TokenKind::AttributeKw
            | TokenKind::ItemKw
    )
}

fn is_namespace_sync(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::NamespaceKw
            | TokenKind::PackageKw
            | TokenKind::LibraryKw
            | TokenKind::ImportKw
            | TokenKind::AliasKw
            | TokenKind::CommentKw
            | TokenKind::DocKw
            | TokenKind::PublicKw
            | TokenKind::PrivateKw
            | TokenKind::ProtectedKw
    )
}

/// Recursive-descent parser over one source file.
///
/// All AST output goes into the session arena; names are interned. The
/// parser emits into the diagnostic context and keeps going on errors,
/// producing a best-effort tree.
pub struct Parser<'s, 'a, 'c> {
    pub(crate) file: &'s SourceFile,
    lexer: Lexer<'s>,
    pub(crate) arena: &'a Bump,
    pub(crate) interner: &'c mut Interner<'a>,
    pub(crate) diag: &'c mut DiagnosticContext,
    pub(crate) current: Token<'s>,
    pub(crate) previous: Token<'s>,
    pub(crate) panic_mode: bool,
}

impl<'s, 'a, 'c> Parser<'s, 'a, 'c> {
    pub fn new(
        file: &'s SourceFile,
        arena: &'a Bump,
        interner: &'c mut Interner<'a>,
        diag: &'c mut DiagnosticContext,
    ) -> Self {
        let mut lexer = Lexer::new(file);
        let current = lexer.next(diag);
        let start = Token {
            kind: TokenKind::Eof,
            text: "",
            range: TextRange::empty(TextSize::new(0)),
        };
        Self {
            file,
            lexer,
            arena,
            interner,
            diag,
            current,
            previous: start,
            panic_mode: false,
        }
    }

    /// Parse the whole file into a root namespace whose members are the
    /// top-level members of the source.
    pub fn parse(&mut self) -> &'a Namespace<'a> {
        let mut members = Vec::new();
        while self.current.kind != TokenKind::Eof && !self.diag.should_stop() {
            if let Some(member) = self.parse_member() {
                members.push(member);
            }
            if self.panic_mode {
                self.synchronize(SyncLevel::Namespace);
            }
        }
        let range = TextRange::new(TextSize::new(0), self.file.len());
        let members = self.alloc_slice(members);
        self.alloc(Namespace {
            name: None,
            members,
            range,
        })
    }

    // =========================================================================
    // Token window
    // =========================================================================

    pub(crate) fn advance(&mut self) {
        self.previous = self.current;
        self.current = self.lexer.next(self.diag);
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.lexer.peek(self.diag).kind
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the expected token or report it missing with the code keyed
    /// to the expectation, entering panic mode.
    pub(crate) fn consume(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let message = format!(
            "expected {}, found {}",
            kind_to_name(kind),
            kind_to_name(self.current.kind)
        );
        if kind == TokenKind::Semicolon {
            let insert_at = TextRange::empty(self.previous.range.end());
            self.error_with(code_for_expected(kind), self.current.range, message, |d| {
                d.with_help("declarations and members are terminated with ';'")
                    .with_fixit(insert_at, ";")
            });
        } else {
            self.error(code_for_expected(kind), self.current.range, message);
        }
        false
    }

    // =========================================================================
    // Errors and recovery
    // =========================================================================

    /// Emit a parse diagnostic unless panic mode is suppressing cascades.
    /// Either way the parser is in panic mode afterwards.
    pub(crate) fn error(&mut self, code: DiagCode, range: TextRange, message: impl Into<String>) {
        self.error_with(code, range, message, |d| d);
    }

    pub(crate) fn error_with(
        &mut self,
        code: DiagCode,
        range: TextRange,
        message: impl Into<String>,
        build: impl FnOnce(Diagnostic) -> Diagnostic,
    ) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.diag.emit(build(Diagnostic::error(code, range, message)));
    }

    /// Clear panic mode and skip ahead to a structural boundary at the
    /// requested level or tighter.
    ///
    /// Block-level requests own the closing `}`; looser levels stop before
    /// it so the enclosing body loop can close normally.
    pub(crate) fn synchronize(&mut self, level: SyncLevel) {
        tracing::trace!(?level, at = ?self.current.kind, "synchronize");
        self.panic_mode = false;
        loop {
            match self.current.kind {
                TokenKind::Eof => return,
                TokenKind::RBrace => {
                    if level == SyncLevel::Block {
                        self.advance();
                    }
                    return;
                }
                TokenKind::Semicolon if level >= SyncLevel::Statement => {
                    self.advance();
                    return;
                }
                kind if level >= SyncLevel::Feature && is_feature_sync(kind) => return,
                kind if level >= SyncLevel::Type && is_type_sync(kind) => return,
                kind if level >= SyncLevel::Namespace && is_namespace_sync(kind) => return,
                _ => self.advance(),
            }
        }
    }

    // =========================================================================
    // Arena and interning helpers
    // =========================================================================

    pub(crate) fn alloc<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    pub(crate) fn alloc_slice<T>(&self, values: Vec<T>) -> &'a [T] {
        self.arena.alloc_slice_fill_iter(values)
    }

    pub(crate) fn alloc_str(&self, text: &str) -> &'a str {
        self.arena.alloc_str(text)
    }

    /// Intern the declared-name content of a token. Unrestricted names lose
    /// their surrounding quotes and have their escapes decoded.
    pub(crate) fn intern_name(&mut self, token: Token<'s>) -> Name<'a> {
        if token.kind == TokenKind::UnrestrictedName {
            let content = strip_quotes(token.text, '\'');
            self.interner.intern(&unescape(content))
        } else {
            self.interner.intern(token.text)
        }
    }

    /// Intern the content of a string literal token.
    pub(crate) fn intern_string_literal(&mut self, token: Token<'s>) -> Name<'a> {
        let content = strip_quotes(token.text, '"');
        self.interner.intern(&unescape(content))
    }
}

/// Strip one `quote` from each end, tolerating an unterminated literal.
fn strip_quotes(text: &str, quote: char) -> &str {
    let text = text.strip_prefix(quote).unwrap_or(text);
    text.strip_suffix(quote).unwrap_or(text)
}

/// Map an expected token to the diagnostic code keyed to it.
fn code_for_expected(kind: TokenKind) -> DiagCode {
    match kind {
        TokenKind::Semicolon => DiagCode::E2001,
        TokenKind::Ident => DiagCode::E2002,
        TokenKind::LBrace => DiagCode::E2003,
        TokenKind::RBrace => DiagCode::E2004,
        TokenKind::Colon => DiagCode::E2005,
        TokenKind::LParen => DiagCode::E2009,
        TokenKind::RParen => DiagCode::E2010,
        TokenKind::LBracket => DiagCode::E2011,
        TokenKind::RBracket => DiagCode::E2012,
        _ => DiagCode::E2006,
    }
}
