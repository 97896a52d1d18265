//! Lexer for the KerML/SysML v2 textual notation.
//!
//! A logos scanner recognizes the raw token classes; [`Lexer`] wraps it to
//! produce [`Token`]s with byte ranges, reclassify identifiers through the
//! keyword table, and report lexical problems into the diagnostic context.
//! Whitespace and comments (line, and NESTED block comments) never surface
//! as tokens.

use logos::{FilterResult, Logos};
use text_size::{TextRange, TextSize};

use crate::base::SourceFile;
use crate::diagnostics::{DiagCode, Diagnostic, DiagnosticContext, Severity};

use super::token::{Token, TokenKind, keyword_from_str};

/// Failure modes of the scanner. `InvalidChar` is the default for bytes no
/// rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, thiserror::Error)]
pub enum LexError {
    #[default]
    #[error("invalid character")]
    InvalidChar,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated name")]
    UnterminatedName,
}

/// Scan past a `/*` comment, honoring nesting. On success the whole comment
/// is consumed and skipped; otherwise the token surfaces as an error.
fn lex_block_comment(lex: &mut logos::Lexer<RawToken>) -> FilterResult<(), LexError> {
    let bytes = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
            i += 2;
            depth -= 1;
            if depth == 0 {
                lex.bump(i);
                return FilterResult::Skip;
            }
        } else if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i += 2;
            depth += 1;
        } else {
            i += 1;
        }
    }
    lex.bump(bytes.len());
    FilterResult::Error(LexError::UnterminatedComment)
}

/// Scan a quoted literal to its closing `quote` on the same line.
/// Backslash escapes the following character. The opening quote has already
/// been consumed by the rule.
fn lex_quoted(
    lex: &mut logos::Lexer<RawToken>,
    quote: u8,
    error: LexError,
) -> Result<(), LexError> {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b if b == quote => {
                lex.bump(i + 1);
                return Ok(());
            }
            b'\n' => break,
            b'\\' if i + 1 < bytes.len() && bytes[i + 1] != b'\n' => i += 2,
            _ => i += 1,
        }
    }
    // Consume up to the newline/end so scanning resumes cleanly after it.
    lex.bump(i);
    Err(error)
}

fn lex_string(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexError> {
    lex_quoted(lex, b'"', LexError::UnterminatedString)
}

fn lex_unrestricted_name(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexError> {
    lex_quoted(lex, b'\'', LexError::UnterminatedName)
}

/// Raw token classes recognized by the generated scanner.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    #[token("/*", lex_block_comment)]
    BlockComment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("'", lex_unrestricted_name)]
    QuotedName,

    #[token("\"", lex_string)]
    StringLit,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexInt,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Real,
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    RealExp,
    /// Exponent marker with no digits after it.
    #[regex(r"[0-9]+(\.[0-9]+)?[eE][+-]?")]
    BadExponent,
    /// Hex prefix with no digits after it.
    #[regex(r"0[xX]")]
    BadHex,

    // Three-character operators before two-character before one-character;
    // logos applies longest match regardless, the grouping is for readers.
    #[token("::>")]
    ColonColonGt,
    #[token(":>>")]
    ColonGtGt,
    #[token("...")]
    DotDotDot,
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    BangEqEq,

    #[token("::")]
    ColonColon,
    #[token(":>")]
    ColonGt,
    #[token("..")]
    DotDot,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("**")]
    StarStar,
    #[token("->")]
    Arrow,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
}

/// The escape characters accepted inside quoted literals.
fn is_valid_escape(c: char) -> bool {
    matches!(c, 'n' | 't' | 'r' | 'b' | 'f' | '0' | '\\' | '\'' | '"')
}

/// Decode the escapes of a quoted literal's content (quotes already
/// stripped). Unknown escapes keep the escaped character verbatim; the
/// lexer has already reported them.
pub(crate) fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => break,
        }
    }
    out
}

/// Streaming lexer over one source file.
///
/// `peek` buffers at most one token; there is no rescanning.
pub struct Lexer<'s> {
    raw: logos::Lexer<'s, RawToken>,
    end: TextSize,
    lookahead: Option<Token<'s>>,
}

impl<'s> Lexer<'s> {
    pub fn new(file: &'s SourceFile) -> Self {
        Self {
            raw: RawToken::lexer(file.text()),
            end: file.len(),
            lookahead: None,
        }
    }

    /// Produce the next token, emitting lexical diagnostics as needed.
    /// After the end of input this returns an Eof token with an empty range
    /// at the final position, indefinitely.
    pub fn next(&mut self, diag: &mut DiagnosticContext) -> Token<'s> {
        if let Some(token) = self.lookahead.take() {
            return token;
        }
        self.scan(diag)
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self, diag: &mut DiagnosticContext) -> Token<'s> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.scan(diag));
        }
        self.lookahead.expect("lookahead was just filled")
    }

    pub fn is_eof(&mut self, diag: &mut DiagnosticContext) -> bool {
        self.peek(diag).kind == TokenKind::Eof
    }

    fn scan(&mut self, diag: &mut DiagnosticContext) -> Token<'s> {
        let Some(result) = self.raw.next() else {
            return Token {
                kind: TokenKind::Eof,
                text: "",
                range: TextRange::empty(self.end),
            };
        };
        let span = self.raw.span();
        let range = TextRange::new(
            TextSize::new(span.start as u32),
            TextSize::new(span.end as u32),
        );
        let text = self.raw.slice();

        let kind = match result {
            Ok(RawToken::Ident) => keyword_from_str(text).unwrap_or(TokenKind::Ident),
            Ok(RawToken::StringLit) => {
                self.check_escapes(text, range, diag);
                TokenKind::String
            }
            Ok(RawToken::QuotedName) => {
                self.check_escapes(text, range, diag);
                TokenKind::UnrestrictedName
            }
            Ok(RawToken::BadExponent) => {
                diag.emit(Diagnostic::error(
                    DiagCode::E1005,
                    range,
                    format!("invalid numeric literal '{text}': exponent has no digits"),
                ));
                TokenKind::Error
            }
            Ok(RawToken::BadHex) => {
                diag.emit(Diagnostic::error(
                    DiagCode::E1005,
                    range,
                    format!("invalid numeric literal '{text}': missing hexadecimal digits"),
                ));
                TokenKind::Error
            }
            Ok(raw) => raw_to_kind(raw),
            Err(error) => {
                let primary = match error {
                    // Point at the opening delimiter, not the runaway tail.
                    LexError::UnterminatedComment => TextRange::at(range.start(), TextSize::new(2)),
                    _ => range,
                };
                let message = match error {
                    LexError::InvalidChar => {
                        format!("invalid character '{}'", text.escape_debug())
                    }
                    other => other.to_string(),
                };
                diag.emit(Diagnostic::new(
                    DiagCode::from(error),
                    Severity::Error,
                    primary,
                    message,
                ));
                TokenKind::Error
            }
        };

        Token { kind, text, range }
    }

    /// Report invalid escape sequences inside a quoted token. The token
    /// itself still surfaces; decoding keeps the character verbatim.
    fn check_escapes(&self, text: &str, range: TextRange, diag: &mut DiagnosticContext) {
        let mut iter = text.char_indices().peekable();
        while let Some((offset, c)) = iter.next() {
            if c != '\\' {
                continue;
            }
            let Some(&(next_offset, next)) = iter.peek() else {
                break;
            };
            if !is_valid_escape(next) {
                let escape_range = TextRange::new(
                    range.start() + TextSize::new(offset as u32),
                    range.start() + TextSize::new((next_offset + next.len_utf8()) as u32),
                );
                diag.emit(Diagnostic::error(
                    DiagCode::E1006,
                    escape_range,
                    format!("invalid escape sequence '\\{next}'"),
                ));
            }
            iter.next();
        }
    }
}

impl From<LexError> for DiagCode {
    fn from(error: LexError) -> Self {
        match error {
            LexError::InvalidChar => DiagCode::E1001,
            LexError::UnterminatedString => DiagCode::E1002,
            LexError::UnterminatedComment => DiagCode::E1003,
            LexError::UnterminatedName => DiagCode::E1004,
        }
    }
}

fn raw_to_kind(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::HexInt | RawToken::Int => TokenKind::Integer,
        RawToken::Real | RawToken::RealExp => TokenKind::Real,
        RawToken::ColonColonGt => TokenKind::ColonColonGt,
        RawToken::ColonGtGt => TokenKind::ColonGtGt,
        RawToken::DotDotDot => TokenKind::DotDotDot,
        RawToken::EqEqEq => TokenKind::EqEqEq,
        RawToken::BangEqEq => TokenKind::BangEqEq,
        RawToken::ColonColon => TokenKind::ColonColon,
        RawToken::ColonGt => TokenKind::ColonGt,
        RawToken::DotDot => TokenKind::DotDot,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::BangEq => TokenKind::BangEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::StarStar => TokenKind::StarStar,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        // Handled before dispatch
        RawToken::Ident
        | RawToken::StringLit
        | RawToken::QuotedName
        | RawToken::BadExponent
        | RawToken::BadHex
        | RawToken::BlockComment => TokenKind::Error,
    }
}
