//! Stable diagnostic code definitions.
//!
//! Codes are user-visible as `E####` / `W####` and partition by pipeline
//! stage:
//! - 1001..=1006: lexical errors
//! - 2001..=2012: syntactic errors
//! - 3001..=3010: semantic errors
//! - 10001..=10003: warnings

use std::fmt;

/// Diagnostic codes emitted by the front-end.
///
/// Each code identifies one category of problem; sub-conditions live in the
/// message and attached notes, never in additional codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagCode {
    // =========================================================================
    // Lexical errors
    // =========================================================================
    /// Invalid or unexpected character in source
    E1001,
    /// Unterminated string literal
    E1002,
    /// Unterminated block comment
    E1003,
    /// Unterminated unrestricted name
    E1004,
    /// Invalid numeric literal
    E1005,
    /// Invalid escape sequence
    E1006,

    // =========================================================================
    // Syntactic errors
    // =========================================================================
    /// Expected `;`
    E2001,
    /// Expected identifier
    E2002,
    /// Expected `{`
    E2003,
    /// Expected `}`
    E2004,
    /// Expected `:`
    E2005,
    /// Unexpected token
    E2006,
    /// Expected expression
    E2007,
    /// Expected type
    E2008,
    /// Expected `(`
    E2009,
    /// Expected `)`
    E2010,
    /// Expected `[`
    E2011,
    /// Expected `]`
    E2012,

    // =========================================================================
    // Semantic errors
    // =========================================================================
    /// Undefined type
    E3001,
    /// Undefined feature
    E3002,
    /// Undefined namespace
    E3003,
    /// Duplicate name in scope
    E3004,
    /// Circular specialization
    E3005,
    /// Type mismatch
    E3006,
    /// Multiplicity error
    E3007,
    /// Redefinition error
    E3008,
    /// Circular import
    E3009,
    /// Import not found
    E3010,

    // =========================================================================
    // Warnings
    // =========================================================================
    /// Unused import
    W10001,
    /// Shadowed name
    W10002,
    /// Deprecated element
    W10003,
}

impl DiagCode {
    /// The stable numeric identifier.
    pub fn number(self) -> u32 {
        match self {
            Self::E1001 => 1001,
            Self::E1002 => 1002,
            Self::E1003 => 1003,
            Self::E1004 => 1004,
            Self::E1005 => 1005,
            Self::E1006 => 1006,
            Self::E2001 => 2001,
            Self::E2002 => 2002,
            Self::E2003 => 2003,
            Self::E2004 => 2004,
            Self::E2005 => 2005,
            Self::E2006 => 2006,
            Self::E2007 => 2007,
            Self::E2008 => 2008,
            Self::E2009 => 2009,
            Self::E2010 => 2010,
            Self::E2011 => 2011,
            Self::E2012 => 2012,
            Self::E3001 => 3001,
            Self::E3002 => 3002,
            Self::E3003 => 3003,
            Self::E3004 => 3004,
            Self::E3005 => 3005,
            Self::E3006 => 3006,
            Self::E3007 => 3007,
            Self::E3008 => 3008,
            Self::E3009 => 3009,
            Self::E3010 => 3010,
            Self::W10001 => 10001,
            Self::W10002 => 10002,
            Self::W10003 => 10003,
        }
    }

    /// The user-visible form, e.g. `"E2001"` or `"W10002"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E1001 => "E1001",
            Self::E1002 => "E1002",
            Self::E1003 => "E1003",
            Self::E1004 => "E1004",
            Self::E1005 => "E1005",
            Self::E1006 => "E1006",
            Self::E2001 => "E2001",
            Self::E2002 => "E2002",
            Self::E2003 => "E2003",
            Self::E2004 => "E2004",
            Self::E2005 => "E2005",
            Self::E2006 => "E2006",
            Self::E2007 => "E2007",
            Self::E2008 => "E2008",
            Self::E2009 => "E2009",
            Self::E2010 => "E2010",
            Self::E2011 => "E2011",
            Self::E2012 => "E2012",
            Self::E3001 => "E3001",
            Self::E3002 => "E3002",
            Self::E3003 => "E3003",
            Self::E3004 => "E3004",
            Self::E3005 => "E3005",
            Self::E3006 => "E3006",
            Self::E3007 => "E3007",
            Self::E3008 => "E3008",
            Self::E3009 => "E3009",
            Self::E3010 => "E3010",
            Self::W10001 => "W10001",
            Self::W10002 => "W10002",
            Self::W10003 => "W10003",
        }
    }

    /// Default message for codes whose text does not depend on context.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::E1001 => "invalid character",
            Self::E1002 => "unterminated string literal",
            Self::E1003 => "unterminated block comment",
            Self::E1004 => "unterminated name",
            Self::E1005 => "invalid numeric literal",
            Self::E1006 => "invalid escape sequence",
            Self::E2001 => "expected ';'",
            Self::E2002 => "expected identifier",
            Self::E2003 => "expected '{'",
            Self::E2004 => "expected '}'",
            Self::E2005 => "expected ':'",
            Self::E2006 => "unexpected token",
            Self::E2007 => "expected expression",
            Self::E2008 => "expected type",
            Self::E2009 => "expected '('",
            Self::E2010 => "expected ')'",
            Self::E2011 => "expected '['",
            Self::E2012 => "expected ']'",
            Self::E3001 => "undefined type",
            Self::E3002 => "undefined feature",
            Self::E3003 => "undefined namespace",
            Self::E3004 => "duplicate name",
            Self::E3005 => "circular specialization",
            Self::E3006 => "type mismatch",
            Self::E3007 => "multiplicity error",
            Self::E3008 => "redefinition error",
            Self::E3009 => "circular import",
            Self::E3010 => "import not found",
            Self::W10001 => "unused import",
            Self::W10002 => "shadowed name",
            Self::W10003 => "deprecated element",
        }
    }

    /// Codes 1000..=2999 belong to the parse family for counting purposes.
    pub fn is_parse_family(self) -> bool {
        (1000..=2999).contains(&self.number())
    }

    /// Codes 3000..=9999 belong to the semantic family for counting purposes.
    pub fn is_semantic_family(self) -> bool {
        (3000..=9999).contains(&self.number())
    }

    pub fn is_warning_code(self) -> bool {
        self.number() >= 10000
    }
}

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
