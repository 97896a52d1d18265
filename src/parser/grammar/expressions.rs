//! Precedence-climbing expression parser.
//!
//! Ladder, ascending: or/xor/`|` < and/`&` < implies < equality <
//! comparison < additive < multiplicative < power < unary < call. Power is
//! the one right-associative level; `.`/`(`/`[` postfix forms always bind.

use text_size::TextRange;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::diagnostics::DiagCode;

use super::super::parser::Parser;
use super::super::token::{Token, TokenKind, kind_to_name};

const PREC_OR: u8 = 1;
const PREC_AND: u8 = 2;
const PREC_IMPLIES: u8 = 3;
const PREC_EQUALITY: u8 = 4;
const PREC_COMPARISON: u8 = 5;
const PREC_TERM: u8 = 6;
const PREC_FACTOR: u8 = 7;
const PREC_POWER: u8 = 8;
const PREC_UNARY: u8 = 9;

/// Binding power of an infix operator: (precedence, right-associative, op).
fn infix(kind: TokenKind) -> Option<(u8, bool, BinaryOp)> {
    Some(match kind {
        TokenKind::OrKw | TokenKind::Pipe => (PREC_OR, false, BinaryOp::Or),
        TokenKind::XorKw => (PREC_OR, false, BinaryOp::Xor),
        TokenKind::AndKw | TokenKind::Amp => (PREC_AND, false, BinaryOp::And),
        TokenKind::ImpliesKw => (PREC_IMPLIES, false, BinaryOp::Implies),
        TokenKind::EqEq => (PREC_EQUALITY, false, BinaryOp::Eq),
        TokenKind::BangEq => (PREC_EQUALITY, false, BinaryOp::Ne),
        TokenKind::EqEqEq => (PREC_EQUALITY, false, BinaryOp::MetaEq),
        TokenKind::BangEqEq => (PREC_EQUALITY, false, BinaryOp::MetaNe),
        TokenKind::Lt => (PREC_COMPARISON, false, BinaryOp::Lt),
        TokenKind::Gt => (PREC_COMPARISON, false, BinaryOp::Gt),
        TokenKind::LtEq => (PREC_COMPARISON, false, BinaryOp::Le),
        TokenKind::GtEq => (PREC_COMPARISON, false, BinaryOp::Ge),
        TokenKind::Plus => (PREC_TERM, false, BinaryOp::Add),
        TokenKind::Minus => (PREC_TERM, false, BinaryOp::Sub),
        TokenKind::Star => (PREC_FACTOR, false, BinaryOp::Mul),
        TokenKind::Slash => (PREC_FACTOR, false, BinaryOp::Div),
        TokenKind::Percent => (PREC_FACTOR, false, BinaryOp::Mod),
        TokenKind::StarStar => (PREC_POWER, true, BinaryOp::Pow),
        _ => return None,
    })
}

impl<'s, 'a, 'c> Parser<'s, 'a, 'c> {
    /// Parse one expression at the lowest precedence.
    pub fn parse_expression(&mut self) -> &'a Expr<'a> {
        self.parse_precedence(PREC_OR)
    }

    fn parse_precedence(&mut self, min_prec: u8) -> &'a Expr<'a> {
        let mut lhs = self.parse_prefix();
        loop {
            // Postfix call forms bind above every binary level.
            match self.current.kind {
                TokenKind::Dot => {
                    lhs = self.parse_member_access(lhs);
                    continue;
                }
                TokenKind::LParen => {
                    lhs = self.parse_invocation(lhs);
                    continue;
                }
                TokenKind::LBracket => {
                    lhs = self.parse_index(lhs);
                    continue;
                }
                _ => {}
            }

            let Some((prec, right_assoc, op)) = infix(self.current.kind) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.advance();
            let next_min = if right_assoc { prec } else { prec + 1 };
            let rhs = self.parse_precedence(next_min);
            let range = lhs.range().cover(rhs.range());
            lhs = self.alloc(Expr::Binary {
                op,
                lhs,
                rhs,
                range,
            });
        }
        lhs
    }

    fn parse_prefix(&mut self) -> &'a Expr<'a> {
        let op = match self.current.kind {
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Bang | TokenKind::NotKw => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        let op_range = self.current.range;
        self.advance();
        let operand = self.parse_precedence(PREC_UNARY);
        let range = op_range.cover(operand.range());
        self.alloc(Expr::Unary { op, operand, range })
    }

    fn parse_primary(&mut self) -> &'a Expr<'a> {
        let token = self.current;
        match token.kind {
            TokenKind::Integer => {
                self.advance();
                let value = self.parse_integer_value(token);
                self.alloc(Expr::Integer {
                    value,
                    range: token.range,
                })
            }
            TokenKind::Real => {
                self.advance();
                let value = token.text.parse::<f64>().unwrap_or(0.0);
                self.alloc(Expr::Real {
                    value,
                    range: token.range,
                })
            }
            TokenKind::String => {
                self.advance();
                let value = self.intern_string_literal(token);
                self.alloc(Expr::String {
                    value,
                    range: token.range,
                })
            }
            TokenKind::TrueKw | TokenKind::FalseKw => {
                self.advance();
                self.alloc(Expr::Boolean {
                    value: token.kind == TokenKind::TrueKw,
                    range: token.range,
                })
            }
            TokenKind::NullKw => {
                self.advance();
                self.alloc(Expr::Null { range: token.range })
            }
            TokenKind::IfKw => self.parse_conditional(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression();
                self.consume(TokenKind::RParen);
                inner
            }
            kind if kind.is_name() => match self.parse_qualified_name() {
                Some(name) => self.alloc(Expr::Reference { name }),
                None => self.alloc(Expr::Error { range: token.range }),
            },
            TokenKind::ColonColon => match self.parse_qualified_name() {
                Some(name) => self.alloc(Expr::Reference { name }),
                None => self.alloc(Expr::Error { range: token.range }),
            },
            kind => {
                self.error(
                    DiagCode::E2007,
                    token.range,
                    format!("expected expression, found {}", kind_to_name(kind)),
                );
                self.alloc(Expr::Error { range: token.range })
            }
        }
    }

    /// `if cond then a [else b]`
    fn parse_conditional(&mut self) -> &'a Expr<'a> {
        let start = self.current.range;
        self.advance();
        let condition = self.parse_expression();
        if !self.eat(TokenKind::ThenKw) {
            self.error(
                DiagCode::E2006,
                self.current.range,
                format!(
                    "expected 'then' in conditional expression, found {}",
                    kind_to_name(self.current.kind)
                ),
            );
        }
        let then_branch = self.parse_expression();
        let else_branch = if self.eat(TokenKind::ElseKw) {
            Some(self.parse_expression())
        } else {
            None
        };
        let end = else_branch.unwrap_or(then_branch).range();
        self.alloc(Expr::Conditional {
            condition,
            then_branch,
            else_branch,
            range: start.cover(end),
        })
    }

    /// `.` member: one identifier or unrestricted name.
    fn parse_member_access(&mut self, base: &'a Expr<'a>) -> &'a Expr<'a> {
        self.advance();
        if !self.current.kind.is_name() {
            self.error(
                DiagCode::E2002,
                self.current.range,
                format!(
                    "expected identifier after '.', found {}",
                    kind_to_name(self.current.kind)
                ),
            );
            return base;
        }
        let token = self.current;
        self.advance();
        let member = self.intern_name(token);
        let range = base.range().cover(token.range);
        self.alloc(Expr::MemberAccess {
            base,
            member,
            range,
        })
    }

    /// `( args )` invocation.
    fn parse_invocation(&mut self, target: &'a Expr<'a>) -> &'a Expr<'a> {
        self.advance();
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression());
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen);
        let range = TextRange::new(target.range().start(), self.previous.range.end());
        let args = self.alloc_slice(args);
        self.alloc(Expr::Invocation {
            target,
            args,
            range,
        })
    }

    /// `[ index ]` — both the base and the index are kept.
    fn parse_index(&mut self, base: &'a Expr<'a>) -> &'a Expr<'a> {
        self.advance();
        let index = self.parse_expression();
        self.consume(TokenKind::RBracket);
        let range = TextRange::new(base.range().start(), self.previous.range.end());
        self.alloc(Expr::Index { base, index, range })
    }

    /// Decode a decimal or `0x` hex integer literal.
    fn parse_integer_value(&mut self, token: Token<'s>) -> i64 {
        let text = token.text;
        let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
        {
            i64::from_str_radix(hex, 16)
        } else {
            text.parse::<i64>()
        };
        match parsed {
            Ok(value) => value,
            Err(_) => {
                self.error(
                    DiagCode::E1005,
                    token.range,
                    format!("invalid numeric literal '{text}': out of range"),
                );
                0
            }
        }
    }
}
