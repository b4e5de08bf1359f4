
//! The unit-expression grammar and its parser.
//!
//! The grammar, in EBNF:
//!
//! ```text
//! sign        := "+" | "-"
//! digit       := "0".."9"
//! integer     := digit+
//! number      := sign? digit* "."? digit+ (("e"|"E") sign? digit+)?
//! exponent    := "^" sign? integer (":" integer)?
//!              | "^(" sign? integer ("/" sign? integer)? ")"
//!              | superscript_digit+
//! identifier  := initial_char (initial_char | digit)*
//! unit_expr     := add_expr
//! add_expr      := (number sign)? mul_expr (sign number)?
//! mul_expr      := exponent_expr ( ("*"|"·") exponent_expr | "/" exponent_expr )*
//! exponent_expr := atomic_expr exponent?
//!                | integer "^" atomic_expr
//!                | (("log" integer?) | "ln") "(" add_expr ")"
//! atomic_expr   := number | identifier | "(" add_expr ")"
//! ```
//!
//! where `initial_char` is any character that is not whitespace, a
//! control character, a digit, or one of the operator glyphs
//! `( ) * + - . / : ^ ² ³ · ¹ ⁰ ⁴ ⁵ ⁶ ⁷ ⁸ ⁹`.

mod parser;
mod tokenizer;

pub use parser::UnitExprParser;
pub use tokenizer::{Token, TokenKind};

use thiserror::Error;

/// A failure to parse a unit expression. Always carries the byte
/// offset of the failure and, where available, the offending token.
/// No partial unit is ever produced alongside an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} at offset {offset}: '{token}'")]
pub struct ParseError {
  pub kind: ParseErrorKind,
  pub offset: usize,
  pub token: String,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
  #[error("Unexpected token")]
  UnexpectedToken,
  #[error("Unknown unit identifier")]
  UnknownIdentifier,
  #[error("Unterminated expression")]
  UnterminatedExpression,
  #[error("Not a number")]
  NotANumber,
}

impl ParseError {
  pub fn new(kind: ParseErrorKind, offset: usize, token: impl Into<String>) -> ParseError {
    ParseError { kind, offset, token: token.into() }
  }
}
