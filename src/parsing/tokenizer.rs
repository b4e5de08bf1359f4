
//! Hand-written tokenizer for unit expressions.

use super::{ParseError, ParseErrorKind};

use once_cell::sync::Lazy;
use regex::Regex;

/// The classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Eof,
  Identifier,
  OpenParen,
  CloseParen,
  Exponent,
  Multiply,
  Divide,
  Plus,
  Integer,
  Float,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
  pub offset: usize,
}

impl Token {
  fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Token {
    Token { kind, text: text.into(), offset }
  }
}

#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
  whole_input: &'a str,
  input: &'a str,
  position: usize,
}

/// Anchored number pattern: `sign? digit* "."? digit+ exponent?`.
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^-?\d*\.?\d+([eE][+-]?\d+)?").unwrap()
});

fn is_operator_char(c: char) -> bool {
  matches!(
    c,
    '(' | ')' | '*' | '+' | '-' | '.' | '/' | ':' | '^'
      | '²' | '³' | '·' | '¹' | '⁰' | '⁴' | '⁵' | '⁶' | '⁷' | '⁸' | '⁹'
  )
}

fn is_superscript_digit(c: char) -> bool {
  matches!(c, '⁰' | '¹' | '²' | '³' | '⁴' | '⁵' | '⁶' | '⁷' | '⁸' | '⁹')
}

/// Decodes a Unicode superscript digit to its ASCII value.
pub fn superscript_value(c: char) -> Option<u32> {
  let value = match c {
    '⁰' => 0,
    '¹' => 1,
    '²' => 2,
    '³' => 3,
    '⁴' => 4,
    '⁵' => 5,
    '⁶' => 6,
    '⁷' => 7,
    '⁸' => 8,
    '⁹' => 9,
    _ => return None,
  };
  Some(value)
}

fn is_identifier_start(c: char) -> bool {
  !c.is_whitespace() && !c.is_control() && !c.is_ascii_digit() && !is_operator_char(c)
}

fn is_identifier_part(c: char) -> bool {
  is_identifier_start(c) || c.is_ascii_digit()
}

impl<'a> Tokenizer<'a> {
  pub fn new(input: &'a str, start: usize) -> Tokenizer<'a> {
    let start = start.min(input.len());
    Tokenizer {
      whole_input: input,
      input: &input[start..],
      position: start,
    }
  }

  pub fn current_pos(&self) -> usize {
    self.position
  }

  pub fn is_eof(&self) -> bool {
    self.input.is_empty()
  }

  pub fn peek(&self) -> Option<char> {
    self.input.chars().next()
  }

  /// Advances the position by `amount` bytes, returning the skipped
  /// substring. Never advances past the end of the input.
  fn advance(&mut self, amount: usize) -> &'a str {
    let amount = amount.min(self.input.len());
    let (prefix, suffix) = self.input.split_at(amount);
    self.position += amount;
    self.input = suffix;
    prefix
  }

  /// Consumes the given literal at the current position, if present.
  pub fn read_literal(&mut self, literal: &str) -> bool {
    if self.input.starts_with(literal) {
      self.advance(literal.len());
      true
    } else {
      false
    }
  }

  /// Consumes an anchored regex match at the current position.
  fn read_regex(&mut self, regex: &Regex) -> Option<&'a str> {
    let m = regex.find(self.input)?;
    debug_assert_eq!(m.start(), 0, "Regex must be anchored at the start of the input");
    Some(self.advance(m.end()))
  }

  fn consume_spaces(&mut self) {
    let trimmed = self.input.trim_start();
    let skipped = self.input.len() - trimmed.len();
    self.advance(skipped);
  }

  /// Reads a run of characters satisfying `predicate`.
  fn read_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
    let end = self.input
      .char_indices()
      .find(|(_, c)| !predicate(*c))
      .map(|(i, _)| i)
      .unwrap_or(self.input.len());
    self.advance(end)
  }

  /// Classifies and consumes the next token. Fails on a character
  /// that belongs to no token class.
  pub fn next_token(&mut self) -> Result<Token, ParseError> {
    self.consume_spaces();
    let offset = self.position;
    let Some(c) = self.peek() else {
      return Ok(Token::new(TokenKind::Eof, "", offset));
    };
    match c {
      '(' => {
        self.advance(1);
        Ok(Token::new(TokenKind::OpenParen, "(", offset))
      }
      ')' => {
        self.advance(1);
        Ok(Token::new(TokenKind::CloseParen, ")", offset))
      }
      '*' => {
        self.advance(1);
        if self.read_literal("*") {
          Ok(Token::new(TokenKind::Exponent, "**", offset))
        } else {
          Ok(Token::new(TokenKind::Multiply, "*", offset))
        }
      }
      '·' => {
        self.advance(c.len_utf8());
        Ok(Token::new(TokenKind::Multiply, "·", offset))
      }
      '/' => {
        self.advance(1);
        Ok(Token::new(TokenKind::Divide, "/", offset))
      }
      '+' => {
        self.advance(1);
        Ok(Token::new(TokenKind::Plus, "+", offset))
      }
      '^' => {
        self.advance(1);
        Ok(Token::new(TokenKind::Exponent, "^", offset))
      }
      c if is_superscript_digit(c) => {
        let text = self.read_while(is_superscript_digit);
        Ok(Token::new(TokenKind::Exponent, text, offset))
      }
      '-' | '.' | '0'..='9' => {
        match self.read_regex(&NUMBER_RE) {
          Some(text) => {
            let kind = if text.contains(['.', 'e', 'E']) {
              TokenKind::Float
            } else {
              TokenKind::Integer
            };
            Ok(Token::new(kind, text, offset))
          }
          None => {
            // A bare minus or dot with no digits after it.
            Err(ParseError::new(ParseErrorKind::UnexpectedToken, offset, c))
          }
        }
      }
      c if is_identifier_start(c) => {
        let text = self.read_while(is_identifier_part);
        Ok(Token::new(TokenKind::Identifier, text, offset))
      }
      c => Err(ParseError::new(ParseErrorKind::UnexpectedToken, offset, c)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(input, 0);
    let mut tokens = Vec::new();
    loop {
      let token = tokenizer.next_token().unwrap();
      let done = token.kind == TokenKind::Eof;
      tokens.push(token);
      if done {
        break;
      }
    }
    tokens
  }

  fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).into_iter().map(|t| t.kind).collect()
  }

  #[test]
  fn test_operators() {
    assert_eq!(kinds("m/s"), vec![
      TokenKind::Identifier,
      TokenKind::Divide,
      TokenKind::Identifier,
      TokenKind::Eof,
    ]);
    assert_eq!(kinds("m·h"), vec![
      TokenKind::Identifier,
      TokenKind::Multiply,
      TokenKind::Identifier,
      TokenKind::Eof,
    ]);
    assert_eq!(kinds("m*s"), vec![
      TokenKind::Identifier,
      TokenKind::Multiply,
      TokenKind::Identifier,
      TokenKind::Eof,
    ]);
  }

  #[test]
  fn test_double_star_is_exponent() {
    assert_eq!(kinds("m**2"), vec![
      TokenKind::Identifier,
      TokenKind::Exponent,
      TokenKind::Integer,
      TokenKind::Eof,
    ]);
  }

  #[test]
  fn test_number_classification() {
    assert_eq!(kinds("1000"), vec![TokenKind::Integer, TokenKind::Eof]);
    assert_eq!(kinds("-12"), vec![TokenKind::Integer, TokenKind::Eof]);
    assert_eq!(kinds("273.15"), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(kinds("-2.5e3"), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(kinds(".5"), vec![TokenKind::Float, TokenKind::Eof]);
  }

  #[test]
  fn test_superscript_run() {
    let tokens = tokenize("m²");
    assert_eq!(tokens[1].kind, TokenKind::Exponent);
    assert_eq!(tokens[1].text, "²");
    let tokens = tokenize("m¹⁰");
    assert_eq!(tokens[1].text, "¹⁰");
  }

  #[test]
  fn test_identifier_with_digits() {
    let tokens = tokenize("log2");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text, "log2");
  }

  #[test]
  fn test_identifier_with_degree_sign() {
    let tokens = tokenize("°C");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text, "°C");
  }

  #[test]
  fn test_offsets() {
    let tokens = tokenize("km / h");
    assert_eq!(tokens[0].offset, 0);
    assert_eq!(tokens[1].offset, 3);
    assert_eq!(tokens[2].offset, 5);
  }

  #[test]
  fn test_bare_minus_fails() {
    let mut tokenizer = Tokenizer::new("m-", 0);
    tokenizer.next_token().unwrap();
    let err = tokenizer.next_token().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(err.offset, 1);
  }

  #[test]
  fn test_bare_dot_fails() {
    let mut tokenizer = Tokenizer::new(". m", 0);
    let err = tokenizer.next_token().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(err.offset, 0);
  }

  #[test]
  fn test_colon_is_not_a_token() {
    let mut tokenizer = Tokenizer::new(":", 0);
    let err = tokenizer.next_token().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
  }

  #[test]
  fn test_read_literal() {
    let mut tokenizer = Tokenizer::new("2:3", 0);
    tokenizer.next_token().unwrap();
    assert!(tokenizer.read_literal(":"));
    let token = tokenizer.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::Integer);
    assert_eq!(token.text, "3");
  }

  #[test]
  fn test_start_offset() {
    let mut tokenizer = Tokenizer::new("xx km", 3);
    let token = tokenizer.next_token().unwrap();
    assert_eq!(token.text, "km");
    assert_eq!(token.offset, 3);
  }
}
