
//! Recursive parser turning unit-expression text into unit values.

use super::{ParseError, ParseErrorKind};
use super::tokenizer::{Token, TokenKind, Tokenizer, superscript_value};
use crate::converter::UnitConverter;
use crate::number::Number;
use crate::symbol::SymbolMap;
use crate::unit::Unit;

use std::f64::consts::E;

/// Parses unit expressions against a symbol map.
#[derive(Debug, Clone)]
pub struct UnitExprParser<'a> {
  symbols: &'a SymbolMap,
}

struct ParseState<'a> {
  tokenizer: Tokenizer<'a>,
  current: Token,
}

impl<'a> ParseState<'a> {
  fn new(input: &'a str, start: usize) -> Result<ParseState<'a>, ParseError> {
    let mut tokenizer = Tokenizer::new(input, start);
    let current = tokenizer.next_token()?;
    Ok(ParseState { tokenizer, current })
  }

  fn bump(&mut self) -> Result<(), ParseError> {
    self.current = self.tokenizer.next_token()?;
    Ok(())
  }

  fn unexpected(&self) -> ParseError {
    if self.current.kind == TokenKind::Eof {
      ParseError::new(ParseErrorKind::UnterminatedExpression, self.current.offset, "")
    } else {
      ParseError::new(ParseErrorKind::UnexpectedToken, self.current.offset, self.current.text.clone())
    }
  }
}

/// Parses the text of a number token.
fn number_from(token: &Token) -> Result<Number, ParseError> {
  token.text.parse::<Number>()
    .map_err(|_| ParseError::new(ParseErrorKind::NotANumber, token.offset, token.text.clone()))
}

/// Parses the text of an integer token as an exponent.
fn int_from(token: &Token) -> Result<i32, ParseError> {
  token.text.parse::<i32>()
    .map_err(|_| ParseError::new(ParseErrorKind::NotANumber, token.offset, token.text.clone()))
}

/// Interprets an identifier as a `log` / `ln` form, yielding the
/// logarithm base.
fn log_base(name: &str) -> Option<f64> {
  if name == "ln" {
    return Some(E);
  }
  let digits = name.strip_prefix("log")?;
  if digits.is_empty() {
    Some(10.0)
  } else {
    digits.parse::<u32>().ok().map(f64::from)
  }
}

impl<'a> UnitExprParser<'a> {
  pub fn new(symbols: &'a SymbolMap) -> UnitExprParser<'a> {
    UnitExprParser { symbols }
  }

  /// Parses an entire unit expression. The whole input must be
  /// consumed; trailing text is an error, and no partial unit is
  /// ever returned.
  pub fn parse(&self, text: &str) -> Result<Unit, ParseError> {
    self.parse_at(text, 0)
  }

  /// Parses a unit expression starting at the given byte offset.
  pub fn parse_at(&self, text: &str, start: usize) -> Result<Unit, ParseError> {
    let mut state = ParseState::new(text, start)?;
    let unit = self.parse_product_unit(&mut state)?;
    if state.current.kind == TokenKind::Eof {
      Ok(unit)
    } else {
      Err(state.unexpected())
    }
  }

  /// The main parse loop: a leading primary followed by exponent,
  /// multiply/divide, and shift suffixes, until EOF or a closing
  /// parenthesis.
  fn parse_product_unit(&self, state: &mut ParseState) -> Result<Unit, ParseError> {
    let mut unit = self.parse_leading(state)?;
    loop {
      match state.current.kind {
        TokenKind::Eof | TokenKind::CloseParen => break,
        TokenKind::Exponent => {
          let (pow, root) = parse_exponent(state)?;
          unit = unit.pow(pow);
          if root != 1 {
            unit = unit.root(root);
          }
        }
        TokenKind::Multiply => {
          state.bump()?;
          if matches!(state.current.kind, TokenKind::Integer | TokenKind::Float) {
            let n = number_from(&state.current)?;
            state.bump()?;
            unit = unit.scale(n);
          } else {
            let operand = self.parse_exponent_expr(state)?;
            unit = unit.multiply(operand);
          }
        }
        TokenKind::Divide => {
          state.bump()?;
          if matches!(state.current.kind, TokenKind::Integer | TokenKind::Float) {
            let token = state.current.clone();
            let n = number_from(&token)?;
            let recip = n.recip().map_err(|_| {
              ParseError::new(ParseErrorKind::NotANumber, token.offset, token.text.clone())
            })?;
            state.bump()?;
            unit = unit.scale(recip);
          } else {
            let operand = self.parse_exponent_expr(state)?;
            unit = unit.divide(operand);
          }
        }
        TokenKind::Plus => {
          state.bump()?;
          if matches!(state.current.kind, TokenKind::Integer | TokenKind::Float) {
            let n = number_from(&state.current)?;
            state.bump()?;
            unit = unit.shift(n);
          } else {
            return Err(state.unexpected());
          }
        }
        // A negative number directly after a unit is a negative
        // shift, as in "K-273.15"; the sign belongs to the token.
        TokenKind::Integer | TokenKind::Float if state.current.text.starts_with('-') => {
          let n = number_from(&state.current)?;
          state.bump()?;
          unit = unit.shift(n);
        }
        _ => return Err(state.unexpected()),
      }
    }
    Ok(unit)
  }

  /// Parses the leading primary of a product expression.
  fn parse_leading(&self, state: &mut ParseState) -> Result<Unit, ParseError> {
    match state.current.kind {
      TokenKind::Identifier => self.parse_identifier(state),
      TokenKind::OpenParen => self.parse_parenthesized(state),
      TokenKind::Integer | TokenKind::Float => {
        let n = number_from(&state.current)?;
        state.bump()?;
        match state.current.kind {
          // integer "^" atomic_expr denotes an exponential transform.
          TokenKind::Exponent if state.current.text == "^" || state.current.text == "**" => {
            let base = n.to_f64()
              .filter(|b| b.is_finite() && *b > 0.0)
              .ok_or_else(|| state.unexpected())?;
            state.bump()?;
            let operand = self.parse_atomic(state)?;
            Ok(operand.transformed(UnitConverter::Exp { base }))
          }
          // A leading number followed by a sign shifts the rest.
          TokenKind::Plus => {
            state.bump()?;
            let rest = self.parse_product_unit(state)?;
            Ok(rest.shift(n))
          }
          _ => Ok(Unit::one().scale(n)),
        }
      }
      _ => Err(state.unexpected()),
    }
  }

  /// An operand of a multiply/divide: an atomic expression with an
  /// optional exponent.
  fn parse_exponent_expr(&self, state: &mut ParseState) -> Result<Unit, ParseError> {
    let mut unit = self.parse_atomic(state)?;
    if state.current.kind == TokenKind::Exponent {
      let (pow, root) = parse_exponent(state)?;
      unit = unit.pow(pow);
      if root != 1 {
        unit = unit.root(root);
      }
    }
    Ok(unit)
  }

  fn parse_atomic(&self, state: &mut ParseState) -> Result<Unit, ParseError> {
    match state.current.kind {
      TokenKind::Identifier => self.parse_identifier(state),
      TokenKind::OpenParen => self.parse_parenthesized(state),
      TokenKind::Integer | TokenKind::Float => {
        let n = number_from(&state.current)?;
        state.bump()?;
        Ok(Unit::one().scale(n))
      }
      _ => Err(state.unexpected()),
    }
  }

  fn parse_parenthesized(&self, state: &mut ParseState) -> Result<Unit, ParseError> {
    debug_assert_eq!(state.current.kind, TokenKind::OpenParen);
    state.bump()?;
    let unit = self.parse_product_unit(state)?;
    if state.current.kind != TokenKind::CloseParen {
      return Err(state.unexpected());
    }
    state.bump()?;
    Ok(unit)
  }

  /// Resolves an identifier token: a `log`/`ln` call, a registered
  /// symbol, or a prefixed registered symbol.
  fn parse_identifier(&self, state: &mut ParseState) -> Result<Unit, ParseError> {
    debug_assert_eq!(state.current.kind, TokenKind::Identifier);
    let name = state.current.text.clone();
    let offset = state.current.offset;
    state.bump()?;

    if let Some(base) = log_base(&name) {
      if state.current.kind == TokenKind::OpenParen {
        state.bump()?;
        let inner = self.parse_product_unit(state)?;
        if state.current.kind != TokenKind::CloseParen {
          return Err(state.unexpected());
        }
        state.bump()?;
        return Ok(inner.transformed(UnitConverter::Log { base }));
      }
    }

    self.resolve_symbol(&name)
      .ok_or_else(|| ParseError::new(ParseErrorKind::UnknownIdentifier, offset, name))
  }

  /// Looks up a symbol directly, falling back to longest-match prefix
  /// recognition (so `"km"` resolves as kilo-metre).
  fn resolve_symbol(&self, name: &str) -> Option<Unit> {
    if let Some(unit) = self.symbols.get_unit(name) {
      return Some(unit.clone());
    }
    let (prefix_symbol, prefix) = self.symbols.get_prefix(name)?;
    let rest = &name[prefix_symbol.len()..];
    if rest.is_empty() {
      return None;
    }
    let unit = self.symbols.get_unit(rest)?;
    Some(unit.clone().transformed(prefix.converter()))
  }
}

/// Parses an exponent suffix. The current token must be an exponent
/// token; afterwards the state is positioned past the whole suffix.
/// Returns `(pow, root)`.
fn parse_exponent(state: &mut ParseState) -> Result<(i32, i32), ParseError> {
  debug_assert_eq!(state.current.kind, TokenKind::Exponent);

  // A run of superscript digits encodes a plain positive power.
  if state.current.text != "^" && state.current.text != "**" {
    let mut pow: i32 = 0;
    for c in state.current.text.chars() {
      let digit = superscript_value(c).ok_or_else(|| state.unexpected())?;
      pow = pow.saturating_mul(10).saturating_add(digit as i32);
    }
    state.bump()?;
    return Ok((pow, 1));
  }

  state.bump()?;
  match state.current.kind {
    // "^(p)" or "^(p/r)"
    TokenKind::OpenParen => {
      state.bump()?;
      let pow = read_signed_int(state)?;
      let mut root = 1;
      if state.current.kind == TokenKind::Divide {
        state.bump()?;
        root = read_signed_int(state)?;
      }
      if state.current.kind != TokenKind::CloseParen {
        return Err(state.unexpected());
      }
      state.bump()?;
      check_root(state, root)?;
      Ok((pow, root))
    }
    // "^p", optionally with a ":r" root suffix.
    TokenKind::Plus | TokenKind::Integer => {
      let pow = read_signed_int_no_bump(state)?;
      let mut root = 1;
      if state.tokenizer.read_literal(":") {
        let token = state.tokenizer.next_token()?;
        if token.kind != TokenKind::Integer {
          return Err(ParseError::new(ParseErrorKind::UnexpectedToken, token.offset, token.text));
        }
        root = int_from(&token)?;
      }
      state.bump()?;
      check_root(state, root)?;
      Ok((pow, root))
    }
    _ => Err(state.unexpected()),
  }
}

/// Reads a `sign? integer` sequence, leaving the state past it.
fn read_signed_int(state: &mut ParseState) -> Result<i32, ParseError> {
  let value = read_signed_int_no_bump(state)?;
  state.bump()?;
  Ok(value)
}

/// Reads a `sign? integer` sequence, leaving the state on the final
/// integer token. The caller decides when to advance, which lets it
/// first probe for a character-level `":"` root suffix.
fn read_signed_int_no_bump(state: &mut ParseState) -> Result<i32, ParseError> {
  if state.current.kind == TokenKind::Plus {
    state.bump()?;
  }
  if state.current.kind != TokenKind::Integer {
    return Err(state.unexpected());
  }
  int_from(&state.current)
}

fn check_root(state: &ParseState, root: i32) -> Result<(), ParseError> {
  if root == 0 {
    Err(ParseError::new(ParseErrorKind::UnexpectedToken, state.current.offset, "0"))
  } else {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::si;

  fn parse(text: &str) -> Result<Unit, ParseError> {
    let symbols = si::default_symbols();
    UnitExprParser::new(&symbols).parse(text)
  }

  #[test]
  fn test_parse_symbol() {
    assert_eq!(parse("m").unwrap(), si::metre());
    assert_eq!(parse("kg").unwrap(), si::kilogram());
    assert_eq!(parse("min").unwrap(), si::minute());
  }

  #[test]
  fn test_parse_alias() {
    assert_eq!(parse("meter").unwrap(), si::metre());
    assert_eq!(parse("L").unwrap(), si::litre());
  }

  #[test]
  fn test_parse_prefixed() {
    let km = parse("km").unwrap();
    assert_eq!(km, si::metre().transformed(UnitConverter::PowerOfInt { base: 10, exponent: 3 }));
    assert_eq!(km.system_unit(), si::metre());
  }

  #[test]
  fn test_parse_prefix_longest_match() {
    // "daN" is deka-newton, not deci-"aN".
    let dan = parse("daN").unwrap();
    assert_eq!(dan, si::newton().transformed(UnitConverter::PowerOfInt { base: 10, exponent: 1 }));
  }

  #[test]
  fn test_named_unit_beats_prefix() {
    // "min" is minutes, not milli-inches or anything prefixed.
    assert_eq!(parse("min").unwrap(), si::minute());
  }

  #[test]
  fn test_parse_product_and_quotient() {
    assert_eq!(parse("m/s").unwrap(), si::metre().divide(si::second()));
    assert_eq!(parse("m·h").unwrap(), si::metre().multiply(si::hour()));
    assert_eq!(parse("m*s").unwrap(), si::metre().multiply(si::second()));
  }

  #[test]
  fn test_parse_reciprocal() {
    assert_eq!(parse("1/m").unwrap(), si::metre().recip());
    assert_eq!(parse("1/kg").unwrap(), si::kilogram().recip());
    assert_eq!(parse("1/l").unwrap(), si::litre().recip());
  }

  #[test]
  fn test_parse_exponents() {
    assert_eq!(parse("m^2").unwrap(), si::metre().pow(2));
    assert_eq!(parse("m²").unwrap(), si::metre().pow(2));
    assert_eq!(parse("m³").unwrap(), si::metre().pow(3));
    assert_eq!(parse("m**2").unwrap(), si::metre().pow(2));
    assert_eq!(parse("m^-2").unwrap(), si::metre().pow(-2));
    assert_eq!(parse("m^+2").unwrap(), si::metre().pow(2));
  }

  #[test]
  fn test_parse_rational_exponents() {
    assert_eq!(parse("m^(1/2)").unwrap(), si::metre().root(2));
    assert_eq!(parse("m^2:3").unwrap(), si::metre().pow(2).root(3));
    assert_eq!(parse("m^(2/3)").unwrap(), si::metre().pow(2).root(3));
  }

  #[test]
  fn test_parse_exponent_binds_to_operand() {
    assert_eq!(
      parse("m/s²").unwrap(),
      si::metre().divide(si::second().pow(2)),
    );
  }

  #[test]
  fn test_parse_parenthesized() {
    assert_eq!(parse("(m/s)²").unwrap(), si::metre().divide(si::second()).pow(2));
    assert_eq!(parse("m/(s·s)").unwrap(), si::metre().divide(si::second().pow(2)));
  }

  #[test]
  fn test_parse_log_forms() {
    let expected = si::metre().divide(si::second())
      .transformed(UnitConverter::Log { base: 10.0 });
    assert_eq!(parse("log(m/s)").unwrap(), expected);

    let Unit::Transformed { converter, .. } = parse("ln(m)").unwrap() else {
      panic!("Expected transformed unit");
    };
    assert_eq!(converter, UnitConverter::Log { base: E });

    let Unit::Transformed { converter, .. } = parse("log2(m)").unwrap() else {
      panic!("Expected transformed unit");
    };
    assert_eq!(converter, UnitConverter::Log { base: 2.0 });
  }

  #[test]
  fn test_parse_exp_base() {
    let Unit::Transformed { converter, .. } = parse("2^m").unwrap() else {
      panic!("Expected transformed unit");
    };
    assert_eq!(converter, UnitConverter::Exp { base: 2.0 });
  }

  #[test]
  fn test_parse_shift() {
    assert_eq!(
      parse("K+273.15").unwrap(),
      si::kelvin().shift(Number::from(273.15)),
    );
    assert_eq!(
      parse("K-273.15").unwrap(),
      si::kelvin().shift(Number::from(-273.15)),
    );
    assert_eq!(
      parse("273.15+K").unwrap(),
      si::kelvin().shift(Number::from(273.15)),
    );
  }

  #[test]
  fn test_parse_scaled() {
    assert_eq!(parse("m*1000").unwrap(), si::metre().scale(Number::from(1000)));
    assert_eq!(
      parse("m/1000").unwrap(),
      si::metre().scale(Number::rational(1, 1000).unwrap()),
    );
  }

  #[test]
  fn test_unknown_identifier() {
    let err = parse("blorp").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownIdentifier);
    assert_eq!(err.token, "blorp");
    assert_eq!(err.offset, 0);
  }

  #[test]
  fn test_malformed_input() {
    let err = parse("bl//^--1a").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownIdentifier);
    parse("m//s").unwrap_err();
    parse("m^").unwrap_err();
    parse("^2").unwrap_err();
    parse("").unwrap_err();
    parse("m)").unwrap_err();
    parse("(m").unwrap_err();
    parse("m/0").unwrap_err();
  }

  #[test]
  fn test_unterminated_paren_error_kind() {
    let err = parse("(m/s").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnterminatedExpression);
  }

  #[test]
  fn test_trailing_garbage() {
    let err = parse("m m").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(err.offset, 2);
  }

  #[test]
  fn test_colon_outside_exponent_is_rejected() {
    parse("h:min").unwrap_err();
  }

  #[test]
  fn test_parse_at_offset() {
    let symbols = si::default_symbols();
    let parser = UnitExprParser::new(&symbols);
    assert_eq!(parser.parse_at("xy km", 3).unwrap(), parse("km").unwrap());
  }

  #[test]
  fn test_error_offsets_point_at_failure() {
    let err = parse("m/blorp").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownIdentifier);
    assert_eq!(err.offset, 2);
  }
}
