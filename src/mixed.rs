
//! Mixed-radix quantity text: spreading one quantity across an
//! ordered list of units, as in `"3 day 4 h 48 min"`, and reading
//! such text back.

use crate::format::{FormatError, UnitFormatter};
use crate::number::Number;
use crate::parsing::{ParseError, UnitExprParser};
use crate::quantity::{ConversionError, Quantity};
use crate::symbol::SymbolMap;
use crate::unit::Unit;

use thiserror::Error;

/// An ordered list of units of strictly decreasing significance. One
/// of the units is designated primary: quantities read back from
/// mixed-radix text are expressed in it. The leading unit is primary
/// unless [`MixedRadix::then_primary`] picks another.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedRadix {
  units: Vec<Unit>,
  primary: usize,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MixedRadixError {
  #[error("Unit is not strictly less significant than its predecessor")]
  NonDecreasingSignificance,
  #[error(transparent)]
  Conversion(#[from] ConversionError),
}

impl MixedRadix {
  pub fn new(leading: Unit) -> MixedRadix {
    MixedRadix { units: vec![leading], primary: 0 }
  }

  /// Appends a strictly less significant unit. One of the new unit
  /// must amount to less than one of the current trailing unit.
  pub fn then(mut self, unit: Unit) -> Result<MixedRadix, MixedRadixError> {
    let trailing = self.units.last().expect("Radix is never empty");
    let ratio = Quantity::new(1, unit.clone()).convert_to(trailing)?;
    if ratio.value().abs() >= Number::one() {
      return Err(MixedRadixError::NonDecreasingSignificance);
    }
    self.units.push(unit);
    Ok(self)
  }

  /// Appends a unit like [`MixedRadix::then`] and designates it the
  /// primary unit.
  pub fn then_primary(self, unit: Unit) -> Result<MixedRadix, MixedRadixError> {
    let mut radix = self.then(unit)?;
    radix.primary = radix.units.len() - 1;
    Ok(radix)
  }

  pub fn from_units(units: impl IntoIterator<Item = Unit>) -> Result<MixedRadix, MixedRadixError> {
    let mut iter = units.into_iter();
    let leading = iter.next().ok_or(MixedRadixError::NonDecreasingSignificance)?;
    iter.try_fold(MixedRadix::new(leading), MixedRadix::then)
  }

  pub fn units(&self) -> &[Unit] {
    &self.units
  }

  pub fn primary_unit(&self) -> &Unit {
    &self.units[self.primary]
  }
}

/// Renders and reads numbers on behalf of the codec. Injected so
/// callers control locale and precision.
pub trait NumberStyle {
  fn format(&self, value: &Number) -> String;
  fn parse(&self, text: &str) -> Option<Number>;
}

/// Plain style: rationals print exactly, floats print as Rust floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNumberStyle;

impl NumberStyle for StandardNumberStyle {
  fn format(&self, value: &Number) -> String {
    value.to_string()
  }

  fn parse(&self, text: &str) -> Option<Number> {
    text.trim().parse().ok()
  }
}

static STANDARD_STYLE: StandardNumberStyle = StandardNumberStyle;

/// Number styles and delimiters for the codec. Unit formatting is
/// configured on the codec itself ([`MixedRadixCodec::with_formatter`]),
/// since the formatter borrows the codec's symbol map.
pub struct MixedRadixOptions<'a> {
  /// Style for every part except the last, which are always whole.
  pub integer_style: &'a dyn NumberStyle,
  /// Style for the final part, which keeps its fraction.
  pub real_style: &'a dyn NumberStyle,
  pub number_to_unit_delimiter: &'a str,
  pub parts_delimiter: &'a str,
}

impl Default for MixedRadixOptions<'static> {
  fn default() -> MixedRadixOptions<'static> {
    MixedRadixOptions {
      integer_style: &STANDARD_STYLE,
      real_style: &STANDARD_STYLE,
      number_to_unit_delimiter: " ",
      parts_delimiter: " ",
    }
  }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MixedFormatError {
  #[error(transparent)]
  Conversion(#[from] ConversionError),
  #[error(transparent)]
  Format(#[from] FormatError),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MixedParseError {
  #[error("Empty mixed-radix text")]
  Empty,
  #[error("Number with no unit: '{0}'")]
  MissingUnit(String),
  #[error("Malformed number: '{0}'")]
  NotANumber(String),
  #[error(transparent)]
  Unit(#[from] ParseError),
  #[error(transparent)]
  Conversion(#[from] ConversionError),
}

pub struct MixedRadixCodec<'a> {
  formatter: UnitFormatter<'a>,
  parser: UnitExprParser<'a>,
}

impl<'a> MixedRadixCodec<'a> {
  pub fn new(symbols: &'a SymbolMap) -> MixedRadixCodec<'a> {
    MixedRadixCodec::with_formatter(symbols, UnitFormatter::new(symbols))
  }

  /// Builds a codec around a caller-supplied unit formatter.
  pub fn with_formatter(symbols: &'a SymbolMap, formatter: UnitFormatter<'a>) -> MixedRadixCodec<'a> {
    MixedRadixCodec {
      formatter,
      parser: UnitExprParser::new(symbols),
    }
  }

  /// Spreads a quantity across the radix: each unit takes the whole
  /// part, the remaining fraction carries into the next unit, and the
  /// last unit keeps whatever fraction is left.
  pub fn format(
    &self,
    quantity: &Quantity,
    radix: &MixedRadix,
    options: &MixedRadixOptions,
  ) -> Result<String, MixedFormatError> {
    let units = radix.units();
    let mut parts = Vec::with_capacity(units.len());
    let mut current = quantity.convert_to(&units[0])?;
    for (i, unit) in units.iter().enumerate() {
      let unit_text = self.formatter.format(unit)?;
      if i + 1 == units.len() {
        let number = options.real_style.format(current.value());
        parts.push(format!("{number}{}{unit_text}", options.number_to_unit_delimiter));
      } else {
        let whole = current.value().trunc();
        let fraction = current.value().clone() - whole.clone();
        let number = options.integer_style.format(&whole);
        parts.push(format!("{number}{}{unit_text}", options.number_to_unit_delimiter));
        current = Quantity::new(fraction, unit.clone()).convert_to(&units[i + 1])?;
      }
    }
    Ok(parts.join(options.parts_delimiter))
  }

  /// Reads mixed-radix text back into a single quantity, expressed in
  /// the radix's primary unit. Works whether or not the two
  /// delimiters are distinct.
  pub fn parse(
    &self,
    text: &str,
    radix: &MixedRadix,
    options: &MixedRadixOptions,
  ) -> Result<Quantity, MixedParseError> {
    let mut total: Option<Quantity> = None;
    for (number_text, unit_text) in split_parts(text, options)? {
      let value = options.real_style.parse(number_text)
        .ok_or_else(|| MixedParseError::NotANumber(number_text.to_owned()))?;
      let unit = self.parser.parse(unit_text.trim())?;
      let part = Quantity::new(value, unit);
      total = Some(match total {
        None => part,
        Some(total) => total.add(&part)?,
      });
    }
    let total = total.ok_or(MixedParseError::Empty)?;
    Ok(total.convert_to(radix.primary_unit())?)
  }
}

/// Splits mixed-radix text into (number, unit) pairs. When the two
/// delimiters are the same string, the text is one flat alternating
/// token list and pairing is positional; otherwise each part splits
/// once on the number/unit delimiter.
fn split_parts<'t>(
  text: &'t str,
  options: &MixedRadixOptions,
) -> Result<Vec<(&'t str, &'t str)>, MixedParseError> {
  let mut pairs = Vec::new();
  if options.number_to_unit_delimiter == options.parts_delimiter {
    let mut tokens = text
      .split(options.parts_delimiter)
      .filter(|t| !t.trim().is_empty());
    while let Some(number) = tokens.next() {
      let unit = tokens.next()
        .ok_or_else(|| MixedParseError::MissingUnit(number.to_owned()))?;
      pairs.push((number, unit));
    }
  } else {
    for part in text.split(options.parts_delimiter) {
      let part = part.trim();
      if part.is_empty() {
        continue;
      }
      let (number, unit) = part.split_once(options.number_to_unit_delimiter)
        .ok_or_else(|| MixedParseError::MissingUnit(part.to_owned()))?;
      pairs.push((number, unit));
    }
  }
  Ok(pairs)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::si;

  fn duration_radix() -> MixedRadix {
    MixedRadix::new(si::day())
      .then(si::hour()).unwrap()
      .then(si::minute()).unwrap()
  }

  #[test]
  fn test_format_duration() {
    let symbols = si::default_symbols();
    let codec = MixedRadixCodec::new(&symbols);
    // 4608 minutes is 3 days, 4 hours, 48 minutes.
    let quantity = Quantity::new(4608, si::minute());
    let text = codec
      .format(&quantity, &duration_radix(), &MixedRadixOptions::default())
      .unwrap();
    assert_eq!(text, "3 day 4 h 48 min");
  }

  #[test]
  fn test_parse_duration() {
    let symbols = si::default_symbols();
    let codec = MixedRadixCodec::new(&symbols);
    let quantity = codec
      .parse("3 day 4 h 48 min", &duration_radix(), &MixedRadixOptions::default())
      .unwrap();
    assert_eq!(quantity.unit(), &si::day());
    let minutes = quantity.convert_to(&si::minute()).unwrap();
    assert_eq!(minutes.value(), &Number::from(4608));
  }

  #[test]
  fn test_parse_into_primary_unit() {
    let symbols = si::default_symbols();
    let codec = MixedRadixCodec::new(&symbols);
    let radix = MixedRadix::new(si::day())
      .then(si::hour()).unwrap()
      .then_primary(si::minute()).unwrap();
    assert_eq!(radix.primary_unit(), &si::minute());
    let quantity = codec
      .parse("3 day 4 h 48 min", &radix, &MixedRadixOptions::default())
      .unwrap();
    assert_eq!(quantity.unit(), &si::minute());
    assert_eq!(quantity.value(), &Number::from(4608));
  }

  #[test]
  fn test_parse_with_distinct_delimiters() {
    let symbols = si::default_symbols();
    let codec = MixedRadixCodec::new(&symbols);
    let options = MixedRadixOptions {
      number_to_unit_delimiter: " ",
      parts_delimiter: ", ",
      ..MixedRadixOptions::default()
    };
    let quantity = codec.parse("3 day, 4 h, 48 min", &duration_radix(), &options).unwrap();
    let minutes = quantity.convert_to(&si::minute()).unwrap();
    assert_eq!(minutes.value(), &Number::from(4608));
  }

  #[test]
  fn test_last_part_keeps_fraction() {
    let symbols = si::default_symbols();
    let codec = MixedRadixCodec::new(&symbols);
    let radix = MixedRadix::new(si::hour()).then(si::minute()).unwrap();
    let quantity = Quantity::new(Number::rational(3, 2).unwrap(), si::hour());
    let text = codec
      .format(&quantity, &radix, &MixedRadixOptions::default())
      .unwrap();
    assert_eq!(text, "1 h 30 min");

    let quantity = Quantity::new(Number::rational(97, 96).unwrap(), si::hour());
    let text = codec
      .format(&quantity, &radix, &MixedRadixOptions::default())
      .unwrap();
    assert_eq!(text, "1 h 5/8 min");
  }

  #[test]
  fn test_non_decreasing_significance() {
    let err = MixedRadix::new(si::hour()).then(si::day()).unwrap_err();
    assert_eq!(err, MixedRadixError::NonDecreasingSignificance);
    let err = MixedRadix::new(si::hour()).then(si::hour()).unwrap_err();
    assert_eq!(err, MixedRadixError::NonDecreasingSignificance);
  }

  #[test]
  fn test_incompatible_radix_unit() {
    let err = MixedRadix::new(si::hour()).then(si::metre()).unwrap_err();
    assert!(matches!(err, MixedRadixError::Conversion(_)));
  }

  #[test]
  fn test_from_units() {
    let radix = MixedRadix::from_units([si::day(), si::hour(), si::minute()]).unwrap();
    assert_eq!(radix, duration_radix());
  }

  #[test]
  fn test_parse_errors() {
    let symbols = si::default_symbols();
    let codec = MixedRadixCodec::new(&symbols);
    let options = MixedRadixOptions::default();
    let radix = duration_radix();
    assert_eq!(codec.parse("", &radix, &options).unwrap_err(), MixedParseError::Empty);
    assert!(matches!(
      codec.parse("3 day 4", &radix, &options).unwrap_err(),
      MixedParseError::MissingUnit(_),
    ));
    assert!(matches!(
      codec.parse("x day", &radix, &options).unwrap_err(),
      MixedParseError::NotANumber(_),
    ));
    assert!(matches!(
      codec.parse("3 blorp", &radix, &options).unwrap_err(),
      MixedParseError::Unit(_),
    ));
  }
}
