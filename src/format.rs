
//! Precedence-driven unit formatter, the approximate inverse of the
//! parser.
//!
//! Formatting walks the unit tree, tracking the precedence of the
//! text emitted so far and inserting parentheses whenever a weaker
//! construct would otherwise capture part of a stronger one. Scaling
//! converters are checked against the symbol map's registered
//! prefixes first, so kilo-metre prints as `"km"` rather than
//! `"m·1000"`.

use crate::converter::UnitConverter;
use crate::number::Number;
use crate::si;
use crate::symbol::SymbolMap;
use crate::unit::{Unit, UnitPow};

use thiserror::Error;

use std::f64::consts::E;

/// Binding strength of formatted text. Text at a given precedence can
/// be embedded, unparenthesized, in any construct of equal or lower
/// precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Precedence(u8);

impl Precedence {
  pub const ADDITION: Precedence = Precedence(0);
  pub const PRODUCT: Precedence = Precedence(2);
  pub const EXPONENT: Precedence = Precedence(4);
  /// A single symbol or fully parenthesized expression, which never
  /// needs further protection.
  pub const NOOP: Precedence = Precedence(u8::MAX);
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
  #[error("Unit has no symbol and no product decomposition")]
  NotFormattable,
}

/// A substitution applied to the parent lookup of a transformed unit,
/// purely for display. Without the kilogram entry, milligram would
/// print as a prefix applied to `"kg"`.
#[derive(Debug, Clone)]
struct DisplayOverride {
  system: Unit,
  display: Unit,
  /// Converter from the system unit to the display unit, concatenated
  /// onto the unit's own converter when the override applies.
  scale: UnitConverter,
}

fn standard_overrides() -> Vec<DisplayOverride> {
  vec![
    DisplayOverride {
      system: si::kilogram(),
      display: si::gram(),
      scale: UnitConverter::Multiply { factor: Number::from(1000) },
    },
    DisplayOverride {
      system: si::cubic_metre(),
      display: si::litre(),
      scale: UnitConverter::Multiply { factor: Number::from(1000) },
    },
  ]
}

#[derive(Debug, Clone)]
pub struct UnitFormatter<'a> {
  symbols: &'a SymbolMap,
  overrides: Vec<DisplayOverride>,
}

impl<'a> UnitFormatter<'a> {
  pub fn new(symbols: &'a SymbolMap) -> UnitFormatter<'a> {
    UnitFormatter { symbols, overrides: standard_overrides() }
  }

  pub fn format(&self, unit: &Unit) -> Result<String, FormatError> {
    let (text, _) = self.write_unit(unit)?;
    Ok(text)
  }

  fn write_unit(&self, unit: &Unit) -> Result<(String, Precedence), FormatError> {
    if let Unit::Annotated { actual, annotation } = unit {
      let (text, _) = self.write_unit(actual)?;
      return Ok((format!("{text}{{{annotation}}}"), Precedence::NOOP));
    }
    if let Some(symbol) = self.symbols.get_symbol(unit) {
      return Ok((symbol.to_owned(), Precedence::NOOP));
    }
    match unit {
      Unit::Annotated { .. } => unreachable!("Annotations are stripped above"),
      Unit::Base { symbol } | Unit::Alternate { symbol, .. } => {
        if symbol.is_empty() {
          Err(FormatError::NotFormattable)
        } else {
          Ok((symbol.clone(), Precedence::NOOP))
        }
      }
      Unit::Product { factors } => self.write_product(factors),
      Unit::Transformed { parent, converter, symbol } => {
        if let Some(symbol) = symbol {
          return Ok((symbol.clone(), Precedence::NOOP));
        }
        let (text, prec, converter) = match self.override_for(parent, converter) {
          Some((display_symbol, adjusted)) => {
            (display_symbol.to_owned(), Precedence::NOOP, adjusted)
          }
          None => {
            let (text, prec) = self.write_unit(parent)?;
            (text, prec, converter.clone())
          }
        };
        Ok(self.write_converter(text, prec, &converter))
      }
    }
  }

  /// Looks up a display substitution for the parent of a transformed
  /// unit. Only pure scalings are substituted, and only when the
  /// display unit has a canonical symbol of its own (which also keeps
  /// the substitution from recursing into itself).
  fn override_for(&self, parent: &Unit, converter: &UnitConverter) -> Option<(&str, UnitConverter)> {
    converter.linear_factor()?;
    let ov = self.overrides.iter().find(|ov| &ov.system == parent)?;
    let symbol = self.symbols.get_symbol(&ov.display)?;
    Some((symbol, converter.clone().concatenate(ov.scale.clone())))
  }

  /// Formats a product of powers: positive exponents joined by `·`,
  /// then a `/`-separated tail of the negated ones.
  fn write_product(&self, factors: &[UnitPow]) -> Result<(String, Precedence), FormatError> {
    let positive: Vec<&UnitPow> = factors.iter().filter(|f| f.pow > 0).collect();
    let negative: Vec<&UnitPow> = factors.iter().filter(|f| f.pow < 0).collect();

    let mut out = String::new();
    if positive.is_empty() {
      out.push('1');
    } else {
      for (i, factor) in positive.iter().enumerate() {
        if i > 0 {
          out.push('·');
        }
        self.write_factor(&mut out, factor, false)?;
      }
    }
    if !negative.is_empty() {
      out.push('/');
      if negative.len() == 1 {
        self.write_factor(&mut out, negative[0], true)?;
      } else {
        out.push('(');
        for (i, factor) in negative.iter().enumerate() {
          if i > 0 {
            out.push('·');
          }
          self.write_factor(&mut out, factor, true)?;
        }
        out.push(')');
      }
    }
    Ok((out, Precedence::PRODUCT))
  }

  fn write_factor(&self, out: &mut String, factor: &UnitPow, flip: bool) -> Result<(), FormatError> {
    let (text, prec) = self.write_unit(&factor.unit)?;
    if prec < Precedence::PRODUCT {
      out.push('(');
      out.push_str(&text);
      out.push(')');
    } else {
      out.push_str(&text);
    }
    let pow = if flip { -factor.pow } else { factor.pow };
    match (pow, factor.root) {
      (1, 1) => {}
      (2, 1) => out.push('²'),
      (3, 1) => out.push('³'),
      (p, 1) => out.push_str(&format!("^{p}")),
      (p, r) => out.push_str(&format!("^({p}/{r})")),
    }
    Ok(())
  }

  /// Appends the textual form of a converter chain onto already
  /// formatted unit text, parenthesizing as precedence demands.
  fn write_converter(
    &self,
    out: String,
    prec: Precedence,
    converter: &UnitConverter,
  ) -> (String, Precedence) {
    match converter {
      UnitConverter::Identity => (out, prec),
      UnitConverter::Pair { left, right } => {
        let (out, prec) = self.write_converter(out, prec, left);
        self.write_converter(out, prec, right)
      }
      UnitConverter::Add { offset } => {
        let mut text = parenthesize_below(out, prec, Precedence::ADDITION);
        if offset.is_negative() {
          text.push('-');
          text.push_str(&offset.abs().to_string());
        } else {
          text.push('+');
          text.push_str(&offset.to_string());
        }
        (text, Precedence::ADDITION)
      }
      UnitConverter::Multiply { .. } | UnitConverter::PowerOfInt { .. } => {
        if prec == Precedence::NOOP {
          if let Some(symbol) = self.symbols.prefix_for_converter(converter)
            .and_then(|prefix| self.symbols.prefix_symbol(prefix))
          {
            return (format!("{symbol}{out}"), Precedence::NOOP);
          }
        }
        let mut text = parenthesize_below(out, prec, Precedence::PRODUCT);
        // linear_factor is total on these two variants.
        let factor = converter.linear_factor()
          .unwrap_or_else(Number::one);
        match integer_reciprocal(&factor) {
          Some(recip) => {
            text.push('/');
            text.push_str(&recip.to_string());
          }
          None => {
            text.push('·');
            text.push_str(&factor.to_string());
          }
        }
        (text, Precedence::PRODUCT)
      }
      UnitConverter::Log { base } => {
        let text = format!("{}({})", log_name(*base), out);
        (text, Precedence::EXPONENT)
      }
      UnitConverter::Exp { base } => {
        let operand = if prec == Precedence::NOOP { out } else { format!("({out})") };
        (format!("{}^{}", exp_base_name(*base), operand), Precedence::EXPONENT)
      }
    }
  }
}

fn parenthesize_below(out: String, prec: Precedence, required: Precedence) -> String {
  if prec < required {
    format!("({out})")
  } else {
    out
  }
}

/// The integer reciprocal of a non-integral rational scale, if it has
/// one. Lets `·1/1000` print as the shorter `/1000`.
fn integer_reciprocal(factor: &Number) -> Option<Number> {
  factor.as_rational()?;
  if factor.is_integer() {
    return None;
  }
  let recip = factor.recip().ok()?;
  recip.is_integer().then_some(recip)
}

fn log_name(base: f64) -> String {
  if (base - E).abs() < 1e-12 {
    "ln".to_owned()
  } else if base == 10.0 {
    "log".to_owned()
  } else if base.fract() == 0.0 && base > 0.0 {
    format!("log{}", base as u64)
  } else {
    format!("log{base}")
  }
}

fn exp_base_name(base: f64) -> String {
  if (base - E).abs() < 1e-12 {
    "e".to_owned()
  } else if base.fract() == 0.0 && base > 0.0 {
    format!("{}", base as u64)
  } else {
    format!("{base}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parsing::UnitExprParser;
  use crate::prefix::Prefix;

  fn format(unit: &Unit) -> String {
    let symbols = si::default_symbols();
    UnitFormatter::new(&symbols).format(unit).unwrap()
  }

  fn round_trip(text: &str) -> String {
    let symbols = si::default_symbols();
    let unit = UnitExprParser::new(&symbols).parse(text).unwrap();
    UnitFormatter::new(&symbols).format(&unit).unwrap()
  }

  #[test]
  fn test_format_symbols() {
    assert_eq!(format(&si::metre()), "m");
    assert_eq!(format(&si::kilogram()), "kg");
    assert_eq!(format(&si::litre()), "l");
    assert_eq!(format(&si::celsius()), "°C");
  }

  #[test]
  fn test_format_prefixed() {
    assert_eq!(format(&Prefix::new("kilo", 10, 3).apply(si::metre())), "km");
    assert_eq!(format(&Prefix::new("micro", 10, -6).apply(si::second())), "µs");
  }

  #[test]
  fn test_format_gram_override() {
    // milli(gram) collapses to a scaling of the kilogram; the
    // override makes it print against the gram instead of as "mkg".
    assert_eq!(format(&Prefix::new("milli", 10, -3).apply(si::gram())), "mg");
    assert_eq!(format(&si::gram()), "g");
  }

  #[test]
  fn test_format_litre_override() {
    assert_eq!(format(&Prefix::new("milli", 10, -3).apply(si::litre())), "ml");
  }

  #[test]
  fn test_format_products() {
    assert_eq!(format(&si::metre().divide(si::second())), "m/s");
    assert_eq!(format(&si::metre().multiply(si::hour())), "m·h");
    assert_eq!(
      format(&si::metre().divide(si::second().pow(2))),
      "m/s²",
    );
    assert_eq!(
      format(&si::metre().divide(si::second().multiply(si::kilogram()))),
      "m/(kg·s)",
    );
  }

  #[test]
  fn test_format_reciprocals() {
    assert_eq!(format(&si::metre().recip()), "1/m");
    assert_eq!(format(&si::kilogram().recip()), "1/kg");
    assert_eq!(format(&si::litre().recip()), "1/l");
  }

  #[test]
  fn test_format_exponents() {
    assert_eq!(format(&si::metre().pow(2)), "m²");
    assert_eq!(format(&si::metre().pow(3)), "m³");
    assert_eq!(format(&si::metre().pow(4)), "m^4");
    assert_eq!(format(&si::metre().pow(-2)), "1/m²");
    assert_eq!(format(&si::metre().root(2)), "m^(1/2)");
    assert_eq!(format(&si::metre().pow(2).root(3)), "m^(2/3)");
  }

  #[test]
  fn test_format_scaled_exactly() {
    // 5/9 must print as a rational, never a truncated decimal.
    let scaled = si::metre().scale(Number::rational(5, 9).unwrap());
    assert_eq!(format(&scaled), "m·5/9");
    let scaled = si::metre().scale(Number::from(360));
    assert_eq!(format(&scaled), "m·360");
  }

  #[test]
  fn test_scale_matching_prefix_value_formats_as_prefix() {
    // An exact scale of 1000 is recognized as kilo even though the
    // converter is a plain Multiply rather than a PowerOfInt.
    let scaled = si::metre().scale(Number::from(1000));
    assert_eq!(format(&scaled), "km");
    // A float factor is not structurally equal to the exact prefix
    // factor and keeps its literal form.
    let scaled = si::metre().scale(Number::from(1000.0));
    assert_eq!(format(&scaled), "m·1000");
  }

  #[test]
  fn test_format_prefers_division() {
    let scaled = si::second().scale(Number::rational(1, 7).unwrap());
    assert_eq!(format(&scaled), "s/7");
  }

  #[test]
  fn test_format_shift() {
    let shifted = si::kelvin().shift(Number::from(273.15));
    assert_eq!(format(&shifted), "K+273.15");
    let shifted = si::kelvin().shift(Number::from(-273.15));
    assert_eq!(format(&shifted), "K-273.15");
  }

  #[test]
  fn test_format_log_and_exp() {
    let log = si::metre().divide(si::second())
      .transformed(UnitConverter::Log { base: 10.0 });
    assert_eq!(format(&log), "log(m/s)");
    let ln = si::metre().transformed(UnitConverter::Log { base: E });
    assert_eq!(format(&ln), "ln(m)");
    let exp = si::metre().transformed(UnitConverter::Exp { base: 2.0 });
    assert_eq!(format(&exp), "2^m");
  }

  #[test]
  fn test_format_annotation() {
    let annotated = si::metre().annotate("wavelength");
    assert_eq!(format(&annotated), "m{wavelength}");
  }

  #[test]
  fn test_round_trips() {
    for text in ["m", "km", "mg", "m/s", "m/s²", "1/m", "1/kg", "1/l",
                 "m·h", "log(m/s)", "2^m", "K+273.15", "m^(2/3)"] {
      assert_eq!(round_trip(text), text, "Round-tripping {text:?}");
    }
  }

  #[test]
  fn test_format_is_idempotent() {
    let symbols = si::default_symbols();
    let parser = UnitExprParser::new(&symbols);
    let formatter = UnitFormatter::new(&symbols);
    for text in ["km", "m·5/9", "mg", "(m/s)²", "K+273.15"] {
      let once = formatter.format(&parser.parse(text).unwrap()).unwrap();
      let twice = formatter.format(&parser.parse(&once).unwrap()).unwrap();
      assert_eq!(once, twice, "Formatting {text:?} twice");
    }
  }
}
