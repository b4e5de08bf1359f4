
//! Named scale factors such as kilo and mebi, each with an equivalent
//! converter.

use crate::converter::UnitConverter;
use crate::unit::Unit;

/// A prefix is a named power-of-`base` scale factor which can be
/// applied to a unit, producing a transformed unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix {
  name: String,
  base: i32,
  exponent: i32,
}

impl Prefix {
  pub fn new(name: impl Into<String>, base: i32, exponent: i32) -> Prefix {
    Prefix {
      name: name.into(),
      base,
      exponent,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn base(&self) -> i32 {
    self.base
  }

  pub fn exponent(&self) -> i32 {
    self.exponent
  }

  /// The scaling converter equivalent to this prefix.
  pub fn converter(&self) -> UnitConverter {
    UnitConverter::PowerOfInt { base: self.base, exponent: self.exponent }
  }

  /// Applies this prefix to a unit, as in `kilo.apply(metre())`.
  pub fn apply(&self, unit: Unit) -> Unit {
    unit.transformed(self.converter())
  }

  /// The standard SI prefixes, from quetta down to quecto.
  pub fn si_prefixes() -> Vec<Prefix> {
    vec![
      Prefix::new("quetta", 10, 30),
      Prefix::new("ronna", 10, 27),
      Prefix::new("yotta", 10, 24),
      Prefix::new("zetta", 10, 21),
      Prefix::new("exa", 10, 18),
      Prefix::new("peta", 10, 15),
      Prefix::new("tera", 10, 12),
      Prefix::new("giga", 10, 9),
      Prefix::new("mega", 10, 6),
      Prefix::new("kilo", 10, 3),
      Prefix::new("hecto", 10, 2),
      Prefix::new("deka", 10, 1),
      Prefix::new("deci", 10, -1),
      Prefix::new("centi", 10, -2),
      Prefix::new("milli", 10, -3),
      Prefix::new("micro", 10, -6),
      Prefix::new("nano", 10, -9),
      Prefix::new("pico", 10, -12),
      Prefix::new("femto", 10, -15),
      Prefix::new("atto", 10, -18),
      Prefix::new("zepto", 10, -21),
      Prefix::new("yocto", 10, -24),
      Prefix::new("ronto", 10, -27),
      Prefix::new("quecto", 10, -30),
    ]
  }

  /// The IEC binary prefixes, from kibi up to yobi.
  pub fn binary_prefixes() -> Vec<Prefix> {
    vec![
      Prefix::new("kibi", 2, 10),
      Prefix::new("mebi", 2, 20),
      Prefix::new("gibi", 2, 30),
      Prefix::new("tebi", 2, 40),
      Prefix::new("pebi", 2, 50),
      Prefix::new("exbi", 2, 60),
      Prefix::new("zebi", 2, 70),
      Prefix::new("yobi", 2, 80),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_converter() {
    let kilo = Prefix::new("kilo", 10, 3);
    assert_eq!(kilo.converter(), UnitConverter::PowerOfInt { base: 10, exponent: 3 });
  }

  #[test]
  fn test_apply() {
    let kilo = Prefix::new("kilo", 10, 3);
    let kilometre = kilo.apply(Unit::base("m"));
    assert_eq!(kilometre.system_unit(), Unit::base("m"));
    assert_eq!(
      kilometre.converter_to_system().linear_factor(),
      Some(crate::number::Number::from(1000)),
    );
  }
}
