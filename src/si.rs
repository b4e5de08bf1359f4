
//! The default unit catalog: SI base units, a useful set of derived
//! units, the SI and binary prefixes, and the bundle table that
//! builds the default symbol map.

use crate::converter::UnitConverter;
use crate::number::Number;
use crate::prefix::Prefix;
use crate::rational::Rational;
use crate::symbol::SymbolMap;
use crate::unit::Unit;

fn fraction(numer: i64, denom: i64) -> Number {
  // unwrap: all denominators in this module are nonzero literals
  Number::from(Rational::new(numer, denom).unwrap())
}

pub fn metre() -> Unit {
  Unit::base("m")
}

pub fn kilogram() -> Unit {
  Unit::base("kg")
}

pub fn second() -> Unit {
  Unit::base("s")
}

pub fn ampere() -> Unit {
  Unit::base("A")
}

pub fn kelvin() -> Unit {
  Unit::base("K")
}

pub fn mole() -> Unit {
  Unit::base("mol")
}

pub fn candela() -> Unit {
  Unit::base("cd")
}

/// One thousandth of the kilogram. Kept as a transformed unit so that
/// prefixed masses resolve through the kilogram, while the formatter
/// displays them against the gram.
pub fn gram() -> Unit {
  kilogram().scale(fraction(1, 1000)).with_symbol("g")
}

pub fn cubic_metre() -> Unit {
  metre().pow(3)
}

pub fn litre() -> Unit {
  cubic_metre().scale(fraction(1, 1000)).with_symbol("l")
}

pub fn minute() -> Unit {
  second().scale(fraction(60, 1))
}

pub fn hour() -> Unit {
  second().scale(fraction(3600, 1))
}

pub fn day() -> Unit {
  second().scale(fraction(86400, 1))
}

pub fn week() -> Unit {
  second().scale(fraction(604800, 1))
}

pub fn celsius() -> Unit {
  kelvin().shift(fraction(27315, 100))
}

pub fn fahrenheit() -> Unit {
  // °F to K: add 459.67, then scale by 5/9.
  let converter = UnitConverter::shift(fraction(45967, 100))
    .concatenate(UnitConverter::Multiply { factor: fraction(5, 9) });
  kelvin().transformed(converter)
}

pub fn newton() -> Unit {
  Unit::alternate("N", kilogram().multiply(metre()).divide(second().pow(2)))
}

pub fn pascal() -> Unit {
  Unit::alternate("Pa", newton().divide(metre().pow(2)))
}

pub fn joule() -> Unit {
  Unit::alternate("J", newton().multiply(metre()))
}

pub fn watt() -> Unit {
  Unit::alternate("W", joule().divide(second()))
}

pub fn hertz() -> Unit {
  Unit::alternate("Hz", second().recip())
}

/// Logarithmic ratio unit: a value of x bels is a power ratio of
/// 10^x.
pub fn bel() -> Unit {
  Unit::one().transformed(UnitConverter::Exp { base: 10.0 })
}

/// The symbol bundle: an ordered list of `(field_name, symbol)`
/// pairs, conceptually a resource bundle. A trailing `.N` component
/// marks the entry as a parse-only alias rather than a canonical
/// label.
const SYMBOLS: &[(&str, &str)] = &[
  ("unit.METRE", "m"),
  ("unit.METRE.2", "meter"),
  ("unit.METRE.3", "metre"),
  ("unit.KILOGRAM", "kg"),
  ("unit.GRAM", "g"),
  ("unit.GRAM.2", "gram"),
  ("unit.SECOND", "s"),
  ("unit.SECOND.2", "sec"),
  ("unit.AMPERE", "A"),
  ("unit.KELVIN", "K"),
  ("unit.MOLE", "mol"),
  ("unit.CANDELA", "cd"),
  ("unit.LITRE", "l"),
  ("unit.LITRE.2", "L"),
  ("unit.LITRE.3", "litre"),
  ("unit.MINUTE", "min"),
  ("unit.HOUR", "h"),
  ("unit.HOUR.2", "hr"),
  ("unit.DAY", "day"),
  ("unit.DAY.2", "d"),
  ("unit.WEEK", "wk"),
  ("unit.CELSIUS", "°C"),
  ("unit.CELSIUS.2", "Celsius"),
  ("unit.FAHRENHEIT", "°F"),
  ("unit.NEWTON", "N"),
  ("unit.PASCAL", "Pa"),
  ("unit.JOULE", "J"),
  ("unit.WATT", "W"),
  ("unit.HERTZ", "Hz"),
  ("unit.BEL", "B"),
  ("prefix.QUETTA", "Q"),
  ("prefix.RONNA", "R"),
  ("prefix.YOTTA", "Y"),
  ("prefix.ZETTA", "Z"),
  ("prefix.EXA", "E"),
  ("prefix.PETA", "P"),
  ("prefix.TERA", "T"),
  ("prefix.GIGA", "G"),
  ("prefix.MEGA", "M"),
  ("prefix.KILO", "k"),
  ("prefix.HECTO", "h"),
  ("prefix.DEKA", "da"),
  ("prefix.DECI", "d"),
  ("prefix.CENTI", "c"),
  ("prefix.MILLI", "m"),
  ("prefix.MICRO", "µ"),
  ("prefix.NANO", "n"),
  ("prefix.PICO", "p"),
  ("prefix.FEMTO", "f"),
  ("prefix.ATTO", "a"),
  ("prefix.ZEPTO", "z"),
  ("prefix.YOCTO", "y"),
  ("prefix.RONTO", "r"),
  ("prefix.QUECTO", "q"),
  ("prefix.KIBI", "Ki"),
  ("prefix.MEBI", "Mi"),
  ("prefix.GIBI", "Gi"),
  ("prefix.TEBI", "Ti"),
  ("prefix.PEBI", "Pi"),
  ("prefix.EXBI", "Ei"),
  ("prefix.ZEBI", "Zi"),
  ("prefix.YOBI", "Yi"),
];

enum Resolved {
  Unit(Unit),
  Prefix(Prefix),
}

fn unit_for(name: &str) -> Option<Unit> {
  let unit = match name {
    "METRE" => metre(),
    "KILOGRAM" => kilogram(),
    "GRAM" => gram(),
    "SECOND" => second(),
    "AMPERE" => ampere(),
    "KELVIN" => kelvin(),
    "MOLE" => mole(),
    "CANDELA" => candela(),
    "LITRE" => litre(),
    "MINUTE" => minute(),
    "HOUR" => hour(),
    "DAY" => day(),
    "WEEK" => week(),
    "CELSIUS" => celsius(),
    "FAHRENHEIT" => fahrenheit(),
    "NEWTON" => newton(),
    "PASCAL" => pascal(),
    "JOULE" => joule(),
    "WATT" => watt(),
    "HERTZ" => hertz(),
    "BEL" => bel(),
    _ => return None,
  };
  Some(unit)
}

fn prefix_for(name: &str) -> Option<Prefix> {
  Prefix::si_prefixes()
    .into_iter()
    .chain(Prefix::binary_prefixes())
    .find(|p| p.name().eq_ignore_ascii_case(name))
}

fn resolve(field: &str) -> Option<Resolved> {
  if let Some(name) = field.strip_prefix("unit.") {
    unit_for(name).map(Resolved::Unit)
  } else if let Some(name) = field.strip_prefix("prefix.") {
    prefix_for(name).map(Resolved::Prefix)
  } else {
    None
  }
}

/// Splits a trailing numeric `.N` alias marker off a field name.
fn split_alias(field: &str) -> (&str, bool) {
  match field.rsplit_once('.') {
    Some((head, tail)) if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) =>
      (head, true),
    _ => (field, false),
  }
}

/// Builds the default symbol map from the bundle table. Entries whose
/// field names resolve to nothing are skipped, in keeping with the
/// lookups-never-fail contract of the symbol map.
pub fn default_symbols() -> SymbolMap {
  let mut map = SymbolMap::new();
  for (field, symbol) in SYMBOLS {
    let (field, is_alias) = split_alias(field);
    match resolve(field) {
      Some(Resolved::Unit(unit)) => {
        if is_alias {
          map.alias(unit, *symbol);
        } else {
          map.label(unit, *symbol);
        }
      }
      Some(Resolved::Prefix(prefix)) => map.label_prefix(prefix, *symbol),
      None => {}
    }
  }
  map
}
