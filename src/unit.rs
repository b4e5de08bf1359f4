
//! The unit algebra: a closed tree of unit values.
//!
//! Every non-base unit resolves, by following parent and system
//! links, to exactly one system unit with no cycles. The operations
//! here are exactly the ones the expression parser and formatter
//! consume; dimensional analysis beyond that is out of scope.

use crate::converter::UnitConverter;
use crate::number::Number;

use itertools::Itertools;
use num::integer::gcd;

/// A unit of measurement.
#[derive(Debug, Clone, PartialEq, Hash)]
pub enum Unit {
  /// A named system unit, such as the metre.
  Base { symbol: String },
  /// A named alternate system unit, such as the newton standing in
  /// for kg·m/s². The parent records the equivalent product form.
  Alternate { symbol: String, parent: Box<Unit> },
  /// A formal product of units raised to rational exponents. The
  /// empty product is the dimensionless unit one.
  Product { factors: Vec<UnitPow> },
  /// A unit defined as a converter applied to a parent unit, such as
  /// the kilometre or degree Celsius.
  Transformed { parent: Box<Unit>, converter: UnitConverter, symbol: Option<String> },
  /// A unit carrying a free-text annotation, such as `m{wavelength}`.
  Annotated { actual: Box<Unit>, annotation: String },
}

/// A unit raised to the rational exponent `pow / root`. The root is
/// always positive and the exponent is always in lowest terms.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct UnitPow {
  pub unit: Unit,
  pub pow: i32,
  pub root: i32,
}

// Converters (and hence units) never store NaN, so equality is
// reflexive.
impl Eq for Unit {}
impl Eq for UnitPow {}

impl UnitPow {
  pub fn new(unit: Unit, pow: i32, root: i32) -> UnitPow {
    let (pow, root) = reduce_exponent(pow.into(), root.into());
    UnitPow { unit, pow, root }
  }
}

/// Normalizes a rational exponent: positive root, lowest terms.
/// Intermediate arithmetic is wide, and a reduced value outside the
/// `i32` range saturates to the nearest bound.
fn reduce_exponent(mut pow: i128, mut root: i128) -> (i32, i32) {
  debug_assert!(root != 0, "exponent root must be nonzero");
  if root < 0 {
    pow = - pow;
    root = - root;
  }
  if pow == 0 {
    return (0, 1);
  }
  let g = gcd(pow.unsigned_abs(), root.unsigned_abs()) as i128;
  (saturate(pow / g), saturate(root / g))
}

fn saturate(value: i128) -> i32 {
  value.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32
}

/// Adds two rational exponents.
fn add_exponents((p1, r1): (i32, i32), (p2, r2): (i32, i32)) -> (i32, i32) {
  let (p1, r1) = (i128::from(p1), i128::from(r1));
  let (p2, r2) = (i128::from(p2), i128::from(r2));
  reduce_exponent(p1 * r2 + p2 * r1, r1 * r2)
}

/// Multiplies two rational exponents.
fn mul_exponents((p1, r1): (i32, i32), (p2, r2): (i32, i32)) -> (i32, i32) {
  let (p1, r1) = (i128::from(p1), i128::from(r1));
  let (p2, r2) = (i128::from(p2), i128::from(r2));
  reduce_exponent(p1 * p2, r1 * r2)
}

impl Unit {
  pub fn base(symbol: impl Into<String>) -> Unit {
    Unit::Base { symbol: symbol.into() }
  }

  pub fn alternate(symbol: impl Into<String>, parent: Unit) -> Unit {
    Unit::Alternate { symbol: symbol.into(), parent: Box::new(parent) }
  }

  /// The dimensionless unit one, i.e. the empty product.
  pub fn one() -> Unit {
    Unit::Product { factors: Vec::new() }
  }

  pub fn is_one(&self) -> bool {
    matches!(self, Unit::Product { factors } if factors.is_empty())
  }

  /// Constructs a product unit from raw factors, merging duplicate
  /// units, dropping zero exponents, and ordering deterministically.
  /// A product that collapses to a single first-power factor is that
  /// unit itself.
  pub fn product(factors: impl IntoIterator<Item = UnitPow>) -> Unit {
    let mut factors: Vec<UnitPow> = factors.into_iter()
      .map(|f| (f.unit, (f.pow, f.root)))
      .into_grouping_map()
      .fold((0, 1), |acc, _, exp| add_exponents(acc, exp))
      .into_iter()
      .map(|(unit, (pow, root))| UnitPow { unit, pow, root })
      .filter(|f| f.pow != 0)
      .collect();
    factors.sort_by(|a, b| sort_key(&a.unit).cmp(&sort_key(&b.unit)));
    if factors.len() == 1 && factors[0].pow == 1 && factors[0].root == 1 {
      factors.pop().expect("length checked above").unit
    } else {
      Unit::Product { factors }
    }
  }

  /// The canonical symbol stored directly on this unit, if any.
  pub fn symbol_hint(&self) -> Option<&str> {
    match self {
      Unit::Base { symbol } => Some(symbol),
      Unit::Alternate { symbol, .. } => Some(symbol),
      Unit::Transformed { symbol, .. } => symbol.as_deref(),
      Unit::Product { .. } | Unit::Annotated { .. } => None,
    }
  }

  /// The factor list of a product form. `None` for non-product units.
  pub fn product_factors(&self) -> Option<&[UnitPow]> {
    match self {
      Unit::Product { factors } => Some(factors),
      _ => None,
    }
  }

  /// The system unit this unit resolves to.
  pub fn system_unit(&self) -> Unit {
    match self {
      Unit::Base { .. } | Unit::Alternate { .. } => self.clone(),
      Unit::Transformed { parent, .. } => parent.system_unit(),
      Unit::Annotated { actual, .. } => actual.system_unit(),
      Unit::Product { factors } => {
        let mut system_factors = Vec::new();
        for f in factors {
          for sf in f.unit.system_unit().into_factors() {
            let (pow, root) = mul_exponents((sf.pow, sf.root), (f.pow, f.root));
            system_factors.push(UnitPow { unit: sf.unit, pow, root });
          }
        }
        Unit::product(system_factors)
      }
    }
  }

  /// The composed converter chain from this unit to its system unit.
  pub fn converter_to_system(&self) -> UnitConverter {
    match self {
      Unit::Base { .. } | Unit::Alternate { .. } => UnitConverter::Identity,
      Unit::Transformed { parent, converter, .. } =>
        converter.clone().concatenate(parent.converter_to_system()),
      Unit::Annotated { actual, .. } => actual.converter_to_system(),
      Unit::Product { factors } => {
        // Product factors are expected to convert linearly; a
        // nonlinear factor contributes no scaling.
        let mut scale = Number::one();
        for f in factors {
          if let Some(factor) = f.unit.converter_to_system().linear_factor() {
            if let Ok(powered) = factor.pow_rational(f.pow, f.root) {
              scale = scale * powered;
            }
          }
        }
        if scale.is_one() {
          UnitConverter::Identity
        } else {
          UnitConverter::Multiply { factor: scale }
        }
      }
    }
  }

  /// Derives a unit from this one using the given converter, which
  /// converts values of the new unit into values of `self`.
  /// Transforms of transforms collapse onto the underlying parent.
  pub fn transformed(self, converter: UnitConverter) -> Unit {
    if converter.is_identity() {
      return self;
    }
    match self {
      Unit::Transformed { parent, converter: inner, .. } => {
        let combined = converter.concatenate(inner);
        if combined.is_identity() {
          *parent
        } else {
          Unit::Transformed { parent, converter: combined, symbol: None }
        }
      }
      parent => Unit::Transformed {
        parent: Box::new(parent),
        converter,
        symbol: None,
      },
    }
  }

  /// Labels a transformed unit with its own symbol. No-op for other
  /// variants.
  pub fn with_symbol(self, symbol: impl Into<String>) -> Unit {
    match self {
      Unit::Transformed { parent, converter, .. } =>
        Unit::Transformed { parent, converter, symbol: Some(symbol.into()) },
      other => other,
    }
  }

  /// Scales this unit by a factor, as in `metre().scale(1000)` for a
  /// unit of one thousand metres.
  pub fn scale(self, factor: impl Into<Number>) -> Unit {
    let factor = factor.into();
    if factor.is_one() {
      self
    } else {
      self.transformed(UnitConverter::Multiply { factor })
    }
  }

  /// Shifts this unit by an offset, building an affine converter, as
  /// in `kelvin().shift(273.15)` for Celsius.
  pub fn shift(self, offset: impl Into<Number>) -> Unit {
    self.transformed(UnitConverter::shift(offset))
  }

  pub fn annotate(self, annotation: impl Into<String>) -> Unit {
    Unit::Annotated {
      actual: Box::new(self),
      annotation: annotation.into(),
    }
  }

  fn into_factors(self) -> Vec<UnitPow> {
    match self {
      Unit::Product { factors } => factors,
      unit => vec![UnitPow { unit, pow: 1, root: 1 }],
    }
  }

  pub fn multiply(self, other: Unit) -> Unit {
    let mut factors = self.into_factors();
    factors.extend(other.into_factors());
    Unit::product(factors)
  }

  pub fn divide(self, other: Unit) -> Unit {
    self.multiply(other.recip())
  }

  /// The reciprocal of `self`.
  pub fn recip(self) -> Unit {
    let factors = self.into_factors()
      .into_iter()
      .map(|f| UnitPow { unit: f.unit, pow: - f.pow, root: f.root })
      .collect::<Vec<_>>();
    Unit::product(factors)
  }

  /// Raises this unit to an integer power.
  pub fn pow(self, n: i32) -> Unit {
    match n {
      0 => Unit::one(),
      1 => self,
      _ => {
        let factors = self.into_factors()
          .into_iter()
          .map(|f| {
            let (pow, root) = mul_exponents((f.pow, f.root), (n, 1));
            UnitPow { unit: f.unit, pow, root }
          })
          .collect::<Vec<_>>();
        Unit::product(factors)
      }
    }
  }

  /// Takes the `n`-th root of this unit. `n` must be nonzero; a zero
  /// root leaves the unit unchanged.
  pub fn root(self, n: i32) -> Unit {
    if n == 0 || n == 1 {
      return self;
    }
    let factors = self.into_factors()
      .into_iter()
      .map(|f| {
        let (pow, root) = mul_exponents((f.pow, f.root), (1, n));
        UnitPow { unit: f.unit, pow, root }
      })
      .collect::<Vec<_>>();
    Unit::product(factors)
  }
}

/// Deterministic ordering key for product factors: named units sort
/// by symbol, anonymous units sort after them and keep insertion
/// order among themselves.
fn sort_key(unit: &Unit) -> (bool, String) {
  match unit.symbol_hint() {
    Some(symbol) => (false, symbol.to_owned()),
    None => (true, String::new()),
  }
}
