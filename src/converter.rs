
//! The converter algebra: pure numeric transforms between a unit's
//! representation and its system unit's representation.
//!
//! Converters are immutable values with structural equality, so a
//! converter can serve as a lookup key (the symbol map uses this to
//! recognize metric prefixes by their converters rather than their
//! symbols).

use crate::number::Number;
use crate::rational::{Rational, DivideByZeroError};

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

/// A pure function from a numeric value in some unit to the
/// equivalent value in that unit's system unit.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitConverter {
  /// The no-op conversion.
  Identity,
  /// The affine conversion `y = x + offset`.
  Add { offset: Number },
  /// The linear conversion `y = x * factor`.
  Multiply { factor: Number },
  /// The linear conversion `y = x * base^exponent`, used for metric
  /// and binary prefixes.
  PowerOfInt { base: i32, exponent: i32 },
  /// The logarithmic conversion `y = log_base(x)`.
  Log { base: f64 },
  /// The exponential conversion `y = base^x`.
  Exp { base: f64 },
  /// Sequential composition: apply `left`, then `right`.
  Pair { left: Box<UnitConverter>, right: Box<UnitConverter> },
}

impl UnitConverter {
  /// A multiplication converter with an exact rational factor.
  pub fn multiply_rational(numer: i64, denom: i64) -> Result<UnitConverter, DivideByZeroError> {
    let factor = Rational::new(numer, denom)?;
    if factor.is_one() {
      Ok(UnitConverter::Identity)
    } else {
      Ok(UnitConverter::Multiply { factor: Number::from(factor) })
    }
  }

  pub fn shift(offset: impl Into<Number>) -> UnitConverter {
    let offset = offset.into();
    if offset.is_zero() {
      UnitConverter::Identity
    } else {
      UnitConverter::Add { offset }
    }
  }

  pub fn is_identity(&self) -> bool {
    matches!(self, UnitConverter::Identity)
  }

  /// Whether this converter is a linear function. `Add` counts as
  /// linear here, matching the convention of unit systems: an affine
  /// chain still converts "linearly" for the purposes of deciding
  /// whether a unit participates in products.
  pub fn is_linear(&self) -> bool {
    match self {
      UnitConverter::Identity
        | UnitConverter::Add { .. }
        | UnitConverter::Multiply { .. }
        | UnitConverter::PowerOfInt { .. } => true,
      UnitConverter::Log { .. } | UnitConverter::Exp { .. } => false,
      UnitConverter::Pair { left, right } => left.is_linear() && right.is_linear(),
    }
  }

  /// The multiplicative factor of this converter, provided the whole
  /// chain reduces to a pure scaling with no offset.
  pub fn linear_factor(&self) -> Option<Number> {
    match self {
      UnitConverter::Identity => Some(Number::one()),
      UnitConverter::Add { offset } => offset.is_zero().then(Number::one),
      UnitConverter::Multiply { factor } => Some(factor.clone()),
      UnitConverter::PowerOfInt { base, exponent } => {
        // A prefix base is never zero, so the power always exists.
        Number::from(i64::from(*base)).powi(*exponent).ok()
      }
      UnitConverter::Log { .. } | UnitConverter::Exp { .. } => None,
      UnitConverter::Pair { left, right } => {
        Some(left.linear_factor()? * right.linear_factor()?)
      }
    }
  }

  /// Applies this converter to a value.
  pub fn convert(&self, value: Number) -> Number {
    match self {
      UnitConverter::Identity => value,
      UnitConverter::Add { offset } => value + offset.clone(),
      UnitConverter::Multiply { factor } => value * factor.clone(),
      UnitConverter::PowerOfInt { base, exponent } => {
        match Number::from(i64::from(*base)).powi(*exponent) {
          Ok(scale) => value * scale,
          Err(_) => value,
        }
      }
      UnitConverter::Log { base } => {
        let x = value.to_f64().unwrap_or(f64::MAX);
        Number::from(x.ln() / base.ln())
      }
      UnitConverter::Exp { base } => {
        let x = value.to_f64().unwrap_or(f64::MAX);
        Number::from(base.powf(x))
      }
      UnitConverter::Pair { left, right } => right.convert(left.convert(value)),
    }
  }

  /// The inverse conversion. Fails only when a multiplication factor
  /// is zero.
  pub fn inverse(&self) -> Result<UnitConverter, DivideByZeroError> {
    match self {
      UnitConverter::Identity => Ok(UnitConverter::Identity),
      UnitConverter::Add { offset } => Ok(UnitConverter::Add { offset: - offset.clone() }),
      UnitConverter::Multiply { factor } => Ok(UnitConverter::Multiply { factor: factor.recip()? }),
      UnitConverter::PowerOfInt { base, exponent } =>
        Ok(UnitConverter::PowerOfInt { base: *base, exponent: - exponent }),
      UnitConverter::Log { base } => Ok(UnitConverter::Exp { base: *base }),
      UnitConverter::Exp { base } => Ok(UnitConverter::Log { base: *base }),
      UnitConverter::Pair { left, right } => Ok(UnitConverter::Pair {
        left: Box::new(right.inverse()?),
        right: Box::new(left.inverse()?),
      }),
    }
  }

  /// Composes `self` with `other`, producing a converter that applies
  /// `self` first and `other` second. Identity converters are elided,
  /// and adjacent conversions of the same kind are fused, so a chain
  /// of scalings stays a single `Multiply` or `PowerOfInt`.
  pub fn concatenate(self, other: UnitConverter) -> UnitConverter {
    use UnitConverter::*;
    match (self, other) {
      (Identity, right) => right,
      (left, Identity) => left,
      (PowerOfInt { base: b1, exponent: e1 }, PowerOfInt { base: b2, exponent: e2 }) if b1 == b2 => {
        if e1 + e2 == 0 {
          Identity
        } else {
          PowerOfInt { base: b1, exponent: e1 + e2 }
        }
      }
      (left, right) if is_scaling(&left) && is_scaling(&right) => {
        // Both sides are pure scalings, so the factors fuse.
        let factor = left.linear_factor().expect("scaling converter has a factor")
          * right.linear_factor().expect("scaling converter has a factor");
        if factor.is_one() {
          Identity
        } else {
          Multiply { factor }
        }
      }
      (Add { offset: a }, Add { offset: b }) => {
        let offset = a + b;
        if offset.is_zero() {
          Identity
        } else {
          Add { offset }
        }
      }
      (left, right) => Pair { left: Box::new(left), right: Box::new(right) },
    }
  }
}

/// Whether the converter is a single pure-scaling step.
fn is_scaling(converter: &UnitConverter) -> bool {
  matches!(converter, UnitConverter::Multiply { .. } | UnitConverter::PowerOfInt { .. })
}

// Log and Exp bases are finite by construction, so structural
// equality is reflexive.
impl Eq for UnitConverter {}

impl Hash for UnitConverter {
  fn hash<H: Hasher>(&self, state: &mut H) {
    discriminant(self).hash(state);
    match self {
      UnitConverter::Identity => {}
      UnitConverter::Add { offset } => offset.hash(state),
      UnitConverter::Multiply { factor } => factor.hash(state),
      UnitConverter::PowerOfInt { base, exponent } => {
        base.hash(state);
        exponent.hash(state);
      }
      UnitConverter::Log { base } => state.write_u64(base.to_bits()),
      UnitConverter::Exp { base } => state.write_u64(base.to_bits()),
      UnitConverter::Pair { left, right } => {
        left.hash(state);
        right.hash(state);
      }
    }
  }
}

impl Display for UnitConverter {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      UnitConverter::Identity => write!(f, "x"),
      UnitConverter::Add { offset } => {
        if offset.is_negative() {
          write!(f, "x-{}", offset.abs())
        } else {
          write!(f, "x+{}", offset)
        }
      }
      UnitConverter::Multiply { factor } => write!(f, "x·{}", factor),
      UnitConverter::PowerOfInt { base, exponent } => write!(f, "x·{}^{}", base, exponent),
      UnitConverter::Log { base } => write!(f, "log{}(x)", base),
      UnitConverter::Exp { base } => write!(f, "{}^x", base),
      UnitConverter::Pair { left, right } => write!(f, "({})∘({})", right, left),
    }
  }
}
