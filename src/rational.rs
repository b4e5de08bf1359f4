
//! Exact rational arithmetic over arbitrary-precision integers.
//!
//! [`Rational`] is used wherever exactness must survive a round-trip
//! through the unit-expression engine, such as SI prefix factors and
//! affine offsets. A rational is always stored reduced, with a
//! positive denominator.

use num::{BigInt, BigRational, Zero, One, Signed};

use thiserror::Error;

use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Mul, Neg};
use std::cmp::Ordering;

/// An exact fraction of two big integers. The denominator is always
/// positive and the fraction is always in lowest terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
  inner: BigRational,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Division by zero")]
pub struct DivideByZeroError {
  _priv: (),
}

impl DivideByZeroError {
  pub(crate) fn new() -> DivideByZeroError {
    DivideByZeroError { _priv: () }
  }
}

impl Rational {
  /// Constructs a rational number, reducing it to lowest terms. Fails
  /// if `denom` is zero.
  pub fn new(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Result<Rational, DivideByZeroError> {
    let denom = denom.into();
    if denom.is_zero() {
      return Err(DivideByZeroError::new());
    }
    Ok(Rational { inner: BigRational::new(numer.into(), denom) })
  }

  pub fn from_integer(n: impl Into<BigInt>) -> Rational {
    Rational { inner: BigRational::from_integer(n.into()) }
  }

  pub fn numerator(&self) -> &BigInt {
    self.inner.numer()
  }

  pub fn denominator(&self) -> &BigInt {
    self.inner.denom()
  }

  /// The multiplicative inverse. Fails on zero.
  pub fn reciprocal(&self) -> Result<Rational, DivideByZeroError> {
    if self.inner.is_zero() {
      Err(DivideByZeroError::new())
    } else {
      Ok(Rational { inner: self.inner.recip() })
    }
  }

  pub fn is_zero(&self) -> bool {
    self.inner.is_zero()
  }

  pub fn is_one(&self) -> bool {
    self.inner.is_one()
  }

  pub fn is_integer(&self) -> bool {
    self.inner.is_integer()
  }

  pub fn is_negative(&self) -> bool {
    self.inner.is_negative()
  }

  /// The integer part of `self`, truncated toward zero.
  pub fn trunc(&self) -> Rational {
    Rational { inner: self.inner.trunc() }
  }

  pub fn abs(&self) -> Rational {
    Rational { inner: self.inner.abs() }
  }

  /// Renders `self` as a fraction string using the given separator,
  /// such as `"5/9"`. Integral values are rendered without the
  /// separator or denominator.
  pub fn to_rational_string(&self, sep: &str) -> String {
    if self.is_integer() {
      self.inner.numer().to_string()
    } else {
      format!("{}{}{}", self.inner.numer(), sep, self.inner.denom())
    }
  }

  /// Raises `self` to an integer power. `0^0` is treated as 1, per
  /// the convention of `num`.
  pub fn powi(&self, exp: i32) -> Result<Rational, DivideByZeroError> {
    if exp < 0 {
      Ok(Rational { inner: self.reciprocal()?.inner.pow(- exp) })
    } else {
      Ok(Rational { inner: self.inner.pow(exp) })
    }
  }

  pub fn to_f64(&self) -> Option<f64> {
    num::traits::ToPrimitive::to_f64(&self.inner)
  }

  pub fn into_inner(self) -> BigRational {
    self.inner
  }

  pub fn as_inner(&self) -> &BigRational {
    &self.inner
  }
}

impl From<BigRational> for Rational {
  fn from(inner: BigRational) -> Rational {
    Rational { inner }
  }
}

impl From<i64> for Rational {
  fn from(n: i64) -> Rational {
    Rational::from_integer(n)
  }
}

impl Add for Rational {
  type Output = Rational;

  fn add(self, other: Rational) -> Rational {
    Rational { inner: self.inner + other.inner }
  }
}

impl Mul for Rational {
  type Output = Rational;

  fn mul(self, other: Rational) -> Rational {
    Rational { inner: self.inner * other.inner }
  }
}

impl Neg for Rational {
  type Output = Rational;

  fn neg(self) -> Rational {
    Rational { inner: - self.inner }
  }
}

impl PartialOrd for Rational {
  fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Rational {
  fn cmp(&self, other: &Rational) -> Ordering {
    self.inner.cmp(&other.inner)
  }
}

impl Display for Rational {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.to_rational_string("/"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_reduces() {
    let r = Rational::new(6, 8).unwrap();
    assert_eq!(r.numerator(), &BigInt::from(3));
    assert_eq!(r.denominator(), &BigInt::from(4));
  }

  #[test]
  fn test_new_normalizes_sign() {
    let r = Rational::new(1, -2).unwrap();
    assert_eq!(r.numerator(), &BigInt::from(-1));
    assert_eq!(r.denominator(), &BigInt::from(2));
    assert!(r.is_negative());
  }

  #[test]
  fn test_new_zero_denominator() {
    Rational::new(1, 0).unwrap_err();
  }

  #[test]
  fn test_reciprocal() {
    let r = Rational::new(5, 9).unwrap();
    assert_eq!(r.reciprocal().unwrap(), Rational::new(9, 5).unwrap());
    Rational::from_integer(0).reciprocal().unwrap_err();
  }

  #[test]
  fn test_is_integer() {
    assert!(Rational::new(4, 2).unwrap().is_integer());
    assert!(!Rational::new(5, 9).unwrap().is_integer());
  }

  #[test]
  fn test_rational_string() {
    assert_eq!(Rational::new(5, 9).unwrap().to_rational_string("/"), "5/9");
    assert_eq!(Rational::new(-5, 9).unwrap().to_rational_string("/"), "-5/9");
    assert_eq!(Rational::new(4, 2).unwrap().to_rational_string("/"), "2");
    assert_eq!(Rational::new(5, 9).unwrap().to_rational_string(":"), "5:9");
  }

  #[test]
  fn test_arithmetic() {
    let a = Rational::new(1, 6).unwrap();
    let b = Rational::new(1, 3).unwrap();
    assert_eq!(a.clone() + b.clone(), Rational::new(1, 2).unwrap());
    assert_eq!(a * b, Rational::new(1, 18).unwrap());
  }

  #[test]
  fn test_powi() {
    let r = Rational::new(2, 3).unwrap();
    assert_eq!(r.powi(2).unwrap(), Rational::new(4, 9).unwrap());
    assert_eq!(r.powi(-1).unwrap(), Rational::new(3, 2).unwrap());
    assert_eq!(r.powi(0).unwrap(), Rational::from_integer(1));
    Rational::from_integer(0).powi(-1).unwrap_err();
  }

  #[test]
  fn test_trunc() {
    assert_eq!(Rational::new(16, 5).unwrap().trunc(), Rational::from_integer(3));
    assert_eq!(Rational::new(-16, 5).unwrap().trunc(), Rational::from_integer(-3));
  }

  #[test]
  fn test_ordering() {
    assert!(Rational::new(1, 3).unwrap() < Rational::new(1, 2).unwrap());
  }
}
