
//! Scalar values consumed by the converter algebra.
//!
//! A [`Number`] is either an exact rational or an IEEE 754 floating
//! point value. Arithmetic between two exact values stays exact;
//! anything touching a float degrades to a float.

use crate::rational::{Rational, DivideByZeroError};

use num::{BigInt, BigRational};
use num::traits::ToPrimitive;
use thiserror::Error;
use approx::AbsDiffEq;

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub, Mul, Neg};
use std::str::FromStr;

/// An exact-or-float scalar.
///
/// If a `Number` is represented as a floating point value, it is safe
/// to assume the contained value is finite and real. The `Number`
/// type is never used to store NaN or infinity constants.
#[derive(Debug, Clone)]
pub struct Number {
  inner: NumberImpl,
}

#[derive(Debug, Clone)]
enum NumberImpl {
  Rational(Box<Rational>),
  Float(f64),
}

/// Pair of numbers promoted to a common representation.
enum NumberPair {
  Rationals(Rational, Rational),
  Floats(f64, f64),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to parse '{input}' as a number")]
pub struct ParseNumberError {
  pub input: String,
}

impl Number {
  pub fn rational(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Result<Number, DivideByZeroError> {
    Ok(Number::from(Rational::new(numer, denom)?))
  }

  pub fn zero() -> Number {
    Number::from(0)
  }

  pub fn one() -> Number {
    Number::from(1)
  }

  pub fn is_zero(&self) -> bool {
    match &self.inner {
      NumberImpl::Rational(r) => r.is_zero(),
      NumberImpl::Float(f) => *f == 0.0,
    }
  }

  pub fn is_one(&self) -> bool {
    match &self.inner {
      NumberImpl::Rational(r) => r.is_one(),
      NumberImpl::Float(f) => *f == 1.0,
    }
  }

  pub fn is_negative(&self) -> bool {
    match &self.inner {
      NumberImpl::Rational(r) => r.is_negative(),
      NumberImpl::Float(f) => *f < 0.0,
    }
  }

  pub fn is_integer(&self) -> bool {
    match &self.inner {
      NumberImpl::Rational(r) => r.is_integer(),
      NumberImpl::Float(f) => f.fract() == 0.0,
    }
  }

  /// The exact rational representation, if `self` has one.
  pub fn as_rational(&self) -> Option<&Rational> {
    match &self.inner {
      NumberImpl::Rational(r) => Some(r),
      NumberImpl::Float(_) => None,
    }
  }

  /// The integer part of `self`, truncated toward zero.
  pub fn trunc(&self) -> Number {
    match &self.inner {
      NumberImpl::Rational(r) => Number::from(r.trunc()),
      NumberImpl::Float(f) => Number::from(f.trunc()),
    }
  }

  pub fn abs(&self) -> Number {
    match &self.inner {
      NumberImpl::Rational(r) => Number::from(r.abs()),
      NumberImpl::Float(f) => Number::from(f.abs()),
    }
  }

  /// The multiplicative inverse. Fails on zero.
  pub fn recip(&self) -> Result<Number, DivideByZeroError> {
    match &self.inner {
      NumberImpl::Rational(r) => Ok(Number::from(r.reciprocal()?)),
      NumberImpl::Float(f) => {
        if *f == 0.0 {
          return Err(DivideByZeroError::new());
        }
        Ok(Number::from(f.recip()))
      }
    }
  }

  /// Raises `self` to an integer power, staying exact when `self` is
  /// exact. Fails only for a negative power of zero.
  pub fn powi(&self, exp: i32) -> Result<Number, DivideByZeroError> {
    match &self.inner {
      NumberImpl::Rational(r) => Ok(Number::from(r.powi(exp)?)),
      NumberImpl::Float(f) => {
        if *f == 0.0 && exp < 0 {
          return Err(DivideByZeroError::new());
        }
        Ok(Number::from(f.powi(exp)))
      }
    }
  }

  /// Raises `self` to the rational power `pow / root`. Exact when the
  /// root is 1; otherwise the result is a float.
  pub fn pow_rational(&self, pow: i32, root: i32) -> Result<Number, DivideByZeroError> {
    if root == 1 {
      self.powi(pow)
    } else {
      let f = self.to_f64().unwrap_or(f64::MAX);
      Ok(Number::from(f.powf(f64::from(pow) / f64::from(root))))
    }
  }

  /// Converts `self` to an `f64` on a best-effort basis.
  pub fn to_f64(&self) -> Option<f64> {
    match &self.inner {
      NumberImpl::Rational(r) => r.to_f64(),
      NumberImpl::Float(f) => Some(*f),
    }
  }
}

impl From<Rational> for Number {
  fn from(r: Rational) -> Number {
    Number { inner: NumberImpl::Rational(Box::new(r)) }
  }
}

impl From<BigRational> for Number {
  fn from(r: BigRational) -> Number {
    Number::from(Rational::from(r))
  }
}

impl From<BigInt> for Number {
  fn from(n: BigInt) -> Number {
    Number::from(Rational::from_integer(n))
  }
}

impl From<i64> for Number {
  fn from(n: i64) -> Number {
    Number::from(Rational::from_integer(n))
  }
}

impl From<i32> for Number {
  fn from(n: i32) -> Number {
    Number::from(Rational::from_integer(n))
  }
}

impl From<f64> for Number {
  fn from(f: f64) -> Number {
    Number { inner: NumberImpl::Float(f) }
  }
}

impl NumberPair {
  /// Promotes two numbers to their least common representation.
  fn promote(left: &Number, right: &Number) -> NumberPair {
    match (&left.inner, &right.inner) {
      (NumberImpl::Rational(a), NumberImpl::Rational(b)) =>
        NumberPair::Rationals((**a).clone(), (**b).clone()),
      _ =>
        NumberPair::Floats(left.to_f64().unwrap_or(f64::MAX), right.to_f64().unwrap_or(f64::MAX)),
    }
  }
}

// Mixed representations never compare equal (matching `PartialEq`);
// a tie between an exact value and a float orders the exact value
// first.
impl PartialOrd for Number {
  fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
    match (&self.inner, &other.inner) {
      (NumberImpl::Rational(a), NumberImpl::Rational(b)) => Some(a.cmp(b)),
      (NumberImpl::Float(a), NumberImpl::Float(b)) => a.partial_cmp(b),
      _ => {
        let ord = self.to_f64()?.partial_cmp(&other.to_f64()?)?;
        if ord == Ordering::Equal {
          if matches!(self.inner, NumberImpl::Rational(_)) {
            Some(Ordering::Less)
          } else {
            Some(Ordering::Greater)
          }
        } else {
          Some(ord)
        }
      }
    }
  }
}

impl Add for &Number {
  type Output = Number;

  fn add(self, other: &Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Rationals(a, b) => Number::from(a + b),
      NumberPair::Floats(a, b) => Number::from(a + b),
    }
  }
}

impl Sub for &Number {
  type Output = Number;

  fn sub(self, other: &Number) -> Number {
    self + &(- other.clone())
  }
}

impl Mul for &Number {
  type Output = Number;

  fn mul(self, other: &Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Rationals(a, b) => Number::from(a * b),
      NumberPair::Floats(a, b) => Number::from(a * b),
    }
  }
}

impl Add for Number {
  type Output = Number;

  fn add(self, other: Number) -> Number {
    &self + &other
  }
}

impl Sub for Number {
  type Output = Number;

  fn sub(self, other: Number) -> Number {
    &self - &other
  }
}

impl Mul for Number {
  type Output = Number;

  fn mul(self, other: Number) -> Number {
    &self * &other
  }
}

impl Neg for Number {
  type Output = Number;

  fn neg(self) -> Number {
    match self.inner {
      NumberImpl::Rational(r) => Number::from(- *r),
      NumberImpl::Float(f) => Number::from(- f),
    }
  }
}

impl PartialEq for Number {
  fn eq(&self, other: &Number) -> bool {
    match (&self.inner, &other.inner) {
      (NumberImpl::Rational(a), NumberImpl::Rational(b)) => a == b,
      (NumberImpl::Float(a), NumberImpl::Float(b)) => a == b,
      _ => false,
    }
  }
}

// Number never stores NaN, so equality is reflexive.
impl Eq for Number {}

impl Hash for Number {
  fn hash<H: Hasher>(&self, state: &mut H) {
    match &self.inner {
      NumberImpl::Rational(r) => {
        state.write_u8(0);
        r.hash(state);
      }
      NumberImpl::Float(f) => {
        state.write_u8(1);
        state.write_u64(f.to_bits());
      }
    }
  }
}

impl Display for Number {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match &self.inner {
      NumberImpl::Rational(r) => write!(f, "{}", r),
      NumberImpl::Float(x) => write!(f, "{}", x),
    }
  }
}

impl FromStr for Number {
  type Err = ParseNumberError;

  fn from_str(s: &str) -> Result<Number, ParseNumberError> {
    if let Ok(n) = s.parse::<BigInt>() {
      return Ok(Number::from(n));
    }
    if let Some((numer, denom)) = s.split_once('/') {
      if let (Ok(n), Ok(d)) = (numer.parse::<BigInt>(), denom.parse::<BigInt>()) {
        if let Ok(r) = Rational::new(n, d) {
          return Ok(Number::from(r));
        }
      }
    }
    match s.parse::<f64>() {
      Ok(f) if f.is_finite() => Ok(Number::from(f)),
      _ => Err(ParseNumberError { input: s.to_owned() }),
    }
  }
}

impl AbsDiffEq for Number {
  type Epsilon = f64;

  fn default_epsilon() -> f64 {
    f64::default_epsilon()
  }

  fn abs_diff_eq(&self, other: &Number, epsilon: f64) -> bool {
    let (Some(a), Some(b)) = (self.to_f64(), other.to_f64()) else {
      return false;
    };
    a.abs_diff_eq(&b, epsilon)
  }
}

impl ToPrimitive for Number {
  fn to_i64(&self) -> Option<i64> {
    match &self.inner {
      NumberImpl::Rational(r) => r.is_integer().then(|| r.numerator().to_i64()).flatten(),
      NumberImpl::Float(f) => (f.fract() == 0.0).then(|| f.to_i64()).flatten(),
    }
  }

  fn to_u64(&self) -> Option<u64> {
    self.to_i64().and_then(|n| n.to_u64())
  }

  fn to_f64(&self) -> Option<f64> {
    Number::to_f64(self)
  }
}
