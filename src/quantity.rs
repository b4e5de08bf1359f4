
//! A number paired with the unit it is measured in.

use crate::number::Number;
use crate::rational::DivideByZeroError;
use crate::unit::Unit;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
  value: Number,
  unit: Unit,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConversionError {
  #[error("Cannot convert between incompatible units {from:?} and {to:?}")]
  IncompatibleUnits { from: Unit, to: Unit },
  #[error(transparent)]
  DivideByZero(#[from] DivideByZeroError),
}

impl Quantity {
  pub fn new(value: impl Into<Number>, unit: Unit) -> Quantity {
    Quantity { value: value.into(), unit }
  }

  pub fn value(&self) -> &Number {
    &self.value
  }

  pub fn unit(&self) -> &Unit {
    &self.unit
  }

  pub fn into_parts(self) -> (Number, Unit) {
    (self.value, self.unit)
  }

  /// This quantity, re-expressed in its unit's system unit.
  pub fn to_system(&self) -> Quantity {
    let converter = self.unit.converter_to_system();
    Quantity {
      value: converter.convert(self.value.clone()),
      unit: self.unit.system_unit(),
    }
  }

  /// Converts to another unit of the same system unit, going through
  /// the system unit: unit → system via this unit's converter, then
  /// system → target via the target's inverted converter.
  pub fn convert_to(&self, target: &Unit) -> Result<Quantity, ConversionError> {
    let from_system = self.unit.system_unit();
    let to_system = target.system_unit();
    if from_system != to_system {
      return Err(ConversionError::IncompatibleUnits {
        from: self.unit.clone(),
        to: target.clone(),
      });
    }
    let in_system = self.unit.converter_to_system().convert(self.value.clone());
    let value = target.converter_to_system().inverse()?.convert(in_system);
    Ok(Quantity { value, unit: target.clone() })
  }

  /// Adds another quantity, converting it to this quantity's unit
  /// first. The result keeps this quantity's unit.
  pub fn add(&self, other: &Quantity) -> Result<Quantity, ConversionError> {
    let other = other.convert_to(&self.unit)?;
    Ok(Quantity {
      value: self.value.clone() + other.value,
      unit: self.unit.clone(),
    })
  }
}
