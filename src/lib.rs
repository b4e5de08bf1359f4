
//! A measurement-units library built around a bidirectional
//! unit-expression engine: text like `"km"`, `"1/kg"`, or
//! `"log(m/s)"` parses into a structured [`unit::Unit`], an algebra
//! of [`converter::UnitConverter`] values describes how to move
//! numbers between a unit and its system unit, and a
//! precedence-aware [`format::UnitFormatter`] reconstructs canonical
//! text, recognizing metric prefixes by comparing converters rather
//! than symbols. A mixed-radix codec rounds out the engine, reading
//! and writing quantities spread across several units
//! (`"3 day 4 h 48 min"`).

pub mod converter;
pub mod format;
pub mod mixed;
pub mod number;
pub mod parsing;
pub mod prefix;
pub mod quantity;
pub mod rational;
pub mod si;
pub mod symbol;
pub mod unit;
