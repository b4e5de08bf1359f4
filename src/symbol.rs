
//! The symbol table: bidirectional symbol/unit and symbol/prefix
//! lookup, plus converter-to-prefix recognition.
//!
//! A `SymbolMap` is built once with [`SymbolMap::label`] and
//! [`SymbolMap::alias`] calls and treated as read-only afterward.
//! Share it by reference (or `Arc`) between the parser and the
//! formatter; there is no process-wide singleton.

use crate::converter::UnitConverter;
use crate::prefix::Prefix;
use crate::unit::Unit;

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
  symbol_to_unit: HashMap<String, Unit>,
  unit_to_symbol: HashMap<Unit, String>,
  symbol_to_prefix: HashMap<String, Prefix>,
  // Scanned by structural equality, so a converter built elsewhere
  // can be recognized as a prefix. Small and built once.
  converter_to_prefix: Vec<(UnitConverter, Prefix)>,
}

impl SymbolMap {
  pub fn new() -> SymbolMap {
    SymbolMap::default()
  }

  /// Establishes the canonical 1:1 mapping between a unit and its
  /// symbol, in both directions. Overwrites any prior canonical
  /// symbol for the unit.
  pub fn label(&mut self, unit: Unit, symbol: impl Into<String>) {
    let symbol = symbol.into();
    if let Some(old) = self.unit_to_symbol.insert(unit.clone(), symbol.clone()) {
      if old != symbol {
        self.symbol_to_unit.remove(&old);
      }
    }
    self.symbol_to_unit.insert(symbol, unit);
  }

  /// Registers an extra parse-only symbol for a unit. Formatting
  /// never emits aliases.
  pub fn alias(&mut self, unit: Unit, symbol: impl Into<String>) {
    self.symbol_to_unit.insert(symbol.into(), unit);
  }

  /// Records the canonical symbol for a prefix and derives the
  /// scaling converter that prefix produces, for later structural
  /// lookup during formatting.
  pub fn label_prefix(&mut self, prefix: Prefix, symbol: impl Into<String>) {
    let converter = prefix.converter();
    self.converter_to_prefix.retain(|(c, _)| c != &converter);
    self.converter_to_prefix.push((converter, prefix.clone()));
    self.symbol_to_prefix.insert(symbol.into(), prefix);
  }

  pub fn get_unit(&self, symbol: &str) -> Option<&Unit> {
    self.symbol_to_unit.get(symbol)
  }

  pub fn get_symbol(&self, unit: &Unit) -> Option<&str> {
    self.unit_to_symbol.get(unit).map(String::as_str)
  }

  /// Finds the registered prefix whose symbol is the longest literal
  /// prefix of `symbol`. Longest-match resolves the ambiguity
  /// between, say, deka (`"da"`) and deci (`"d"`) when looking up
  /// `"daN"`.
  pub fn get_prefix(&self, symbol: &str) -> Option<(&str, &Prefix)> {
    self.symbol_to_prefix.iter()
      .filter(|(candidate, _)| symbol.starts_with(candidate.as_str()))
      .max_by_key(|(candidate, _)| candidate.len())
      .map(|(candidate, prefix)| (candidate.as_str(), prefix))
  }

  /// Recognizes a converter as a registered prefix. Used during
  /// formatting to print the prefix symbol instead of a literal
  /// factor. Matches structurally, or by exact scale value so that a
  /// fused `Multiply` still reads as its prefix.
  pub fn prefix_for_converter(&self, converter: &UnitConverter) -> Option<&Prefix> {
    if let Some((_, prefix)) = self.converter_to_prefix.iter().find(|(c, _)| c == converter) {
      return Some(prefix);
    }
    let scale = match converter {
      UnitConverter::Multiply { .. } => converter.linear_factor()?,
      _ => return None,
    };
    self.converter_to_prefix.iter()
      .find(|(c, _)| c.linear_factor().as_ref() == Some(&scale))
      .map(|(_, prefix)| prefix)
  }

  /// The canonical symbol of a registered prefix.
  pub fn prefix_symbol(&self, prefix: &Prefix) -> Option<&str> {
    self.symbol_to_prefix.iter()
      .find(|(_, p)| *p == prefix)
      .map(|(symbol, _)| symbol.as_str())
  }
}
