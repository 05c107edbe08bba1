//! Portion units and their canonical conversions
//!
//! Volume units canonicalize to millilitres and weight units to grams. Units
//! that are not in either table (`serving`, `slice`, `piece`, ...) are treated
//! as counts and pass through unchanged.

use serde::{Deserialize, Serialize};

/// Measurement system of a portion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    /// Grams and weight-based household portions
    #[default]
    Weight,
    /// Millilitres and volume-based household portions
    Volume,
}

/// Household volume portions in millilitres
const VOLUME_UNITS: &[(&str, f64)] = &[
    ("cup", 240.0),
    ("half_cup", 120.0),
    ("quarter_cup", 60.0),
    ("tablespoon", 15.0),
    ("teaspoon", 5.0),
    ("bowl", 400.0),
    ("v_plate", 350.0),
    ("v_small_plate", 175.0),
    ("ml", 1.0),
    ("l", 1000.0),
];

/// Household weight portions in grams
const WEIGHT_UNITS: &[(&str, f64)] = &[
    ("palm", 85.0),
    ("handful", 30.0),
    ("fist", 150.0),
    ("w_plate", 300.0),
    ("w_small_plate", 150.0),
    ("g", 1.0),
    ("kg", 1000.0),
];

/// A portion expressed in canonical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Canonical {
    /// Amount in millilitres
    Millilitres(f64),
    /// Amount in grams
    Grams(f64),
    /// Unitless count (servings, slices, pieces)
    Count(f64),
}

impl Canonical {
    /// The canonical magnitude, treating 1 ml as 1 g
    pub fn value(&self) -> f64 {
        match self {
            Canonical::Millilitres(v) | Canonical::Grams(v) | Canonical::Count(v) => *v,
        }
    }

    /// Whether this amount is a unitless count
    pub fn is_count(&self) -> bool {
        matches!(self, Canonical::Count(_))
    }
}

/// Millilitres per unit, if `unit` is a known volume unit
pub fn millilitres_per(unit: &str) -> Option<f64> {
    lookup(VOLUME_UNITS, unit)
}

/// Grams per unit, if `unit` is a known weight unit
pub fn grams_per(unit: &str) -> Option<f64> {
    lookup(WEIGHT_UNITS, unit)
}

/// The measurement system a unit belongs to, if known
pub fn measurement_of(unit: &str) -> Option<MeasurementType> {
    if millilitres_per(unit).is_some() {
        Some(MeasurementType::Volume)
    } else if grams_per(unit).is_some() {
        Some(MeasurementType::Weight)
    } else {
        None
    }
}

/// Convert an amount in `unit` to canonical units
pub fn to_canonical(amount: f64, unit: &str) -> Canonical {
    if let Some(ml) = millilitres_per(unit) {
        Canonical::Millilitres(amount * ml)
    } else if let Some(g) = grams_per(unit) {
        Canonical::Grams(amount * g)
    } else {
        Canonical::Count(amount)
    }
}

/// Names of all supported volume and weight units
pub fn supported_units() -> impl Iterator<Item = (&'static str, MeasurementType)> {
    VOLUME_UNITS
        .iter()
        .map(|(name, _)| (*name, MeasurementType::Volume))
        .chain(
            WEIGHT_UNITS
                .iter()
                .map(|(name, _)| (*name, MeasurementType::Weight)),
        )
}

fn lookup(table: &[(&str, f64)], unit: &str) -> Option<f64> {
    let unit = unit.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(unit))
        .map(|(_, factor)| *factor)
}
