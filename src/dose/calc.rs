//! Insulin dose calculation
//!
//! All arithmetic runs at full precision; rounding happens once, when the
//! [`DoseBreakdown`] is assembled.

use super::factors::dose_factors;
use super::types::{DoseBreakdown, DoseFactors, DoseRecommendation, DoseRequest};
use crate::constants::PatientConstants;
use crate::error::GlycemiaError;

/// Unrounded dose components
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DoseComponents {
    pub carb_insulin: f64,
    pub protein_contribution: f64,
    pub fat_contribution: f64,
    pub base_insulin: f64,
    pub adjusted_insulin: f64,
    pub correction_insulin: f64,
    pub total: f64,
}

/// Recommend an insulin dose for a meal
///
/// # Errors
///
/// [`GlycemiaError::MissingConstants`] when no constants are supplied, and
/// [`GlycemiaError::InvalidConstant`] when the insulin-to-carb ratio is not a
/// positive finite number. Missing nutrients, activities or blood glucose are
/// not errors; they contribute nothing.
pub fn recommend(
    constants: Option<&PatientConstants>,
    request: &DoseRequest,
) -> Result<DoseRecommendation, GlycemiaError> {
    let constants = constants.ok_or(GlycemiaError::MissingConstants)?;
    validate(constants)?;

    let factors = dose_factors(constants, request);
    let components = components(constants, request, &factors);

    tracing::debug!(
        meal_type = %request.meal_type,
        carbs = request.nutrients.carbs,
        health_multiplier = factors.medical_factor(),
        activity_impact = factors.activity_impact,
        total = components.total,
        "Calculated insulin dose"
    );

    let timing = constants
        .timing_guideline(request.nutrients.absorption_type)
        .cloned();

    Ok(DoseRecommendation {
        breakdown: breakdown(&components, &factors),
        active_conditions: factors.health.active_conditions,
        active_medications: factors.health.active_medications,
        timing,
    })
}

/// Calculate only the itemized dose
pub fn calculate(
    constants: Option<&PatientConstants>,
    request: &DoseRequest,
) -> Result<DoseBreakdown, GlycemiaError> {
    recommend(constants, request).map(|r| r.breakdown)
}

fn validate(constants: &PatientConstants) -> Result<(), GlycemiaError> {
    let ratio = constants.insulin_to_carb_ratio;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(GlycemiaError::InvalidConstant {
            name: "insulin_to_carb_ratio",
            value: ratio,
        });
    }
    Ok(())
}

pub(crate) fn components(
    constants: &PatientConstants,
    request: &DoseRequest,
    factors: &DoseFactors,
) -> DoseComponents {
    let ratio = constants.insulin_to_carb_ratio;
    let nutrients = &request.nutrients;
    let medical = factors.medical_factor();

    let carb_insulin = finite_or_zero(nutrients.carbs) / ratio;
    let protein_contribution = finite_or_zero(nutrients.protein) * constants.protein_factor / ratio;
    let fat_contribution = finite_or_zero(nutrients.fat) * constants.fat_factor / ratio;

    let base_insulin = (carb_insulin + protein_contribution + fat_contribution)
        * factors.absorption_factor
        * factors.meal_timing_factor
        * factors.time_of_day_factor
        * medical;

    let adjusted_insulin = base_insulin * (1.0 + factors.activity_impact);

    let correction_insulin =
        correction(constants, request.blood_sugar).map_or(0.0, |c| c * medical);

    DoseComponents {
        carb_insulin,
        protein_contribution,
        fat_contribution,
        base_insulin,
        adjusted_insulin,
        correction_insulin,
        total: (adjusted_insulin + correction_insulin).max(0.0),
    }
}

/// Units needed to bring `blood_sugar` to target, before health adjustment
///
/// `None` unless blood glucose, target and correction factor are all present
/// and non-zero. Negative when below target.
pub fn correction(constants: &PatientConstants, blood_sugar: Option<f64>) -> Option<f64> {
    let bg = blood_sugar.filter(|v| v.is_finite() && *v != 0.0)?;
    let target = constants.target_glucose;
    let cf = constants.correction_factor;
    if !target.is_finite() || target == 0.0 || !cf.is_finite() || cf == 0.0 {
        return None;
    }
    Some((bg - target) / cf)
}

fn breakdown(c: &DoseComponents, f: &DoseFactors) -> DoseBreakdown {
    DoseBreakdown {
        carb_insulin: round2(c.carb_insulin),
        protein_contribution: round2(c.protein_contribution),
        fat_contribution: round2(c.fat_contribution),
        base_insulin: round2(c.base_insulin),
        absorption_factor: round2(f.absorption_factor),
        meal_timing_factor: round2(f.meal_timing_factor),
        time_of_day_factor: round2(f.time_of_day_factor),
        activity_impact: round2(f.activity_impact),
        adjusted_insulin: round2(c.adjusted_insulin),
        correction_insulin: round2(c.correction_insulin),
        health_multiplier: round2(f.medical_factor()),
        total: round1(c.total),
    }
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[inline]
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[inline]
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
