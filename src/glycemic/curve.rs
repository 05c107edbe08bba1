//! Meal impact curves
//!
//! The effect of a meal's carbohydrate-equivalent load `L` rises to its peak
//! at hour `p` and then decays exponentially over the rest of the window `d`:
//!
//! ```text
//! t ≤ p:      L · (t/p) · e^(1 − t/p)
//! p < t ≤ d:  L · e^(−(t − p) / (d − p))
//! ```
//!
//! The result is scaled by the absorption modifier of the meal.

use super::types::{CurveOptions, ImpactSample, MealImpactCurve};
use crate::constants::PatientConstants;
use crate::data::AbsorptionType;
use crate::nutrition::NutrientTotals;

const MIN_WINDOW_HOURS: f64 = 1e-9;

/// Hour at which a meal of this absorption type peaks
pub fn peak_hour(absorption_type: AbsorptionType) -> f64 {
    match absorption_type {
        AbsorptionType::Fast => 1.0,
        AbsorptionType::Slow => 2.0,
        _ => 1.5,
    }
}

/// Unscaled impact shape `hours` after a meal
fn shape(load: f64, peak: f64, duration: f64, hours: f64) -> f64 {
    if hours <= peak {
        let x = hours / peak;
        load * x * (1.0 - x).exp()
    } else {
        let decay_rate = 1.0 / (duration - peak).max(MIN_WINDOW_HOURS);
        load * (-(hours - peak) * decay_rate).exp()
    }
}

/// Sample the impact curve of a carbohydrate-equivalent `load`
///
/// Non-finite or negative loads and modifiers produce an all-zero curve.
pub fn generate_curve(
    load: f64,
    absorption_type: AbsorptionType,
    modifier: f64,
    options: &CurveOptions,
) -> MealImpactCurve {
    let load = if load.is_finite() { load.max(0.0) } else { 0.0 };
    let modifier = if modifier.is_finite() {
        modifier.max(0.0)
    } else {
        0.0
    };
    let peak = peak_hour(absorption_type);
    let duration = options.duration_hours();
    let step = options.step();

    let last_offset = (duration * 60.0 + 1e-9).floor() as u32;
    let samples = (0..=last_offset)
        .step_by(step as usize)
        .map(|offset_minutes| {
            let hours = f64::from(offset_minutes) / 60.0;
            ImpactSample {
                offset_minutes,
                hours_since_meal: hours,
                impact: (shape(load, peak, duration, hours) * modifier).max(0.0),
            }
        })
        .collect();

    MealImpactCurve {
        load,
        absorption_type,
        peak_hour: peak,
        duration_hours: duration,
        samples,
    }
}

/// Impact curve for a meal's nutrients under the patient's constants
///
/// The load is the carbohydrate equivalent of the nutrients and the modifier
/// the patient's absorption modifier (1.0 when not configured).
pub fn meal_curve(
    constants: &PatientConstants,
    nutrients: &NutrientTotals,
    options: &CurveOptions,
) -> MealImpactCurve {
    let load = constants.carb_equivalent(nutrients.carbs, nutrients.protein, nutrients.fat);
    let modifier = constants
        .absorption_modifier(nutrients.absorption_type)
        .unwrap_or(1.0);
    generate_curve(load, nutrients.absorption_type, modifier, options)
}
