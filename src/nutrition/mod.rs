//! Nutrient aggregation for meals
//!
//! Each food's nutrient values are declared per serving. A portion is scaled
//! against that serving through a conversion ratio computed in canonical units
//! (grams for weight, millilitres for volume), then summed across the meal.
//!
//! Aggregation never fails: missing serving sizes fall back to 100 g (or one
//! serving for count units) and zero serving sizes are floored at
//! [`MIN_SERVING_AMOUNT`].

use serde::{Deserialize, Serialize};

use crate::data::units::{to_canonical, Canonical};
use crate::data::{AbsorptionType, FoodItem, MeasurementType};

/// Floor for a serving size in canonical units, guarding the ratio divisor
pub const MIN_SERVING_AMOUNT: f64 = 1e-6;

/// Reference amount assumed when a food declares no serving size
pub const DEFAULT_SERVING_AMOUNT: f64 = 100.0;

const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Absolute nutrient content of a meal
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    #[serde(default)]
    pub calories: f64,
    /// Absorption type of the last food processed
    #[serde(default, deserialize_with = "AbsorptionType::deserialize_lenient")]
    pub absorption_type: AbsorptionType,
}

impl NutrientTotals {
    pub fn new(carbs: f64, protein: f64, fat: f64, absorption_type: AbsorptionType) -> Self {
        NutrientTotals {
            carbs,
            protein,
            fat,
            calories: calories(carbs, protein, fat),
            absorption_type,
        }
    }

    /// Only carbohydrates, with medium absorption
    pub fn carbs(carbs: f64) -> Self {
        Self::new(carbs, 0.0, 0.0, AbsorptionType::Medium)
    }
}

/// Energy content in kcal
pub fn calories(carbs: f64, protein: f64, fat: f64) -> f64 {
    carbs * KCAL_PER_GRAM_CARBS + protein * KCAL_PER_GRAM_PROTEIN + fat * KCAL_PER_GRAM_FAT
}

/// Sum the nutrients of `items`, scaling each by its portion
///
/// The absorption type of the result is that of the last item; an empty
/// meal reports [`AbsorptionType::Medium`].
pub fn aggregate(items: &[FoodItem]) -> NutrientTotals {
    let mut carbs = 0.0;
    let mut protein = 0.0;
    let mut fat = 0.0;
    let mut absorption_type = AbsorptionType::default();

    for item in items {
        let ratio = conversion_ratio(item);
        carbs += non_negative(item.details.carbs) * ratio;
        protein += non_negative(item.details.protein) * ratio;
        fat += non_negative(item.details.fat) * ratio;
        absorption_type = item.details.absorption_type;
    }

    NutrientTotals::new(carbs, protein, fat, absorption_type)
}

/// Ratio of the eaten portion to the food's declared serving
///
/// Weight portions are compared against the weight declaration of the
/// serving when one exists, volume portions against the volume declaration.
/// Across measurement systems 1 ml is taken as 1 g. Count portions
/// (`serving`, `slice`, ...) count servings unless the serving is declared in
/// the same unit. A weight or volume portion against a serving declared only
/// as a count falls back to the 100 g default reference.
pub fn conversion_ratio(item: &FoodItem) -> f64 {
    let portion = &item.portion;
    if !portion.amount.is_finite() || portion.amount <= 0.0 {
        tracing::warn!(
            food = %item.name,
            amount = portion.amount,
            "Non-positive portion amount, food contributes nothing"
        );
        return 0.0;
    }

    let eaten = to_canonical(portion.amount, &portion.unit);

    let Some(serving) = &item.details.serving_size else {
        let reference = if eaten.is_count() {
            1.0
        } else {
            DEFAULT_SERVING_AMOUNT
        };
        tracing::debug!(
            food = %item.name,
            reference,
            "No serving size declared, using default reference"
        );
        return eaten.value() / reference;
    };

    if let Canonical::Count(count) = eaten {
        if serving.unit.trim().eq_ignore_ascii_case(portion.unit.trim()) {
            return count / non_negative(serving.amount).max(MIN_SERVING_AMOUNT);
        }
        // a bare count is a number of servings
        return count;
    }

    let declared = (serving.amount, serving.unit.as_str());
    let candidates = match portion.measurement_type {
        MeasurementType::Weight => [serving.weight(), Some(declared)],
        MeasurementType::Volume => [Some(declared), serving.weight()],
    };
    // grams and millilitres never divide by a count of servings
    let reference = candidates
        .into_iter()
        .flatten()
        .map(|(amount, unit)| to_canonical(amount, unit))
        .find(|reference| !reference.is_count());

    let Some(reference) = reference else {
        tracing::warn!(
            food = %item.name,
            portion_unit = %portion.unit,
            serving_unit = %serving.unit,
            reference = DEFAULT_SERVING_AMOUNT,
            "Serving declared only as a count, using default reference"
        );
        return eaten.value() / DEFAULT_SERVING_AMOUNT;
    };

    eaten.value() / non_negative(reference.value()).max(MIN_SERVING_AMOUNT)
}

#[inline]
fn non_negative(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}
