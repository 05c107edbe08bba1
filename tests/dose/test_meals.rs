//! Dosing from logged meals built with Meal::builder()

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use glycemia::constants::{DiseaseFactor, TimeOfDayFactor};
use glycemia::prelude::*;

fn breakfast_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 14)
        .unwrap()
        .and_hms_opt(7, 45, 0)
        .unwrap()
}

fn oatmeal() -> FoodItem {
    FoodItem::new(
        "oatmeal",
        Portion::volume(1.0, "cup"),
        FoodDetails::new(27.0, 5.0, 3.0)
            .with_absorption(AbsorptionType::Slow)
            .with_serving_size(ServingSize::new(1.0, "cup").with_weight(234.0, "g")),
    )
}

#[test]
fn test_meal_aggregates_portions() {
    let meal = Meal::builder("b1", breakfast_time())
        .item(oatmeal())
        .grams("banana", 120.0, 23.0, 1.1, 0.3, AbsorptionType::Fast)
        .build();

    let totals = meal.nutrients();

    // 1 cup of oatmeal + 1.2 × 100 g of banana
    assert_relative_eq!(totals.carbs, 27.0 + 27.6, epsilon = 1e-9);
    assert_relative_eq!(totals.protein, 5.0 + 1.32, epsilon = 1e-9);
    assert_relative_eq!(totals.fat, 3.0 + 0.36, epsilon = 1e-9);
    assert_relative_eq!(
        totals.calories,
        4.0 * totals.carbs + 4.0 * totals.protein + 9.0 * totals.fat,
        epsilon = 1e-9
    );
    // last item wins
    assert_eq!(totals.absorption_type, AbsorptionType::Fast);
}

#[test]
fn test_weight_portion_uses_weight_declaration() {
    let mut bowl = oatmeal();
    bowl.portion = Portion::weight(117.0, "g");

    let meal = Meal::builder("b2", breakfast_time()).item(bowl).build();

    // 117 g of a 234 g serving
    assert_relative_eq!(meal.nutrients().carbs, 13.5, epsilon = 1e-9);
}

#[test]
fn test_meal_dose_with_time_of_day_and_condition() {
    let constants = PatientConstants::default()
        .with_time_of_day_factor(TimeOfDayFactor::new(5, 10, 1.2).named("dawn"))
        .with_disease_factor("flu", DiseaseFactor::active(1.1));

    let meal = Meal::builder("b3", breakfast_time())
        .meal_type("breakfast")
        .grams("toast", 60.0, 50.0, 0.0, 0.0, AbsorptionType::Medium)
        .blood_sugar(100.0)
        .build();

    let dose = meal.insulin_dose(Some(&constants)).unwrap();
    let b = &dose.breakdown;

    // 30 g carbs → 3 units, × 1.2 dawn × 1.1 flu
    assert_eq!(b.carb_insulin, 3.0);
    assert_eq!(b.time_of_day_factor, 1.2);
    assert_eq!(b.health_multiplier, 1.1);
    assert_relative_eq!(b.base_insulin, 3.96);
    assert_eq!(b.correction_insulin, 0.0);
    assert_eq!(dose.total(), 4.0);
    assert_eq!(dose.active_conditions[0].name, "flu");
    assert_eq!(dose.timing.unwrap().timing_minutes, 10);
}

#[test]
fn test_sleep_raises_dose() {
    let constants = PatientConstants::default();
    let base = Meal::builder("s1", breakfast_time())
        .grams("rice", 200.0, 28.0, 0.0, 0.0, AbsorptionType::Medium)
        .build();
    let mut after_sleep = base.clone();
    after_sleep.activities.push(Activity::new(-2, 8.0));

    let plain = base.insulin_dose(Some(&constants)).unwrap();
    let slept = after_sleep.insulin_dose(Some(&constants)).unwrap();

    assert_eq!(slept.breakdown.activity_impact, 0.2);
    assert!(slept.total() > plain.total());
}
