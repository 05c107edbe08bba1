//! Projection over a logged day

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use glycemia::data::GlucoseStatus;
use glycemia::glycemic::{meal_curve, project, ProjectionOptions};
use glycemia::prelude::*;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 14)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn day_of_meals() -> Vec<MealRecord> {
    vec![
        Meal::builder("breakfast", at(7, 30))
            .grams("oats", 80.0, 60.0, 13.0, 7.0, AbsorptionType::Slow)
            .build()
            .to_record(),
        Meal::builder("lunch", at(12, 0))
            .grams("rice", 250.0, 28.0, 2.7, 0.3, AbsorptionType::Fast)
            .build()
            .to_record(),
        MealRecord::from(
            &Meal::builder("snack", at(13, 0))
                .grams("apple", 150.0, 14.0, 0.3, 0.2, AbsorptionType::Medium)
                .build(),
        ),
    ]
}

fn day_of_readings() -> Vec<GlucoseReading> {
    vec![
        GlucoseReading::actual(at(7, 25), 105.0),
        GlucoseReading::actual(at(11, 55), 118.0),
        GlucoseReading::actual(at(16, 0), 140.0),
    ]
}

#[test]
fn test_day_projection() {
    let constants = PatientConstants::default();
    let options = ProjectionOptions::default().with_future_horizon(3.0);
    let timeline = project(&day_of_meals(), &day_of_readings(), &constants, &options);

    // 07:25 → 16:00 + 3h, every 15 minutes
    assert_eq!(timeline.first().unwrap().timestamp, at(7, 25));
    assert_eq!(timeline.last().unwrap().timestamp, at(18, 55));
    assert_eq!(timeline.len(), 47);

    let actual: Vec<_> = timeline.iter().filter(|p| p.is_actual_reading).collect();
    assert_eq!(actual.len(), 3);
    assert_eq!(actual[0].blood_sugar, 105.0);
    assert_eq!(actual[1].blood_sugar, 118.0);
    assert_eq!(actual[2].blood_sugar, 140.0);

    assert!(timeline.iter().all(|p| p.blood_sugar >= 70.0));
    assert!(timeline.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn test_lunch_and_snack_overlap() {
    let constants = PatientConstants::default();
    let meals = day_of_meals();
    let timeline = project(&meals, &day_of_readings(), &constants, &ProjectionOptions::default());

    let p = timeline.iter().find(|p| p.timestamp == at(13, 40)).unwrap();
    assert!(!p.is_actual_reading);
    assert!(p.meal_effects.contains_key("lunch"));
    assert!(p.meal_effects.contains_key("snack"));
    // breakfast's six hours ended at 13:30
    assert!(!p.meal_effects.contains_key("breakfast"));

    let curves = ProjectionOptions::default().curve_options();
    let lunch = meal_curve(&constants, &meals[1].nutrients, &curves);
    let snack = meal_curve(&constants, &meals[2].nutrients, &curves);
    let expected = lunch.value_at(100.0 / 60.0) + snack.value_at(40.0 / 60.0);
    assert_relative_eq!(p.total_meal_effect, expected, epsilon = 1e-9);

    // baseline between 11:55 and 16:00, plus meals at 5 mg/dL per gram
    let baseline = 118.0 + (140.0 - 118.0) * (105.0 / 245.0);
    assert_relative_eq!(p.blood_sugar, baseline + expected * 5.0, epsilon = 1e-9);
    assert_eq!(p.status, GlucoseStatus::classify(p.blood_sugar, 100.0));
}

#[test]
fn test_projection_is_repeatable() {
    let constants = PatientConstants::default();
    let options = ProjectionOptions::default().with_future_horizon(2.0);
    let a = project(&day_of_meals(), &day_of_readings(), &constants, &options);
    let b = project(&day_of_meals(), &day_of_readings(), &constants, &options);
    assert_eq!(a, b);
}

#[test]
fn test_coarser_step() {
    let constants = PatientConstants::default();
    let options = ProjectionOptions::default().with_step_minutes(60);
    let timeline = project(&day_of_meals(), &day_of_readings(), &constants, &options);

    // 07:25, 08:25, ... 15:25; 16:00 is 35 min from 15:25 and not sampled
    assert_eq!(timeline.len(), 9);
    assert!(timeline[0].is_actual_reading);
    // 11:55 falls within 30 minutes of 11:25
    let noonish = timeline.iter().find(|p| p.timestamp == at(11, 25)).unwrap();
    assert!(noonish.is_actual_reading);
    assert_eq!(noonish.blood_sugar, 118.0);
}
