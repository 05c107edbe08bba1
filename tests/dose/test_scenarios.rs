//! Reference dosing scenarios through the public API

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use glycemia::constants::{MedicationFactor, MedicationSchedule, PatientConstants};
use glycemia::dose::medication::{evaluate, phase_at};
use glycemia::dose::{calculate, DoseRequest, MedicationPhase};
use glycemia::{Activity, GlycemiaError, NutrientTotals};

fn lunch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 14)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap()
}

#[test]
fn test_carbs_only() {
    let constants = PatientConstants::neutral().with_insulin_to_carb_ratio(10.0);
    let request = DoseRequest::new(NutrientTotals::carbs(50.0), lunch());

    let dose = calculate(Some(&constants), &request).unwrap();

    // 50 g / 10 g per unit
    assert_eq!(dose.carb_insulin, 5.0);
    assert_eq!(dose.total, 5.0);
}

#[test]
fn test_correction_above_target() {
    let constants = PatientConstants::neutral()
        .with_target_glucose(100.0)
        .with_correction_factor(50.0);
    let request = DoseRequest::new(NutrientTotals::carbs(50.0), lunch()).with_blood_sugar(200.0);

    let dose = calculate(Some(&constants), &request).unwrap();

    // (200 - 100) / 50 = 2 units on top of 5
    assert_eq!(dose.correction_insulin, 2.0);
    assert_eq!(dose.total, 7.0);
}

#[test]
fn test_activity_fraction() {
    let mut constants = PatientConstants::neutral();
    constants.activity_coefficients.insert(-1, 0.1);
    let request = DoseRequest::new(NutrientTotals::carbs(50.0), lunch())
        .with_activity(Activity::new(-1, 2.0));

    let dose = calculate(Some(&constants), &request).unwrap();

    assert_relative_eq!(dose.activity_impact, 0.1);
    assert_relative_eq!(dose.adjusted_insulin, dose.base_insulin * 1.1, epsilon = 0.01);
}

#[test]
fn test_medication_ramp() {
    let profile = MedicationFactor::timed(1.5, 1.0, 3.0, 6.0);

    let (phase, factor) = phase_at(&profile, 0.5);
    assert_eq!(phase, MedicationPhase::RampingUp);
    assert_relative_eq!(factor, 1.25);

    // Same evaluation through a schedule: dose at 12:00, evaluated at 12:30
    let schedule = MedicationSchedule::new(
        lunch() - Duration::days(2),
        lunch() + Duration::days(2),
        &["12:00"],
    );
    let state = evaluate(&profile, Some(&schedule), lunch());
    assert_eq!(state.phase, MedicationPhase::RampingUp);
    assert_relative_eq!(state.factor, 1.25);
    assert_relative_eq!(state.hours_since_last_dose.unwrap(), 0.5);
}

#[test]
fn test_missing_constants() {
    let request = DoseRequest::new(NutrientTotals::carbs(50.0), lunch());
    let result = calculate(None, &request);
    assert!(matches!(result, Err(GlycemiaError::MissingConstants)));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Patient constants are required for dose calculation"
    );
}

#[test]
fn test_low_glucose_never_gives_negative_dose() {
    let constants = PatientConstants::default();
    let request = DoseRequest::new(NutrientTotals::carbs(5.0), lunch()).with_blood_sugar(45.0);

    let dose = calculate(Some(&constants), &request).unwrap();

    assert!(dose.correction_insulin < 0.0);
    assert_eq!(dose.total, 0.0);
}
