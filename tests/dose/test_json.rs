//! Dosing from JSON documents, as sent by an application surface

use glycemia::prelude::*;
use glycemia::GlycemiaError;

const CONSTANTS: &str = r#"{
    "insulin_to_carb_ratio": 10,
    "correction_factor": 50,
    "target_glucose": 100,
    "activity_coefficients": {"-2": 0.2, "-1": 0.1, "0": 0, "1": -0.1, "2": -0.2},
    "meal_timing_factors": {"lunch": 1.0},
    "disease_factors": {
        "infection": {"factor": 1.3, "active": false}
    },
    "medication_factors": {
        "metformin": {"factor": 1.0, "active": true}
    }
}"#;

const MEAL: &str = r#"{
    "id": "m-42",
    "timestamp": "2024-03-01T12:00:00",
    "mealType": "lunch",
    "foodItems": [
        {
            "name": "rice",
            "portion": {"amount": 1, "unit": "cup", "measurement_type": "volume"},
            "details": {
                "carbs": 45,
                "protein": 4,
                "fat": 0.5,
                "absorption_type": "fast",
                "serving_size": {"amount": 1, "unit": "cup", "w_amount": 158, "w_unit": "g"}
            }
        }
    ],
    "activities": [{"level": 1, "duration": "01:00"}],
    "bloodSugar": 180
}"#;

#[test]
fn test_dose_from_json_documents() {
    let constants = PatientConstants::from_json(CONSTANTS).unwrap();
    let meal: Meal = serde_json::from_str(MEAL).unwrap();

    assert_eq!(meal.activities[0].duration, 1.0);
    // unspecified fields keep their defaults
    assert_eq!(constants.protein_factor, 0.5);
    assert_eq!(constants.absorption_modifier(AbsorptionType::Fast), Some(1.2));

    let dose = meal.insulin_dose(Some(&constants)).unwrap();
    let b = &dose.breakdown;

    assert_eq!(b.carb_insulin, 4.5);
    assert_eq!(b.protein_contribution, 0.2);
    assert_eq!(b.fat_contribution, 0.01);
    assert_eq!(b.absorption_factor, 1.2);
    assert_eq!(b.base_insulin, 5.65);
    assert_eq!(b.activity_impact, -0.05);
    assert_eq!(b.adjusted_insulin, 5.37);
    assert_eq!(b.correction_insulin, 1.6);
    assert_eq!(b.total, 7.0);

    assert!(dose.active_conditions.is_empty());
    assert_eq!(dose.active_medications.len(), 1);
    assert_eq!(dose.timing.as_ref().unwrap().timing_minutes, 15);

    let out = serde_json::to_value(&dose).unwrap();
    assert_eq!(out["breakdown"]["adjustedInsulin"], 5.37);
    assert_eq!(out["activeMedications"][0]["phase"], "constant_effect");
}

#[test]
fn test_unknown_absorption_type_is_medium() {
    let details: FoodDetails =
        serde_json::from_str(r#"{"carbs": 10, "absorption_type": "glacial"}"#).unwrap();
    assert_eq!(details.absorption_type, AbsorptionType::Medium);
    assert_eq!(details.protein, 0.0);
}

#[test]
fn test_malformed_constants() {
    let err = PatientConstants::from_json("{\"insulin_to_carb_ratio\": \"ten\"}").unwrap_err();
    assert!(matches!(err, GlycemiaError::Json(_)));
}

#[test]
fn test_constants_round_trip_defaults() {
    let constants = PatientConstants::default();
    let json = constants.to_json().unwrap();
    assert_eq!(PatientConstants::from_json(&json).unwrap(), constants);
}
