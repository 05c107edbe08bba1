//! Insulin dose recommendation
//!
//! The dose for a meal is built from three parts:
//!
//! | Part | Formula |
//! |------|---------|
//! | Nutrient insulin | `(carbs + protein·pf + fat·ff) / ICR` |
//! | Adjusted insulin | nutrient insulin × absorption × meal timing × time of day × medical × (1 + activity) |
//! | Correction | `(bg − target) / CF × medical` |
//!
//! The total is `max(0, adjusted + correction)`. The medical factor is the
//! product of active condition factors and the current factor of each active
//! medication, which follows its pharmacodynamic phase (see [`medication`]).
//!
//! # Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use glycemia::constants::PatientConstants;
//! use glycemia::dose::{recommend, DoseRequest};
//! use glycemia::nutrition::NutrientTotals;
//!
//! let at = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let constants = PatientConstants::neutral();
//! let request = DoseRequest::new(NutrientTotals::carbs(50.0), at).with_blood_sugar(200.0);
//!
//! let dose = recommend(Some(&constants), &request).unwrap();
//! assert_eq!(dose.breakdown.carb_insulin, 5.0);
//! assert_eq!(dose.breakdown.correction_insulin, 2.0);
//! assert_eq!(dose.total(), 7.0);
//! ```

mod calc;
pub mod factors;
pub mod medication;
mod traits;
mod types;


pub use calc::{calculate, correction, recommend};
pub use medication::{MedicationPhase, MedicationState};
pub use traits::InsulinDose;
pub use types::{
    ConditionEffect, DoseBreakdown, DoseFactors, DoseRecommendation, DoseRequest, HealthFactors,
    MedicationEffect,
};
