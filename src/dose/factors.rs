//! Independent dose adjustment factors
//!
//! Every function here is a pure lookup over [`PatientConstants`]. A key that
//! is not configured (unknown meal type, absorption type, activity level or
//! hour) yields the neutral value rather than an error.

use chrono::NaiveDateTime;

use super::medication;
use super::types::{ConditionEffect, DoseFactors, DoseRequest, HealthFactors, MedicationEffect};
use crate::constants::PatientConstants;
use crate::data::{AbsorptionType, Activity};

/// Multiplier for the meal's absorption type
pub fn absorption_factor(constants: &PatientConstants, absorption_type: AbsorptionType) -> f64 {
    constants
        .absorption_modifier(absorption_type)
        .unwrap_or_else(|| {
            tracing::debug!(%absorption_type, "No absorption modifier configured, using 1.0");
            1.0
        })
}

/// Multiplier for the meal type
pub fn meal_timing_factor(constants: &PatientConstants, meal_type: &str) -> f64 {
    constants
        .meal_timing_factors
        .get(meal_type)
        .copied()
        .unwrap_or(1.0)
}

/// Multiplier of the first time-of-day bucket containing `hour`
pub fn time_of_day_factor(constants: &PatientConstants, hour: u32) -> f64 {
    constants
        .time_of_day_factors
        .iter()
        .find(|bucket| bucket.contains(hour))
        .map(|bucket| bucket.factor)
        .unwrap_or(1.0)
}

/// Fractional dose adjustment from activities
///
/// Sums `coefficient(level) × min(duration / 2h, 1)`. Positive values raise
/// the dose, negative values lower it.
pub fn activity_impact(constants: &PatientConstants, activities: &[Activity]) -> f64 {
    activities
        .iter()
        .map(|activity| {
            let coefficient = match constants.activity_coefficients.get(&activity.level) {
                Some(c) => *c,
                None => {
                    tracing::debug!(
                        level = activity.level,
                        "No coefficient for activity level, ignoring activity"
                    );
                    0.0
                }
            };
            coefficient * activity.duration_weight()
        })
        .sum()
}

/// Combined factor of active conditions and medications at `now`
///
/// Entries are visited in name order so the product is reproducible.
pub fn health_factors(constants: &PatientConstants, now: NaiveDateTime) -> HealthFactors {
    let mut conditions: Vec<_> = constants
        .disease_factors
        .iter()
        .filter(|(_, d)| d.active)
        .collect();
    conditions.sort_by(|a, b| a.0.cmp(b.0));

    let mut medications: Vec<_> = constants
        .medication_factors
        .iter()
        .filter(|(_, m)| m.active)
        .collect();
    medications.sort_by(|a, b| a.0.cmp(b.0));

    let mut multiplier = 1.0;

    let active_conditions = conditions
        .into_iter()
        .map(|(name, disease)| {
            multiplier *= disease.factor;
            ConditionEffect {
                name: name.clone(),
                factor: disease.factor,
            }
        })
        .collect();

    let active_medications = medications
        .into_iter()
        .map(|(name, profile)| {
            let schedule = constants.medication_schedules.get(name);
            let state = medication::evaluate(profile, schedule, now);
            tracing::debug!(
                medication = %name,
                phase = %state.phase,
                factor = state.factor,
                "Evaluated medication phase"
            );
            multiplier *= state.factor;
            MedicationEffect {
                name: name.clone(),
                factor: state.factor,
                phase: state.phase,
                hours_since_last_dose: state.hours_since_last_dose,
            }
        })
        .collect();

    HealthFactors {
        multiplier,
        active_conditions,
        active_medications,
    }
}

/// All adjustment factors for a dose request
pub fn dose_factors(constants: &PatientConstants, request: &DoseRequest) -> DoseFactors {
    DoseFactors {
        absorption_factor: absorption_factor(constants, request.nutrients.absorption_type),
        meal_timing_factor: meal_timing_factor(constants, &request.meal_type),
        time_of_day_factor: time_of_day_factor(constants, request.hour()),
        activity_impact: activity_impact(constants, &request.activities),
        health: health_factors(constants, request.at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        DiseaseFactor, MedicationFactor, MedicationSchedule, TimeOfDayFactor,
    };
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn unknown_keys_are_neutral() {
        let c = PatientConstants::neutral();
        assert_eq!(absorption_factor(&c, AbsorptionType::Fast), 1.0);
        assert_eq!(meal_timing_factor(&c, "second_breakfast"), 1.0);
        assert_eq!(time_of_day_factor(&c, 3), 1.0);
        assert_eq!(activity_impact(&c, &[Activity::new(2, 2.0)]), 0.0);
    }

    #[test]
    fn configured_lookups() {
        let c = PatientConstants::default().with_meal_timing_factor("breakfast", 1.2);
        assert_eq!(absorption_factor(&c, AbsorptionType::Slow), 0.8);
        assert_eq!(meal_timing_factor(&c, "breakfast"), 1.2);
    }

    #[test]
    fn first_matching_time_bucket_wins() {
        let c = PatientConstants::default()
            .with_time_of_day_factor(TimeOfDayFactor::new(4, 10, 1.2))
            .with_time_of_day_factor(TimeOfDayFactor::new(6, 22, 1.0))
            .with_time_of_day_factor(TimeOfDayFactor::new(22, 4, 0.9));
        assert_eq!(time_of_day_factor(&c, 7), 1.2);
        assert_eq!(time_of_day_factor(&c, 10), 1.0);
        assert_eq!(time_of_day_factor(&c, 23), 0.9);
        assert_eq!(time_of_day_factor(&c, 2), 0.9);
    }

    #[test]
    fn activity_impact_weights_by_duration() {
        let c = PatientConstants::default();
        // high activity for 1h: -0.1 × 0.5
        assert_relative_eq!(activity_impact(&c, &[Activity::new(1, 1.0)]), -0.05);
        // sleep for 8h saturates: +0.2
        assert_relative_eq!(activity_impact(&c, &[Activity::new(-2, 8.0)]), 0.2);
        assert_relative_eq!(
            activity_impact(&c, &[Activity::new(1, 2.0), Activity::new(-1, 2.0)]),
            0.0
        );
    }

    #[test]
    fn only_active_health_entries_participate() {
        let c = PatientConstants::default()
            .with_disease_factor("infection", DiseaseFactor::active(1.3))
            .with_disease_factor(
                "stress",
                DiseaseFactor {
                    factor: 2.0,
                    active: false,
                },
            )
            .with_medication("metformin", MedicationFactor::constant(0.9), None);

        let h = health_factors(&c, at(12));
        assert_relative_eq!(h.multiplier, 1.3 * 0.9);
        assert_eq!(h.active_conditions.len(), 1);
        assert_eq!(h.active_conditions[0].name, "infection");
        assert_eq!(h.active_medications.len(), 1);
        assert_eq!(h.active_medications[0].phase, medication::MedicationPhase::ConstantEffect);
    }

    #[test]
    fn medication_factor_follows_phase() {
        let start = at(0);
        let schedule = MedicationSchedule::new(start, start + chrono::Duration::days(7), &["08:00"]);
        let c = PatientConstants::default().with_medication(
            "prednisone",
            MedicationFactor::timed(1.5, 1.0, 3.0, 6.0),
            Some(schedule),
        );

        let ramp = health_factors(&c, at(8) + chrono::Duration::minutes(30));
        assert_relative_eq!(ramp.multiplier, 1.25);

        let peak = health_factors(&c, at(10));
        assert_relative_eq!(peak.multiplier, 1.5);

        let gone = health_factors(&c, at(20));
        assert_relative_eq!(gone.multiplier, 1.0);
        assert_eq!(gone.active_medications[0].phase, medication::MedicationPhase::NoEffect);
    }

    #[test]
    fn request_factors_use_request_hour() {
        let c = PatientConstants::default()
            .with_time_of_day_factor(TimeOfDayFactor::new(4, 10, 1.2));
        let nutrients = crate::nutrition::NutrientTotals::carbs(30.0);
        let morning = dose_factors(&c, &DoseRequest::new(nutrients, at(6)));
        let evening = dose_factors(&c, &DoseRequest::new(nutrients, at(19)));
        assert_eq!(morning.time_of_day_factor, 1.2);
        assert_eq!(evening.time_of_day_factor, 1.0);
        assert_eq!(morning.absorption_factor, 1.0);
    }
}
