//! Patient constants
//!
//! [`PatientConstants`] carries every per-patient ratio and adjustment table
//! the engine reads. It is loaded once per session (usually from JSON) and
//! passed by reference into each calculation; nothing in the crate caches or
//! mutates it.
//!
//! Fields missing from a document take the defaults below, so a document only
//! needs to list what differs for the patient:
//!
//! ```rust
//! use glycemia::constants::PatientConstants;
//!
//! let constants = PatientConstants::from_json(r#"{"insulin_to_carb_ratio": 12}"#).unwrap();
//! assert_eq!(constants.insulin_to_carb_ratio, 12.0);
//! assert_eq!(constants.correction_factor, 50.0);
//! ```

use std::collections::HashMap;
use std::io::Read;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::data::AbsorptionType;
use crate::error::GlycemiaError;

/// Per-patient dosing constants and adjustment tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientConstants {
    /// Grams of carbohydrate covered by one unit of insulin
    pub insulin_to_carb_ratio: f64,
    /// mg/dL drop produced by one unit of insulin
    pub correction_factor: f64,
    /// Target blood glucose in mg/dL
    pub target_glucose: f64,
    /// Carbohydrate-equivalent grams per gram of protein
    pub protein_factor: f64,
    /// Carbohydrate-equivalent grams per gram of fat
    pub fat_factor: f64,
    /// Fractional dose adjustment per activity level
    pub activity_coefficients: HashMap<i32, f64>,
    /// Dose and curve multiplier per absorption type
    pub absorption_modifiers: HashMap<String, f64>,
    /// Dose multiplier per meal type
    pub meal_timing_factors: HashMap<String, f64>,
    /// Dose multipliers by hour of day, first match wins
    pub time_of_day_factors: Vec<TimeOfDayFactor>,
    pub disease_factors: HashMap<String, DiseaseFactor>,
    pub medication_factors: HashMap<String, MedicationFactor>,
    pub medication_schedules: HashMap<String, MedicationSchedule>,
    /// When to inject relative to the meal, per absorption type
    pub insulin_timing_guidelines: HashMap<String, TimingGuideline>,
}

impl Default for PatientConstants {
    fn default() -> Self {
        Self {
            insulin_to_carb_ratio: 10.0,
            correction_factor: 50.0,
            target_glucose: 100.0,
            protein_factor: 0.5,
            fat_factor: 0.2,
            activity_coefficients: HashMap::from([
                (-2, 0.2),  // sleep
                (-1, 0.1),  // very low activity
                (0, 0.0),   // normal activity
                (1, -0.1),  // high activity
                (2, -0.2),  // vigorous activity
            ]),
            absorption_modifiers: [
                (AbsorptionType::VerySlow, 0.6),
                (AbsorptionType::Slow, 0.8),
                (AbsorptionType::Medium, 1.0),
                (AbsorptionType::Fast, 1.2),
                (AbsorptionType::VeryFast, 1.4),
            ]
            .into_iter()
            .map(|(t, m)| (t.as_str().to_string(), m))
            .collect(),
            meal_timing_factors: HashMap::new(),
            time_of_day_factors: Vec::new(),
            disease_factors: HashMap::new(),
            medication_factors: HashMap::new(),
            medication_schedules: HashMap::new(),
            insulin_timing_guidelines: default_timing_guidelines(),
        }
    }
}

fn default_timing_guidelines() -> HashMap<String, TimingGuideline> {
    [
        (AbsorptionType::VerySlow, 0, "Take insulin at the start of meal"),
        (AbsorptionType::Slow, 5, "Take insulin 5 minutes before meal"),
        (AbsorptionType::Medium, 10, "Take insulin 10 minutes before meal"),
        (AbsorptionType::Fast, 15, "Take insulin 15 minutes before meal"),
        (AbsorptionType::VeryFast, 20, "Take insulin 20 minutes before meal"),
    ]
    .into_iter()
    .map(|(t, minutes, description)| {
        (
            t.as_str().to_string(),
            TimingGuideline {
                timing_minutes: minutes,
                description: description.to_string(),
            },
        )
    })
    .collect()
}

impl PatientConstants {
    /// Parse constants from a JSON document, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, GlycemiaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read constants from a JSON source, filling missing fields with defaults
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GlycemiaError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String, GlycemiaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Absorption modifier for `absorption_type`, if configured
    pub fn absorption_modifier(&self, absorption_type: AbsorptionType) -> Option<f64> {
        self.absorption_modifiers
            .get(absorption_type.as_str())
            .copied()
    }

    /// Injection timing guideline for `absorption_type`, if configured
    pub fn timing_guideline(&self, absorption_type: AbsorptionType) -> Option<&TimingGuideline> {
        self.insulin_timing_guidelines.get(absorption_type.as_str())
    }

    /// Carbohydrate-equivalent load of a nutrient mix
    pub fn carb_equivalent(&self, carbs: f64, protein: f64, fat: f64) -> f64 {
        carbs + protein * self.protein_factor + fat * self.fat_factor
    }

    pub fn with_insulin_to_carb_ratio(mut self, ratio: f64) -> Self {
        self.insulin_to_carb_ratio = ratio;
        self
    }

    pub fn with_correction_factor(mut self, factor: f64) -> Self {
        self.correction_factor = factor;
        self
    }

    pub fn with_target_glucose(mut self, target: f64) -> Self {
        self.target_glucose = target;
        self
    }

    pub fn with_meal_timing_factor(mut self, meal_type: impl Into<String>, factor: f64) -> Self {
        self.meal_timing_factors.insert(meal_type.into(), factor);
        self
    }

    pub fn with_time_of_day_factor(mut self, bucket: TimeOfDayFactor) -> Self {
        self.time_of_day_factors.push(bucket);
        self
    }

    pub fn with_disease_factor(mut self, condition: impl Into<String>, factor: DiseaseFactor) -> Self {
        self.disease_factors.insert(condition.into(), factor);
        self
    }

    pub fn with_medication(
        mut self,
        name: impl Into<String>,
        factor: MedicationFactor,
        schedule: Option<MedicationSchedule>,
    ) -> Self {
        let name = name.into();
        if let Some(schedule) = schedule {
            self.medication_schedules.insert(name.clone(), schedule);
        }
        self.medication_factors.insert(name, factor);
        self
    }

    /// Patient constants where every adjustment table is neutral
    ///
    /// Keeps the ratios and target of the defaults, but with zero protein/fat
    /// factors, no activity coefficients and no absorption modifiers.
    pub fn neutral() -> Self {
        Self {
            protein_factor: 0.0,
            fat_factor: 0.0,
            activity_coefficients: HashMap::new(),
            absorption_modifiers: HashMap::new(),
            ..Default::default()
        }
    }
}

/// Dose multiplier applied during a range of hours
///
/// `hours` is the half-open range `[start, end)`. A bucket whose start is
/// later than its end spans midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDayFactor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub hours: [u32; 2],
    pub factor: f64,
}

impl TimeOfDayFactor {
    pub fn new(start: u32, end: u32, factor: f64) -> Self {
        TimeOfDayFactor {
            name: None,
            hours: [start, end],
            factor,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn contains(&self, hour: u32) -> bool {
        let [start, end] = self.hours;
        if start <= end {
            start <= hour && hour < end
        } else {
            hour >= start || hour < end
        }
    }
}

/// Insulin sensitivity effect of a medical condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseFactor {
    #[serde(default = "neutral_factor")]
    pub factor: f64,
    #[serde(default)]
    pub active: bool,
}

impl DiseaseFactor {
    pub fn active(factor: f64) -> Self {
        DiseaseFactor {
            factor,
            active: true,
        }
    }
}

/// Pharmacodynamic profile of a medication
///
/// For duration-based medications the effect ramps up linearly until
/// `onset_hours`, holds until `peak_hours` and tapers back to neutral by
/// `duration_hours`, all measured from the most recent scheduled dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationFactor {
    #[serde(default = "neutral_factor")]
    pub factor: f64,
    #[serde(default)]
    pub onset_hours: f64,
    #[serde(default)]
    pub peak_hours: f64,
    #[serde(default)]
    pub duration_hours: f64,
    #[serde(default)]
    pub duration_based: bool,
    #[serde(default)]
    pub active: bool,
}

impl MedicationFactor {
    /// An active medication whose effect is constant while it is taken
    pub fn constant(factor: f64) -> Self {
        MedicationFactor {
            factor,
            onset_hours: 0.0,
            peak_hours: 0.0,
            duration_hours: 0.0,
            duration_based: false,
            active: true,
        }
    }

    /// An active medication whose effect follows each scheduled dose
    pub fn timed(factor: f64, onset_hours: f64, peak_hours: f64, duration_hours: f64) -> Self {
        MedicationFactor {
            factor,
            onset_hours,
            peak_hours,
            duration_hours,
            duration_based: true,
            active: true,
        }
    }
}

fn neutral_factor() -> f64 {
    1.0
}

/// When a medication is taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationSchedule {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// Daily dose times as `"HH:MM"`
    #[serde(default)]
    pub daily_times: Vec<String>,
}

impl MedicationSchedule {
    pub fn new(start_date: NaiveDateTime, end_date: NaiveDateTime, daily_times: &[&str]) -> Self {
        MedicationSchedule {
            start_date,
            end_date,
            daily_times: daily_times.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Parsed daily dose times, sorted; unparseable entries are skipped
    pub fn dose_times(&self) -> Vec<NaiveTime> {
        let mut times: Vec<NaiveTime> = self
            .daily_times
            .iter()
            .filter_map(|raw| {
                let parsed = NaiveTime::parse_from_str(raw.trim(), "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"));
                match parsed {
                    Ok(t) => Some(t),
                    Err(e) => {
                        tracing::warn!(time = %raw, error = %e, "Skipping unparseable dose time");
                        None
                    }
                }
            })
            .collect();
        times.sort();
        times
    }
}

/// When to inject relative to a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingGuideline {
    /// Minutes before the meal
    pub timing_minutes: u32,
    pub description: String,
}
