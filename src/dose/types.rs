//! Dose types: requests, factor sets and the itemized recommendation

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::medication::MedicationPhase;
use crate::constants::TimingGuideline;
use crate::data::{Activity, Meal};
use crate::nutrition::NutrientTotals;

// ============================================================================
// Request
// ============================================================================

/// Everything about a meal that the dose calculator needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseRequest {
    pub nutrients: NutrientTotals,
    /// Current blood glucose in mg/dL
    #[serde(default)]
    pub blood_sugar: Option<f64>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default = "default_meal_type")]
    pub meal_type: String,
    /// When the dose is taken; drives the time-of-day and medication factors
    pub at: NaiveDateTime,
}

fn default_meal_type() -> String {
    "normal".to_string()
}

impl DoseRequest {
    pub fn new(nutrients: NutrientTotals, at: NaiveDateTime) -> Self {
        DoseRequest {
            nutrients,
            blood_sugar: None,
            activities: Vec::new(),
            meal_type: default_meal_type(),
            at,
        }
    }

    /// Build a request from a logged meal
    pub fn from_meal(meal: &Meal) -> Self {
        DoseRequest {
            nutrients: meal.nutrients(),
            blood_sugar: meal.blood_sugar,
            activities: meal.activities.clone(),
            meal_type: meal.meal_type.clone(),
            at: meal.timestamp,
        }
    }

    pub fn with_blood_sugar(mut self, blood_sugar: f64) -> Self {
        self.blood_sugar = Some(blood_sugar);
        self
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    pub fn with_meal_type(mut self, meal_type: impl Into<String>) -> Self {
        self.meal_type = meal_type.into();
        self
    }

    /// Hour of day (0-23) of the request
    pub fn hour(&self) -> u32 {
        self.at.hour()
    }
}

// ============================================================================
// Factors
// ============================================================================

/// An active condition and the factor it contributed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionEffect {
    pub name: String,
    pub factor: f64,
}

/// An active medication and its state at dose time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationEffect {
    pub name: String,
    pub factor: f64,
    pub phase: MedicationPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_since_last_dose: Option<f64>,
}

/// Combined condition and medication adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFactors {
    /// Product of every active condition and medication factor
    pub multiplier: f64,
    pub active_conditions: Vec<ConditionEffect>,
    pub active_medications: Vec<MedicationEffect>,
}

impl Default for HealthFactors {
    fn default() -> Self {
        HealthFactors {
            multiplier: 1.0,
            active_conditions: Vec::new(),
            active_medications: Vec::new(),
        }
    }
}

/// The independent adjustment factors for one dose
///
/// All multipliers are neutral at 1.0. `activity_impact` is a fraction
/// (0.1 = +10%) that the calculator applies as `1 + activity_impact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseFactors {
    pub absorption_factor: f64,
    pub meal_timing_factor: f64,
    pub time_of_day_factor: f64,
    pub activity_impact: f64,
    pub health: HealthFactors,
}

impl DoseFactors {
    pub fn medical_factor(&self) -> f64 {
        self.health.multiplier
    }
}

impl Default for DoseFactors {
    fn default() -> Self {
        DoseFactors {
            absorption_factor: 1.0,
            meal_timing_factor: 1.0,
            time_of_day_factor: 1.0,
            activity_impact: 0.0,
            health: HealthFactors::default(),
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Itemized insulin dose
///
/// Items are rounded to 2 decimals and the total to 1 decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseBreakdown {
    pub carb_insulin: f64,
    pub protein_contribution: f64,
    pub fat_contribution: f64,
    pub base_insulin: f64,
    pub absorption_factor: f64,
    pub meal_timing_factor: f64,
    pub time_of_day_factor: f64,
    pub activity_impact: f64,
    pub adjusted_insulin: f64,
    pub correction_insulin: f64,
    pub health_multiplier: f64,
    pub total: f64,
}

/// A dose recommendation with its audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseRecommendation {
    pub breakdown: DoseBreakdown,
    pub active_conditions: Vec<ConditionEffect>,
    pub active_medications: Vec<MedicationEffect>,
    /// Injection timing for the meal's absorption type, if configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingGuideline>,
}

impl DoseRecommendation {
    /// Recommended units of insulin
    pub fn total(&self) -> f64 {
        self.breakdown.total
    }
}
