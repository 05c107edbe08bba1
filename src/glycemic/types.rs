//! Glycemic projection types
//!
//! - [`CurveOptions`] and [`ProjectionOptions`]: configuration
//! - [`MealImpactCurve`]: sampled effect of one meal
//! - [`TimelinePoint`]: one step of the projected timeline

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::PatientConstants;
use crate::data::{AbsorptionType, GlucoseStatus};

/// Longest time a meal is considered to affect blood glucose
pub const MAX_EFFECT_DURATION_HOURS: f64 = 6.0;

/// Default sampling step of curves and timelines
pub const DEFAULT_STEP_MINUTES: u32 = 15;

/// Floor applied to projected blood glucose, in mg/dL
pub const MINIMUM_SAFE_GLUCOSE: f64 = 70.0;

/// Longest future horizon a timeline is extended by, one week
pub const MAX_FUTURE_HORIZON_HOURS: f64 = 168.0;

// ============================================================================
// Configuration Types
// ============================================================================

/// Meal impact curve configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveOptions {
    /// Length of the effect window in hours (default: 6, never more than 6)
    pub effect_duration_hours: f64,
    /// Distance between samples in minutes (default: 15)
    pub step_minutes: u32,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            effect_duration_hours: MAX_EFFECT_DURATION_HOURS,
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }
}

impl CurveOptions {
    /// Set the effect window, capped at [`MAX_EFFECT_DURATION_HOURS`]
    pub fn with_effect_duration(mut self, hours: f64) -> Self {
        self.effect_duration_hours = hours;
        self
    }

    pub fn with_step_minutes(mut self, minutes: u32) -> Self {
        self.step_minutes = minutes;
        self
    }

    /// Effect window actually used: finite, non-negative and at most 6 h
    pub fn duration_hours(&self) -> f64 {
        if self.effect_duration_hours.is_finite() {
            self.effect_duration_hours.clamp(0.0, MAX_EFFECT_DURATION_HOURS)
        } else {
            MAX_EFFECT_DURATION_HOURS
        }
    }

    /// Sampling step actually used, at least one minute
    pub fn step(&self) -> u32 {
        self.step_minutes.max(1)
    }
}

/// Timeline projection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionOptions {
    /// Timeline step in minutes (default: 15)
    pub step_minutes: u32,

    /// Effect window of each meal in hours (default: 6, capped at 6)
    pub effect_duration_hours: f64,

    /// Hours to project past the last meal or reading (None = stop at the last event)
    ///
    /// Capped at [`MAX_FUTURE_HORIZON_HOURS`].
    pub future_horizon_hours: Option<f64>,

    /// mg/dL of blood glucose per gram of carbohydrate-equivalent impact
    ///
    /// `None` derives it from the patient: `correction_factor / insulin_to_carb_ratio`.
    pub impact_scaling_factor: Option<f64>,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP_MINUTES,
            effect_duration_hours: MAX_EFFECT_DURATION_HOURS,
            future_horizon_hours: None,
            impact_scaling_factor: None,
        }
    }
}

impl ProjectionOptions {
    pub fn with_step_minutes(mut self, minutes: u32) -> Self {
        self.step_minutes = minutes;
        self
    }

    pub fn with_effect_duration(mut self, hours: f64) -> Self {
        self.effect_duration_hours = hours;
        self
    }

    /// Extend the timeline `hours` past the last event
    pub fn with_future_horizon(mut self, hours: f64) -> Self {
        self.future_horizon_hours = Some(hours);
        self
    }

    pub fn with_impact_scaling_factor(mut self, mgdl_per_gram: f64) -> Self {
        self.impact_scaling_factor = Some(mgdl_per_gram);
        self
    }

    /// Curve configuration matching this projection
    pub fn curve_options(&self) -> CurveOptions {
        CurveOptions {
            effect_duration_hours: self.effect_duration_hours,
            step_minutes: self.step_minutes,
        }
    }

    /// Scaling factor in use for `constants`
    ///
    /// Falls back to 0 when neither an explicit factor nor a usable patient
    /// ratio is available, which leaves the baseline unchanged.
    pub fn scaling_for(&self, constants: &PatientConstants) -> f64 {
        let derived = || {
            let ratio = constants.insulin_to_carb_ratio;
            if ratio.is_finite() && ratio > 0.0 {
                constants.correction_factor / ratio
            } else {
                0.0
            }
        };
        let scaling = self.impact_scaling_factor.unwrap_or_else(derived);
        if scaling.is_finite() {
            scaling
        } else {
            0.0
        }
    }

    /// Horizon actually applied, in hours
    pub(crate) fn horizon_hours(&self) -> f64 {
        match self.future_horizon_hours {
            Some(h) if h > MAX_FUTURE_HORIZON_HOURS => {
                tracing::warn!(
                    requested = h,
                    cap = MAX_FUTURE_HORIZON_HOURS,
                    "Future horizon too long, capping"
                );
                MAX_FUTURE_HORIZON_HOURS
            }
            Some(h) if h.is_finite() && h > 0.0 => h,
            _ => 0.0,
        }
    }
}

// ============================================================================
// Curve
// ============================================================================

/// One sample of a meal impact curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSample {
    /// Minutes after the meal
    pub offset_minutes: u32,
    pub hours_since_meal: f64,
    /// Carbohydrate-equivalent grams acting at this offset, never negative
    pub impact: f64,
}

/// Sampled glycemic impact of a single meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealImpactCurve {
    /// Carbohydrate-equivalent load in grams
    pub load: f64,
    pub absorption_type: AbsorptionType,
    pub peak_hour: f64,
    pub duration_hours: f64,
    pub samples: Vec<ImpactSample>,
}

impl MealImpactCurve {
    /// Impact `hours` after the meal, linearly interpolated between samples
    ///
    /// Zero before the meal and after the effect window.
    pub fn value_at(&self, hours: f64) -> f64 {
        if !hours.is_finite() || hours < 0.0 || hours > self.duration_hours {
            return 0.0;
        }
        let Some(upper) = self.samples.iter().position(|s| s.hours_since_meal >= hours) else {
            return self.samples.last().map_or(0.0, |s| s.impact);
        };
        if upper == 0 {
            return self.samples[0].impact;
        }

        let a = &self.samples[upper - 1];
        let b = &self.samples[upper];
        let span = b.hours_since_meal - a.hours_since_meal;
        if span.abs() < 1e-10 {
            a.impact
        } else {
            a.impact + (b.impact - a.impact) * (hours - a.hours_since_meal) / span
        }
    }

    /// Largest sampled impact and the hour it occurs
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .max_by(|a, b| a.impact.total_cmp(&b.impact))
            .map(|s| (s.hours_since_meal, s.impact))
    }

    /// Rectangle-rule area under the samples, in gram-hours
    pub fn area(&self) -> f64 {
        let step_hours = match self.samples.as_slice() {
            [first, second, ..] => second.hours_since_meal - first.hours_since_meal,
            _ => return 0.0,
        };
        self.samples.iter().map(|s| s.impact).sum::<f64>() * step_hours
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ============================================================================
// Timeline
// ============================================================================

/// One step of a projected blood glucose timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub timestamp: NaiveDateTime,
    /// Baseline interpolated from the surrounding actual readings, without meal effects
    pub estimated_blood_sugar: f64,
    /// Baseline plus the scaled meal effect, floored at [`MINIMUM_SAFE_GLUCOSE`]
    ///
    /// At an actual reading this is the measured value, which is reported
    /// as is even below the floor.
    pub blood_sugar: f64,
    /// Summed carbohydrate-equivalent impact of every meal in its window
    pub total_meal_effect: f64,
    /// Impact per meal id, for meals whose window covers this step
    pub meal_effects: BTreeMap<String, f64>,
    pub is_actual_reading: bool,
    pub status: GlucoseStatus,
}
