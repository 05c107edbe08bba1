use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::GlycemiaError;

/// Highest blood glucose value (mg/dL) accepted as a plausible reading
pub const MAX_PLAUSIBLE_GLUCOSE: f64 = 600.0;

/// A blood glucose measurement or estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseReading {
    pub timestamp: NaiveDateTime,
    /// Blood glucose in mg/dL
    pub value: f64,
    #[serde(default = "default_actual")]
    pub is_actual_reading: bool,
}

fn default_actual() -> bool {
    true
}

impl GlucoseReading {
    /// A measured reading
    pub fn actual(timestamp: NaiveDateTime, value: f64) -> Self {
        GlucoseReading {
            timestamp,
            value,
            is_actual_reading: true,
        }
    }

    /// An estimated value that should not anchor the baseline
    pub fn estimated(timestamp: NaiveDateTime, value: f64) -> Self {
        GlucoseReading {
            timestamp,
            value,
            is_actual_reading: false,
        }
    }

    /// Check that the value is a plausible blood glucose measurement
    pub fn validate(&self) -> Result<(), GlycemiaError> {
        validate_mgdl(self.value)
    }
}

/// Check that a blood glucose value in mg/dL is plausible
pub fn validate_mgdl(value: f64) -> Result<(), GlycemiaError> {
    let reason = if !value.is_finite() {
        "value is not a number"
    } else if value < 0.0 {
        "blood sugar cannot be negative"
    } else if value > MAX_PLAUSIBLE_GLUCOSE {
        "blood sugar value seems too high"
    } else {
        return Ok(());
    };
    Err(GlycemiaError::InvalidReading { value, reason })
}

/// Blood glucose relative to the patient's target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseStatus {
    /// Below 70% of target
    Low,
    Normal,
    /// Above 130% of target
    High,
}

impl GlucoseStatus {
    pub fn classify(value: f64, target: f64) -> Self {
        if value < target * 0.7 {
            GlucoseStatus::Low
        } else if value > target * 1.3 {
            GlucoseStatus::High
        } else {
            GlucoseStatus::Normal
        }
    }
}

impl fmt::Display for GlucoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GlucoseStatus::Low => "low",
            GlucoseStatus::Normal => "normal",
            GlucoseStatus::High => "high",
        };
        f.write_str(s)
    }
}
