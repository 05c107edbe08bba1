use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::units::MeasurementType;

/// Qualitative digestion speed of a food
///
/// Controls both the absorption modifier applied to the dose and the shape of
/// the glycemic impact curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsorptionType {
    VerySlow,
    Slow,
    #[default]
    Medium,
    Fast,
    VeryFast,
}

impl AbsorptionType {
    /// The key used for this type in patient constant maps
    pub fn as_str(&self) -> &'static str {
        match self {
            AbsorptionType::VerySlow => "very_slow",
            AbsorptionType::Slow => "slow",
            AbsorptionType::Medium => "medium",
            AbsorptionType::Fast => "fast",
            AbsorptionType::VeryFast => "very_fast",
        }
    }

    /// Deserialize an absorption type, mapping unknown or null values to `Medium`
    pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw {
            None => AbsorptionType::default(),
            Some(s) => s.parse().unwrap_or_else(|_| {
                tracing::warn!(absorption_type = %s, "Unknown absorption type, using medium");
                AbsorptionType::default()
            }),
        })
    }
}

impl fmt::Display for AbsorptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbsorptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "very_slow" => Ok(AbsorptionType::VerySlow),
            "slow" => Ok(AbsorptionType::Slow),
            "medium" => Ok(AbsorptionType::Medium),
            "fast" => Ok(AbsorptionType::Fast),
            "very_fast" => Ok(AbsorptionType::VeryFast),
            other => Err(format!("unknown absorption type: {other}")),
        }
    }
}

/// The amount of a food that was eaten
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portion {
    pub amount: f64,
    pub unit: String,
    #[serde(default)]
    pub measurement_type: MeasurementType,
}

impl Portion {
    pub fn new(amount: f64, unit: impl Into<String>, measurement_type: MeasurementType) -> Self {
        Portion {
            amount,
            unit: unit.into(),
            measurement_type,
        }
    }

    /// A weight portion
    pub fn weight(amount: f64, unit: impl Into<String>) -> Self {
        Self::new(amount, unit, MeasurementType::Weight)
    }

    /// A volume portion
    pub fn volume(amount: f64, unit: impl Into<String>) -> Self {
        Self::new(amount, unit, MeasurementType::Volume)
    }
}

/// Declared serving size of a food
///
/// Foods carry a volume (or household) declaration in `amount`/`unit` and an
/// optional weight declaration in `w_amount`/`w_unit`, so that both measuring
/// styles can be scaled against the same nutrient values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingSize {
    pub amount: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w_unit: Option<String>,
}

impl ServingSize {
    pub fn new(amount: f64, unit: impl Into<String>) -> Self {
        ServingSize {
            amount,
            unit: unit.into(),
            w_amount: None,
            w_unit: None,
        }
    }

    /// Attach a weight declaration to this serving size
    pub fn with_weight(mut self, amount: f64, unit: impl Into<String>) -> Self {
        self.w_amount = Some(amount);
        self.w_unit = Some(unit.into());
        self
    }

    /// The weight declaration, if present
    pub fn weight(&self) -> Option<(f64, &str)> {
        match (self.w_amount, self.w_unit.as_deref()) {
            (Some(amount), Some(unit)) => Some((amount, unit)),
            _ => None,
        }
    }
}

/// Nutrient content of one serving of a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodDetails {
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default, deserialize_with = "AbsorptionType::deserialize_lenient")]
    pub absorption_type: AbsorptionType,
    #[serde(default)]
    pub serving_size: Option<ServingSize>,
}

impl FoodDetails {
    pub fn new(carbs: f64, protein: f64, fat: f64) -> Self {
        FoodDetails {
            carbs,
            protein,
            fat,
            absorption_type: AbsorptionType::default(),
            serving_size: None,
        }
    }

    pub fn with_absorption(mut self, absorption_type: AbsorptionType) -> Self {
        self.absorption_type = absorption_type;
        self
    }

    pub fn with_serving_size(mut self, serving_size: ServingSize) -> Self {
        self.serving_size = Some(serving_size);
        self
    }
}

/// A food eaten as part of a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub portion: Portion,
    pub details: FoodDetails,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, portion: Portion, details: FoodDetails) -> Self {
        FoodItem {
            name: name.into(),
            portion,
            details,
        }
    }
}
