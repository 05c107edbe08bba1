use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::activity::Activity;
use super::food::FoodItem;
use crate::nutrition::{aggregate, NutrientTotals};

/// A logged meal
///
/// Meals are transient input: the engine reads them, aggregates their
/// nutrients and never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub timestamp: NaiveDateTime,
    /// Free-form meal type (`breakfast`, `lunch`, `dinner`, `snack`, ...)
    pub meal_type: String,
    #[serde(default)]
    pub food_items: Vec<FoodItem>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// Blood glucose measured at meal time, in mg/dL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_sugar: Option<f64>,
}

impl Meal {
    /// Aggregate nutrients across all food items
    pub fn nutrients(&self) -> NutrientTotals {
        aggregate(&self.food_items)
    }

    /// Reduce the meal to what the timeline projector needs
    pub fn to_record(&self) -> MealRecord {
        MealRecord {
            id: self.id.clone(),
            timestamp: self.timestamp,
            nutrients: self.nutrients(),
        }
    }
}

/// A processed meal: identity, time and nutrient summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub nutrients: NutrientTotals,
}

impl MealRecord {
    pub fn new(id: impl Into<String>, timestamp: NaiveDateTime, nutrients: NutrientTotals) -> Self {
        MealRecord {
            id: id.into(),
            timestamp,
            nutrients,
        }
    }
}

impl From<&Meal> for MealRecord {
    fn from(meal: &Meal) -> Self {
        meal.to_record()
    }
}
