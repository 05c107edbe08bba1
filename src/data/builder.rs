use chrono::NaiveDateTime;

use crate::data::*;

pub trait MealBuilderExt {
    fn builder(id: impl Into<String>, timestamp: NaiveDateTime) -> MealBuilder;
}

impl MealBuilderExt for Meal {
    fn builder(id: impl Into<String>, timestamp: NaiveDateTime) -> MealBuilder {
        MealBuilder {
            meal: Meal {
                id: id.into(),
                timestamp,
                meal_type: "normal".to_string(),
                food_items: Vec::new(),
                activities: Vec::new(),
                blood_sugar: None,
            },
        }
    }
}

pub struct MealBuilder {
    meal: Meal,
}

impl MealBuilder {
    pub fn meal_type(mut self, meal_type: impl Into<String>) -> Self {
        self.meal.meal_type = meal_type.into();
        self
    }

    pub fn item(mut self, item: FoodItem) -> Self {
        self.meal.food_items.push(item);
        self
    }

    /// Add a food given as grams with nutrients per 100 g
    pub fn grams(
        self,
        name: impl Into<String>,
        grams: f64,
        carbs: f64,
        protein: f64,
        fat: f64,
        absorption_type: AbsorptionType,
    ) -> Self {
        let details = FoodDetails::new(carbs, protein, fat)
            .with_absorption(absorption_type)
            .with_serving_size(ServingSize::new(100.0, "g"));
        self.item(FoodItem::new(name, Portion::weight(grams, "g"), details))
    }

    pub fn activity(mut self, level: i32, duration: f64) -> Self {
        self.meal.activities.push(Activity::new(level, duration));
        self
    }

    pub fn blood_sugar(mut self, value: f64) -> Self {
        self.meal.blood_sugar = Some(value);
        self
    }

    pub fn build(self) -> Meal {
        self.meal
    }
}
