//! Extension trait for dose recommendations on logged meals
//!
//! ```rust,ignore
//! use glycemia::prelude::*;
//!
//! let recommendation = meal.insulin_dose(Some(&constants))?;
//! println!("Take {:.1} units", recommendation.total());
//! ```

use super::calc::recommend;
use super::types::{DoseRecommendation, DoseRequest};
use crate::constants::PatientConstants;
use crate::data::Meal;
use crate::error::GlycemiaError;

/// Dose recommendation directly from meal data
pub trait InsulinDose {
    /// Recommend a dose using the meal's foods, activities, blood glucose,
    /// meal type and time
    fn insulin_dose(
        &self,
        constants: Option<&PatientConstants>,
    ) -> Result<DoseRecommendation, GlycemiaError>;
}

impl InsulinDose for Meal {
    fn insulin_dose(
        &self,
        constants: Option<&PatientConstants>,
    ) -> Result<DoseRecommendation, GlycemiaError> {
        recommend(constants, &DoseRequest::from_meal(self))
    }
}
