pub mod constants;
pub mod data;
pub mod dose;
pub mod error;
pub mod glycemic;
pub mod nutrition;

//extension traits
pub use crate::data::builder::MealBuilderExt;
pub use crate::dose::InsulinDose;

pub use crate::constants::PatientConstants;
pub use crate::data::*;
pub use crate::dose::{calculate, recommend, DoseBreakdown, DoseRecommendation, DoseRequest};
pub use crate::glycemic::{project, ProjectionOptions, TimelinePoint};
pub use crate::nutrition::NutrientTotals;
pub use error::GlycemiaError;

pub mod prelude {
    pub mod data {
        pub use crate::data::{
            Activity, FoodDetails, FoodItem, GlucoseReading, Meal, MealRecord, Portion,
            ServingSize,
        };
    }
    pub mod dose {
        pub use crate::dose::{
            calculate, correction, factors, medication::MedicationPhase, recommend,
            DoseBreakdown, DoseFactors, DoseRecommendation, DoseRequest,
        };
    }
    pub mod glycemic {
        pub use crate::glycemic::{
            generate_curve, meal_curve, project, CurveOptions, MealImpactCurve,
            ProjectionOptions, TimelinePoint,
        };
    }

    //extension traits
    pub use crate::data::builder::MealBuilderExt;
    pub use crate::dose::InsulinDose;
    pub use crate::data::*;

    pub use crate::constants::*;
    pub use crate::error::GlycemiaError;
    pub use crate::nutrition::NutrientTotals;
}
