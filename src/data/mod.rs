pub mod activity;
pub mod builder;
pub mod food;
pub mod meal;
pub mod reading;
pub mod units;
pub use activity::Activity;
pub use food::*;
pub use meal::{Meal, MealRecord};
pub use reading::{GlucoseReading, GlucoseStatus};
pub use units::MeasurementType;
