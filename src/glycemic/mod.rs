//! Glycemic impact curves and blood glucose timeline projection
//!
//! Each meal produces an impact curve from its carbohydrate-equivalent load
//! ([`generate_curve`], [`meal_curve`]). [`project`] lays those curves over
//! the patient's readings and walks the combined period at a fixed step:
//!
//! - an actual reading within half a step is reported as measured;
//! - otherwise the baseline is interpolated between the nearest readings
//!   (or the target without any), and the superposed meal effects are added,
//!   scaled to mg/dL and floored at the minimum safe glucose.
//!
//! # Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use glycemia::constants::PatientConstants;
//! use glycemia::data::{GlucoseReading, MealRecord};
//! use glycemia::glycemic::{project, ProjectionOptions};
//! use glycemia::nutrition::NutrientTotals;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let breakfast = day.and_hms_opt(8, 0, 0).unwrap();
//!
//! let meals = vec![MealRecord::new("breakfast", breakfast, NutrientTotals::carbs(40.0))];
//! let readings = vec![GlucoseReading::actual(breakfast, 110.0)];
//! let options = ProjectionOptions::default().with_future_horizon(4.0);
//!
//! let timeline = project(&meals, &readings, &PatientConstants::default(), &options);
//! assert_eq!(timeline.len(), 17);
//! assert!(timeline[0].is_actual_reading);
//! assert!(timeline.iter().all(|p| p.blood_sugar >= 70.0));
//! ```

mod curve;
mod timeline;
mod types;


pub use curve::{generate_curve, meal_curve, peak_hour};
pub use timeline::project;
pub use types::*;
