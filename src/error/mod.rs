use thiserror::Error;

/// Errors surfaced by the dose and projection engine
///
/// Only genuine preconditions are reported. Missing nutrient data, unknown
/// enum values and degenerate numbers fall back to neutral defaults instead.
#[derive(Error, Debug)]
pub enum GlycemiaError {
    /// No patient constants were supplied to a dose calculation
    #[error("Patient constants are required for dose calculation")]
    MissingConstants,

    /// A constant that is used as a divisor is not a positive finite number
    #[error("Invalid patient constant: {name} = {value}")]
    InvalidConstant { name: &'static str, value: f64 },

    /// A glucose reading failed validation
    #[error("Invalid glucose reading {value} mg/dL: {reason}")]
    InvalidReading { value: f64, reason: &'static str },

    /// A patient constants document could not be parsed
    #[error("Failed to parse patient constants: {0}")]
    Json(#[from] serde_json::Error),
}
