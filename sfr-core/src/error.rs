/// Error types for the soil fertility pipeline
use thiserror::Error;

/// Main error type for nutrient analysis operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SoilError {
    /// Non-numeric or out-of-domain user input
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Field area must be strictly positive
    #[error("Invalid area: {value} ha (area must be greater than zero)")]
    InvalidArea { value: f64 },

    /// Sensor proxy value outside every calibration band
    #[error("Lux value {value} is out of the defined calibration ranges")]
    OutOfRange { value: f64 },

    /// Nutrient key missing from a reference table
    #[error("Unknown nutrient: {key}")]
    UnknownNutrient { key: String },

    /// Calibration file missing or malformed
    #[error("Failed to load calibration table: {0}")]
    CalibrationLoad(String),
}

impl SoilError {
    pub(crate) fn invalid_input(
        field: &'static str,
        value: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        SoilError::InvalidInput {
            field,
            value: value.into(),
            reason,
        }
    }
}

/// Type alias for Results using SoilError
pub type Result<T> = std::result::Result<T, SoilError>;
