//! Error taxonomy for soil evaluation
//!
//! Absence of a property is not an error — absent properties are simply
//! excluded from scoring and recommendations. These types cover data that is
//! present but unusable, and the zero-usable-properties case.

use serde::Serialize;
use thiserror::Error;

/// Why a reported measurement could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
pub enum InvalidValueKind {
    /// Central value is NaN or infinite
    #[error("central value is not a finite number")]
    NonFinite,

    /// Standard error is negative, NaN, or infinite
    #[error("standard error is negative or not finite")]
    BadStandardError,

    /// Uncertainty interval has lower_bound > upper_bound
    #[error("lower bound exceeds upper bound")]
    InvertedBounds,

    /// Central value lies outside its own uncertainty interval
    #[error("central value lies outside its uncertainty interval")]
    OutsideBounds,
}

/// A property that was present in the input but carried unusable data.
///
/// Evaluation continues for the remaining properties; the offending property
/// is excluded from both scoring and recommendations and reported back to
/// the caller in the assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("invalid measurement for '{property}': {kind}")]
pub struct InvalidMeasurement {
    /// Machine name of the offending property
    pub property: String,
    pub kind: InvalidValueKind,
}

/// Engine-level failure conditions surfaced to callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidMeasurement(#[from] InvalidMeasurement),

    /// Zero usable properties in the input: no overall score is defined.
    /// Callers should render a "no analysis available" state, never a 0.
    #[error("no usable soil properties in input")]
    InsufficientData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_measurement_display() {
        let err = InvalidMeasurement {
            property: "ph".to_string(),
            kind: InvalidValueKind::NonFinite,
        };
        assert_eq!(
            err.to_string(),
            "invalid measurement for 'ph': central value is not a finite number"
        );
    }

    #[test]
    fn test_engine_error_from_invalid() {
        let err = InvalidMeasurement {
            property: "carbon_organic".to_string(),
            kind: InvalidValueKind::InvertedBounds,
        };
        let engine_err: EngineError = err.clone().into();
        assert_eq!(engine_err, EngineError::InvalidMeasurement(err));
    }
}
