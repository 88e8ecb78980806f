//! Domain checks for the elementwise divisions in the radiometric chain

use thiserror::Error;

/// A quantity left the domain where the radiometric formulas are defined
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("Responsivity {value} at {wavelength_nm} nm must be positive")]
    NonPositiveResponsivity { wavelength_nm: f64, value: f64 },

    #[error("Transmittance {value} at {wavelength_nm} nm must be positive")]
    NonPositiveTransmittance { wavelength_nm: f64, value: f64 },

    #[error("Exposure time must be positive")]
    NonPositiveExposure,

    #[error("{quantity} must be finite, got {value}")]
    NonFinite { quantity: &'static str, value: f64 },

    #[error("Exposure list is empty")]
    EmptyExposureList,

    #[error("Expected {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Fail unless `value` is finite
pub fn require_finite(quantity: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::NonFinite { quantity, value })
    }
}

/// `numerator / denominator`, refusing zero, negative or non-finite denominators
///
/// `on_bad` builds the error from the offending denominator.
pub fn checked_divide<F>(numerator: f64, denominator: f64, on_bad: F) -> Result<f64, DomainError>
where
    F: FnOnce(f64) -> DomainError,
{
    if denominator.is_finite() && denominator > 0.0 {
        Ok(numerator / denominator)
    } else {
        Err(on_bad(denominator))
    }
}
