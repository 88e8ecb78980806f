//! Trapezoidal integration of sampled spectra

use thiserror::Error;

/// Errors that can occur during trapezoidal integration
#[derive(Debug, Error, PartialEq)]
pub enum TrapezoidError {
    #[error("Insufficient points for integration, need at least 2 points")]
    InsufficientPoints,

    #[error("Points must be in ascending order")]
    NotAscending,

    #[error("Abscissa and ordinate lengths differ ({0} vs {1})")]
    LengthMismatch(usize, usize),
}

/// Composite trapezoid rule over samples `(xs[i], ys[i])`.
///
/// Used to collapse a spectral flux curve (W/nm) into band power (W).
pub fn trap_integrate(xs: &[f64], ys: &[f64]) -> Result<f64, TrapezoidError> {
    if xs.len() != ys.len() {
        return Err(TrapezoidError::LengthMismatch(xs.len(), ys.len()));
    }

    if xs.len() < 2 {
        return Err(TrapezoidError::InsufficientPoints);
    }

    if xs.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(TrapezoidError::NotAscending);
    }

    // (x₂-x₁) × (f(x₁)+f(x₂))/2 per interval
    let total = xs
        .windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
        .sum();

    Ok(total)
}
