//! Floating diffusion capacitance versus lithographic feature size
//!
//! The sense node capacitance shrinks with process feature size and sets the
//! charge-to-voltage conversion gain of the pixel.

use std::path::Path;

use thiserror::Error;

use crate::algo::misc::{interp, InterpError};
use crate::io::table::{load_two_column, TableError};

/// Elementary charge in coulombs
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Errors for floating diffusion lookups
#[derive(Debug, Error)]
pub enum FloatingDiffusionError {
    #[error("Capacitance must be positive, got {0} fF")]
    NonPositiveCapacitance(f64),

    #[error(transparent)]
    Interp(#[from] InterpError),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Capacitance samples over minimum lithographic feature size
#[derive(Debug, Clone)]
pub struct FloatingDiffusionCurve {
    /// Minimum feature size in microns
    feature_size_um: Vec<f64>,
    /// Floating diffusion capacitance in femtofarads
    capacitance_ff: Vec<f64>,
}

impl FloatingDiffusionCurve {
    pub fn new(feature_size_um: Vec<f64>, capacitance_ff: Vec<f64>) -> Self {
        Self {
            feature_size_um,
            capacitance_ff,
        }
    }

    /// Load `feature_um,capacitance_fF` rows
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, FloatingDiffusionError> {
        let (feature_size_um, capacitance_ff) = load_two_column(path)?;
        Ok(Self::new(feature_size_um, capacitance_ff))
    }

    /// Samples as `(feature_um, capacitance_fF)` points
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.feature_size_um
            .iter()
            .copied()
            .zip(self.capacitance_ff.iter().copied())
            .collect()
    }

    /// Capacitance in fF at `feature_um`, linearly interpolated
    pub fn capacitance_at(&self, feature_um: f64) -> Result<f64, FloatingDiffusionError> {
        Ok(interp(
            feature_um,
            &self.feature_size_um,
            &self.capacitance_ff,
        )?)
    }

    /// Conversion gain `q / C_fd` in μV per electron
    pub fn conversion_gain_uv_per_e(&self, feature_um: f64) -> Result<f64, FloatingDiffusionError> {
        let capacitance_ff = self.capacitance_at(feature_um)?;
        if capacitance_ff <= 0.0 {
            return Err(FloatingDiffusionError::NonPositiveCapacitance(
                capacitance_ff,
            ));
        }
        Ok(ELEMENTARY_CHARGE / (capacitance_ff * 1e-15) * 1e6)
    }
}
