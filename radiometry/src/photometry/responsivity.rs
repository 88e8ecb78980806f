//! Spectral radiant responsivity derived from quantum efficiency
//!
//! The sensor's responsivity curve follows its QE curve, weighted by
//! wavelength (photon energy) and pinned to the datasheet peak responsivity
//! at the calibration wavelength:
//!
//! ```text
//! R(λ) = λ · qe(λ) · Re_max / (λ_ref · qe_ref)
//! ```
//!
//! `R` is in V/(J/m²). Multiply by [`PLOT_SCALE_UJ_CM2`] for V/(μJ/cm²).

use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::quantum_efficiency::QuantumEfficiency;
use super::spectrum::{SpectralCurve, SpectrumError};
use crate::hardware::sensor::ResponsivityCalibration;

/// Converts V/(J/m²) into V/(μJ/cm²)
pub const PLOT_SCALE_UJ_CM2: f64 = 1e-2;

/// Errors that can occur while estimating responsivity
#[derive(Debug, Error)]
pub enum ResponsivityError {
    #[error("QE table has {samples} rows but the wavelength grid needs {grid}")]
    GridMismatch { grid: usize, samples: usize },

    #[error("Wavelength {0} nm is outside the QE table")]
    OutOfRange(f64),

    #[error("Calibration reference QE and wavelength must be positive")]
    DegenerateCalibration,

    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
}

/// How QE values are paired with grid wavelengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QeLookup {
    /// Grid point `i` takes the `i`-th QE row, whatever wavelength the row carries
    #[default]
    Positional,
    /// Grid point `w` takes the QE interpolated at `w` from the table's own wavelengths
    Interpolated,
}

/// Estimates responsivity over a wavelength grid from a QE table
#[derive(Debug, Clone, Default)]
pub struct ResponsivityEstimator {
    pub calibration: ResponsivityCalibration,
    pub lookup: QeLookup,
}

impl ResponsivityEstimator {
    pub fn new(calibration: ResponsivityCalibration, lookup: QeLookup) -> Self {
        Self {
            calibration,
            lookup,
        }
    }

    /// Responsivity for a single wavelength and QE value
    pub fn responsivity_at(&self, wavelength_nm: f64, qe: f64) -> f64 {
        let cal = &self.calibration;
        wavelength_nm * qe * cal.max_responsivity()
            / (cal.reference_wavelength_nm * cal.reference_qe)
    }

    /// Responsivity curve over `grid`
    ///
    /// # Errors
    ///
    /// * `GridMismatch` - positional lookup with fewer QE rows than grid points
    /// * `OutOfRange` - interpolated lookup at a wavelength outside the table
    /// * `DegenerateCalibration` - non-positive reference QE or wavelength
    pub fn estimate(
        &self,
        qe: &QuantumEfficiency,
        grid: &[f64],
    ) -> Result<SpectralCurve, ResponsivityError> {
        let cal = &self.calibration;
        if cal.reference_qe <= 0.0 || cal.reference_wavelength_nm <= 0.0 {
            return Err(ResponsivityError::DegenerateCalibration);
        }

        let efficiencies = self.lookup_efficiencies(qe, grid)?;
        let values = grid
            .iter()
            .zip(&efficiencies)
            .map(|(&w, &q)| {
                let r = self.responsivity_at(w, q);
                debug!("R({w:.1} nm) = {r:.3} V/(J/m²) from qe {q:.4}");
                r
            })
            .collect();

        Ok(SpectralCurve::new(grid.to_vec(), values)?)
    }

    fn lookup_efficiencies(
        &self,
        qe: &QuantumEfficiency,
        grid: &[f64],
    ) -> Result<Vec<f64>, ResponsivityError> {
        match self.lookup {
            QeLookup::Positional => {
                if qe.len() < grid.len() {
                    return Err(ResponsivityError::GridMismatch {
                        grid: grid.len(),
                        samples: qe.len(),
                    });
                }
                if qe.len() > grid.len() {
                    warn!(
                        "QE table has {} rows, only the first {} pair with the grid",
                        qe.len(),
                        grid.len()
                    );
                }
                Ok(qe.curve().values()[..grid.len()].to_vec())
            }
            QeLookup::Interpolated => {
                let band = qe.band();
                grid.iter()
                    .map(|&w| {
                        if band.contains(w) {
                            Ok(qe.at(w))
                        } else {
                            Err(ResponsivityError::OutOfRange(w))
                        }
                    })
                    .collect()
            }
        }
    }
}
