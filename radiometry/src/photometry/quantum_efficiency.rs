//! Quantum efficiency modeling for the image sensor

use std::path::Path;

use thiserror::Error;

use super::spectrum::{Band, SpectralCurve, SpectrumError};

/// Errors that can occur with quantum efficiency tables
#[derive(Debug, Error)]
pub enum QuantumEfficiencyError {
    #[error("Efficiency {value} at {wavelength_nm} nm is outside 0.0..=1.0")]
    OutOfRange { wavelength_nm: f64, value: f64 },

    #[error("Quantum efficiency table needs at least two samples")]
    TooFewSamples,

    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
}

/// Quantum efficiency of a sensor across a range of wavelengths
///
/// Stores the datasheet samples as given. Lookups between samples are
/// linear, lookups outside the tabulated band return 0.0.
#[derive(Debug, Clone)]
pub struct QuantumEfficiency {
    curve: SpectralCurve,
}

impl QuantumEfficiency {
    /// Create a QE model from wavelength and efficiency tables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vectors have different lengths or fewer than two samples
    /// - Wavelengths are not in ascending order
    /// - Any efficiency value is outside the range [0.0, 1.0]
    pub fn from_table(
        wavelengths: Vec<f64>,
        efficiencies: Vec<f64>,
    ) -> Result<Self, QuantumEfficiencyError> {
        let curve = SpectralCurve::new(wavelengths, efficiencies)?;
        Self::from_curve(curve)
    }

    /// Wrap an already validated spectral curve
    pub fn from_curve(curve: SpectralCurve) -> Result<Self, QuantumEfficiencyError> {
        if curve.len() < 2 {
            return Err(QuantumEfficiencyError::TooFewSamples);
        }

        if let Some((wavelength_nm, value)) = curve.iter().find(|(_, qe)| !(0.0..=1.0).contains(qe))
        {
            return Err(QuantumEfficiencyError::OutOfRange {
                wavelength_nm,
                value,
            });
        }

        Ok(Self { curve })
    }

    /// Load a headerless `wavelength_nm,qe` CSV with fractional efficiencies
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, QuantumEfficiencyError> {
        Self::from_curve(SpectralCurve::from_csv(path)?)
    }

    /// Quantum efficiency at `wavelength` nm, 0.0 outside the tabulated band
    pub fn at(&self, wavelength: f64) -> f64 {
        if !self.band().contains(wavelength) {
            return 0.0;
        }
        self.curve.value_at(wavelength).unwrap_or(0.0)
    }

    /// Number of tabulated samples
    pub fn len(&self) -> usize {
        self.curve.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curve.is_empty()
    }

    /// Wavelength range covered by the table
    pub fn band(&self) -> Band {
        self.curve.band()
    }

    /// The underlying samples
    pub fn curve(&self) -> &SpectralCurve {
        &self.curve
    }
}
