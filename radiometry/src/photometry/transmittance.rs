//! Optical losses between the light source and the sensor
//!
//! The tunable filter (LCTF) and the lens each pass only a fraction of the
//! incident flux. Dividing the saturating flux by the combined transmittance
//! gives the flux the source must deliver upstream of the optics.

use std::path::Path;

use log::{info, warn};
use ndarray::Array2;

use super::domain::{checked_divide, DomainError};
use super::exposure::ExposureSweep;
use super::spectrum::{SpectralCurve, SpectrumError};

/// Filter and lens transmittance, both as fractions in 0..=1
#[derive(Debug, Clone)]
pub struct OpticalPath {
    filter: SpectralCurve,
    lens: SpectralCurve,
}

impl OpticalPath {
    /// Filter transmittance given in percent, with a lossless lens
    pub fn from_filter_percent(filter_percent: &SpectralCurve) -> Self {
        let filter = filter_percent.map_values(|_, percent| percent / 100.0);
        let lens = filter.map_values(|_, _| 1.0);
        Self { filter, lens }
    }

    /// Load the filter transmittance table (`wavelength_nm,percent`)
    pub fn from_filter_csv<P: AsRef<Path>>(path: P) -> Result<Self, SpectrumError> {
        let filter_percent = SpectralCurve::from_csv(path)?;
        Ok(Self::from_filter_percent(&filter_percent))
    }

    /// Replace the unit lens curve with a measured one
    ///
    /// Pairs with the filter row by row.
    pub fn with_lens(mut self, lens: SpectralCurve) -> Result<Self, DomainError> {
        if lens.len() != self.filter.len() {
            return Err(DomainError::LengthMismatch {
                expected: self.filter.len(),
                actual: lens.len(),
            });
        }
        self.lens = lens;
        Ok(self)
    }

    pub fn filter(&self) -> &SpectralCurve {
        &self.filter
    }

    pub fn lens(&self) -> &SpectralCurve {
        &self.lens
    }

    /// Elementwise `filter · lens`
    pub fn combined(&self) -> SpectralCurve {
        // with_lens keeps both curves the same length
        let mut lens = self.lens.values().iter();
        self.filter
            .map_values(|_, t| t * lens.next().copied().unwrap_or(1.0))
    }

    /// Flux required upstream of the optics for every row of `sweep`.
    ///
    /// Column `j` of the sweep pairs with row `j` of the transmittance table.
    ///
    /// # Errors
    ///
    /// * `LengthMismatch` - fewer transmittance rows than sweep wavelengths
    /// * `NonPositiveTransmittance` - combined transmittance ≤ 0 at some row,
    ///   reported at the sweep wavelength it pairs with
    pub fn correct(&self, sweep: &ExposureSweep) -> Result<CorrectedFlux, DomainError> {
        let combined = self.combined();
        let columns = sweep.flux.ncols();

        if combined.len() < columns {
            return Err(DomainError::LengthMismatch {
                expected: columns,
                actual: combined.len(),
            });
        }
        if combined.len() > columns {
            warn!(
                "Transmittance table has {} rows, only the first {} pair with the sweep",
                combined.len(),
                columns
            );
        }

        let mut flux = Array2::zeros(sweep.flux.dim());
        for ((row, col), &phi) in sweep.flux.indexed_iter() {
            let t = combined.values()[col];
            let wavelength_nm = sweep.wavelength[[row, col]];
            flux[[row, col]] = checked_divide(phi, t, |value| {
                DomainError::NonPositiveTransmittance {
                    wavelength_nm,
                    value,
                }
            })?;
        }

        info!("Corrected {} flux curves for optical losses", sweep.rows());
        Ok(CorrectedFlux {
            wavelength: sweep.wavelength.clone(),
            flux,
        })
    }
}

/// Source flux needed to saturate the sensor through the optics
#[derive(Debug, Clone)]
pub struct CorrectedFlux {
    /// Wavelength in nm, one row per exposure
    pub wavelength: Array2<f64>,
    /// Required spectral flux, same units as the sweep it came from
    pub flux: Array2<f64>,
}
