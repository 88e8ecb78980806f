//! Sampled spectral curves and wavelength bands
//!
//! A [`SpectralCurve`] pairs ascending wavelengths with one value per sample.
//! QE tables, responsivity, filter transmittance and saturation irradiance are
//! all carried in this form.

use std::path::Path;

use thiserror::Error;

use crate::algo::misc::{interp, linspace, InterpError};
use crate::io::table::{load_two_column, TableError};

/// Lower edge of the analysis band in nanometers
pub const ANALYSIS_LOWER_NM: f64 = 400.0;

/// Upper edge of the analysis band in nanometers
pub const ANALYSIS_UPPER_NM: f64 = 720.0;

/// Number of samples across the analysis band (10 nm spacing)
pub const ANALYSIS_GRID_POINTS: usize = 33;

/// Errors that can occur when building or sampling a spectral curve
#[derive(Debug, Error)]
pub enum SpectrumError {
    #[error("Wavelength and value vectors must have the same length ({wavelengths} vs {values})")]
    LengthMismatch { wavelengths: usize, values: usize },

    #[error("Wavelengths must be in ascending order (index {0})")]
    NotAscending(usize),

    #[error("Spectral curve has no samples")]
    Empty,

    #[error("Wavelength {0} nm is negative or not finite")]
    InvalidWavelength(f64),

    #[error(transparent)]
    Interp(#[from] InterpError),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// A closed wavelength interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lower wavelength bound in nanometers
    pub lower_nm: f64,

    /// Upper wavelength bound in nanometers
    pub upper_nm: f64,
}

impl Band {
    /// Create a new Band directly from lower and upper bounds
    ///
    /// # Panics
    ///
    /// Panics on non-finite, negative or inverted bounds. These are programming
    /// errors in fixed band definitions, not data errors.
    pub fn from_nm_bounds(lower_nm: f64, upper_nm: f64) -> Self {
        if !lower_nm.is_finite() || !upper_nm.is_finite() {
            panic!("Wavelength range cannot contain non-finite values");
        }

        if lower_nm > upper_nm {
            panic!(
                "Invalid wavelength range: start must be less than end, got {}..{}",
                lower_nm, upper_nm,
            );
        }
        if lower_nm < 0.0 {
            panic!("Wavelengths must be non-negative");
        }

        Self { lower_nm, upper_nm }
    }

    /// The 400-720 nm visible band the sensor is characterized over
    pub fn analysis() -> Self {
        Self::from_nm_bounds(ANALYSIS_LOWER_NM, ANALYSIS_UPPER_NM)
    }

    /// Whether `wavelength_nm` falls inside the band, edges included
    pub fn contains(&self, wavelength_nm: f64) -> bool {
        (self.lower_nm..=self.upper_nm).contains(&wavelength_nm)
    }

    /// `num` evenly spaced wavelengths spanning the band
    pub fn grid(&self, num: usize) -> Vec<f64> {
        linspace(self.lower_nm, self.upper_nm, num)
    }
}

/// The 33-point, 10 nm analysis grid over 400-720 nm
pub fn analysis_grid() -> Vec<f64> {
    Band::analysis().grid(ANALYSIS_GRID_POINTS)
}

/// Ordered `(wavelength_nm, value)` samples
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralCurve {
    wavelengths: Vec<f64>,
    values: Vec<f64>,
}

impl SpectralCurve {
    /// Build a curve from paired samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the vectors differ in length or are empty. Wavelengths
    /// must be finite, non-negative and strictly ascending.
    pub fn new(wavelengths: Vec<f64>, values: Vec<f64>) -> Result<Self, SpectrumError> {
        if wavelengths.len() != values.len() {
            return Err(SpectrumError::LengthMismatch {
                wavelengths: wavelengths.len(),
                values: values.len(),
            });
        }
        if wavelengths.is_empty() {
            return Err(SpectrumError::Empty);
        }
        if let Some(&w) = wavelengths.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(SpectrumError::InvalidWavelength(w));
        }
        if let Some(i) = wavelengths.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SpectrumError::NotAscending(i + 1));
        }

        Ok(Self {
            wavelengths,
            values,
        })
    }

    /// A curve holding `value` at every wavelength
    pub fn constant(wavelengths: Vec<f64>, value: f64) -> Result<Self, SpectrumError> {
        let values = vec![value; wavelengths.len()];
        Self::new(wavelengths, values)
    }

    /// Load a headerless `wavelength,value` CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, SpectrumError> {
        let (wavelengths, values) = load_two_column(path)?;
        Self::new(wavelengths, values)
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Band spanned by the first and last samples
    pub fn band(&self) -> Band {
        Band::from_nm_bounds(self.wavelengths[0], self.wavelengths[self.len() - 1])
    }

    /// Iterate over `(wavelength_nm, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelengths
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Collect the samples as points, ready for a line series
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.iter().collect()
    }

    /// Apply `f` to every value, keeping the wavelengths
    pub fn map_values<F>(&self, mut f: F) -> Self
    where
        F: FnMut(f64, f64) -> f64,
    {
        Self {
            wavelengths: self.wavelengths.clone(),
            values: self.iter().map(|(w, v)| f(w, v)).collect(),
        }
    }

    /// Same wavelengths carrying `values`, `None` if the lengths differ
    pub fn with_values(&self, values: Vec<f64>) -> Option<Self> {
        (values.len() == self.len()).then(|| Self {
            wavelengths: self.wavelengths.clone(),
            values,
        })
    }

    /// Multiply every value by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        self.map_values(|_, v| v * factor)
    }

    /// Linearly interpolated value at `wavelength_nm`
    pub fn value_at(&self, wavelength_nm: f64) -> Result<f64, SpectrumError> {
        Ok(interp(wavelength_nm, &self.wavelengths, &self.values)?)
    }
}
