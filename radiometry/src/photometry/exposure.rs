//! Saturation-limited irradiance and flux for given exposure times
//!
//! A pixel saturates once `R(λ) · E(λ) · t_exp` reaches `V_sat`. Solving for
//! the irradiance gives the brightest spectral irradiance the sensor can
//! record at each wavelength:
//!
//! ```text
//! E(λ)   = V_sat / (R(λ) · t_exp)      [W/m²/nm]
//! Φ(λ)   = E(λ) · A_sensor             [W/nm]
//! ```

use std::time::Duration;

use log::info;
use ndarray::{Array2, ArrayView1};

use super::domain::{checked_divide, require_finite, DomainError};
use super::spectrum::SpectralCurve;
use super::trapezoid::{trap_integrate, TrapezoidError};

/// Exposure times swept by default: 40 μs, 1 ms, 10 ms, 100 ms, 983 ms
pub const DEFAULT_EXPOSURES: [Duration; 5] = [
    Duration::from_micros(40),
    Duration::from_millis(1),
    Duration::from_millis(10),
    Duration::from_millis(100),
    Duration::from_millis(983),
];

/// Converts W into mW for plotting
pub const MILLI: f64 = 1e3;

/// Saturating irradiance and flux at one exposure time
#[derive(Debug, Clone)]
pub struct SaturationEstimate {
    pub exposure: Duration,
    /// Spectral irradiance in W/m²/nm
    pub irradiance: SpectralCurve,
    /// Spectral flux over the whole array in W/nm
    pub flux: SpectralCurve,
}

/// Irradiance and flux that just saturate the sensor after `exposure`.
///
/// # Errors
///
/// * `NonPositiveExposure` - zero exposure time
/// * `NonFinite` - saturation voltage or sensor area is NaN or infinite
/// * `NonPositiveResponsivity` - R(λ) ≤ 0 at some wavelength
pub fn estimate_saturation(
    responsivity: &SpectralCurve,
    saturation_voltage: f64,
    exposure: Duration,
    sensor_area_m2: f64,
) -> Result<SaturationEstimate, DomainError> {
    if exposure.is_zero() {
        return Err(DomainError::NonPositiveExposure);
    }
    let vsat = require_finite("saturation voltage", saturation_voltage)?;
    let area = require_finite("sensor area", sensor_area_m2)?;
    let texp = exposure.as_secs_f64();

    let irradiance = responsivity
        .iter()
        .map(|(w, r)| {
            checked_divide(vsat, r * texp, |_| DomainError::NonPositiveResponsivity {
                wavelength_nm: w,
                value: r,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let flux = irradiance.iter().map(|e| e * area).collect();

    Ok(SaturationEstimate {
        exposure,
        irradiance: same_grid(responsivity, irradiance)?,
        flux: same_grid(responsivity, flux)?,
    })
}

/// Saturation estimates stacked across several exposure times
///
/// Row `i` of each table belongs to `exposures[i]`; columns follow the
/// responsivity grid.
#[derive(Debug, Clone)]
pub struct ExposureSweep {
    pub exposures: Vec<Duration>,
    /// Wavelength in nm, repeated per row
    pub wavelength: Array2<f64>,
    /// Spectral irradiance in W/m²/nm
    pub irradiance: Array2<f64>,
    /// Spectral flux in W/nm
    pub flux: Array2<f64>,
}

impl ExposureSweep {
    /// Run [`estimate_saturation`] once per exposure time.
    pub fn run(
        responsivity: &SpectralCurve,
        saturation_voltage: f64,
        exposures: &[Duration],
        sensor_area_m2: f64,
    ) -> Result<Self, DomainError> {
        if exposures.is_empty() {
            return Err(DomainError::EmptyExposureList);
        }

        let shape = (exposures.len(), responsivity.len());
        let mut wavelength = Array2::zeros(shape);
        let mut irradiance = Array2::zeros(shape);
        let mut flux = Array2::zeros(shape);

        for (i, &exposure) in exposures.iter().enumerate() {
            let estimate =
                estimate_saturation(responsivity, saturation_voltage, exposure, sensor_area_m2)?;
            wavelength
                .row_mut(i)
                .assign(&ArrayView1::from(responsivity.wavelengths()));
            irradiance
                .row_mut(i)
                .assign(&ArrayView1::from(estimate.irradiance.values()));
            flux.row_mut(i)
                .assign(&ArrayView1::from(estimate.flux.values()));
        }

        info!(
            "Swept {} exposure times over {} wavelengths",
            shape.0, shape.1
        );

        Ok(Self {
            exposures: exposures.to_vec(),
            wavelength,
            irradiance,
            flux,
        })
    }

    /// Number of exposure rows
    pub fn rows(&self) -> usize {
        self.exposures.len()
    }

    /// Copy of the sweep with irradiance and flux multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            exposures: self.exposures.clone(),
            wavelength: self.wavelength.clone(),
            irradiance: &self.irradiance * factor,
            flux: &self.flux * factor,
        }
    }

    /// Band-integrated saturating power per exposure, in W
    pub fn integrated_flux(&self) -> Result<Vec<f64>, TrapezoidError> {
        let wavelengths = self.wavelength.row(0).to_vec();
        self.flux
            .rows()
            .into_iter()
            .map(|row| trap_integrate(&wavelengths, &row.to_vec()))
            .collect()
    }
}

fn same_grid(grid: &SpectralCurve, values: Vec<f64>) -> Result<SpectralCurve, DomainError> {
    let actual = values.len();
    grid.with_values(values)
        .ok_or(DomainError::LengthMismatch {
            expected: grid.len(),
            actual,
        })
}
