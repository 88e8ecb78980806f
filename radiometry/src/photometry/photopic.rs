//! CIE photopic luminous efficiency and radiometric-to-photometric conversion

use std::path::Path;

use super::spectrum::{SpectralCurve, SpectrumError};

/// Peak luminous efficacy of radiation at 555 nm, lm/W
pub const MAX_LUMINOUS_EFFICACY: f64 = 683.0;

/// Spectral luminous efficiency V(λ) of the light-adapted eye
#[derive(Debug, Clone)]
pub struct PhotopicCurve {
    curve: SpectralCurve,
}

impl PhotopicCurve {
    pub fn new(curve: SpectralCurve) -> Self {
        Self { curve }
    }

    /// Load the tabulated CIE curve (`wavelength_nm,V`)
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, SpectrumError> {
        Ok(Self::new(SpectralCurve::from_csv(path)?))
    }

    /// V(λ), linearly interpolated, 0.0 outside the table
    pub fn efficiency_at(&self, wavelength_nm: f64) -> f64 {
        if self.curve.len() < 2 || !self.curve.band().contains(wavelength_nm) {
            return 0.0;
        }
        self.curve.value_at(wavelength_nm).unwrap_or(0.0)
    }

    pub fn curve(&self) -> &SpectralCurve {
        &self.curve
    }

    /// Weight a radiometric spectral curve by `683 · V(λ)`.
    ///
    /// W/m²/nm becomes lx/nm, W/nm becomes lm/nm.
    pub fn to_photometric(&self, radiometric: &SpectralCurve) -> SpectralCurve {
        radiometric.map_values(|w, v| v * MAX_LUMINOUS_EFFICACY * self.efficiency_at(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coarse_cie() -> PhotopicCurve {
        PhotopicCurve::new(
            SpectralCurve::new(
                vec![400.0, 500.0, 555.0, 600.0, 700.0],
                vec![0.0004, 0.323, 1.0, 0.631, 0.0041],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_efficiency_lookup() {
        let v = coarse_cie();
        assert_eq!(v.efficiency_at(555.0), 1.0);
        assert_relative_eq!(v.efficiency_at(650.0), (0.631 + 0.0041) / 2.0, epsilon = 1e-12);
        assert_eq!(v.efficiency_at(380.0), 0.0);
        assert_eq!(v.efficiency_at(720.0), 0.0);
    }

    #[test]
    fn test_to_photometric() {
        let v = coarse_cie();
        let irradiance = SpectralCurve::new(vec![555.0, 720.0], vec![2.0, 5.0]).unwrap();
        let illuminance = v.to_photometric(&irradiance);

        assert_relative_eq!(illuminance.values()[0], 2.0 * 683.0);
        assert_eq!(illuminance.values()[1], 0.0);
        assert_eq!(illuminance.wavelengths(), irradiance.wavelengths());
    }
}
