//! Sensor configuration for saturation and responsivity estimates

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Geometry and saturation level of an image sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Name/model of the sensor
    pub name: String,
    /// Width of sensor in pixels
    pub width_px: u32,
    /// Height of sensor in pixels
    pub height_px: u32,
    /// Pixel pitch in microns
    pub pixel_size_um: f64,
    /// Output voltage at which the pixel response clips, in volts
    pub saturation_voltage: f64,
}

impl SensorConfig {
    /// Create a new sensor configuration
    pub fn new(
        name: impl Into<String>,
        width_px: u32,
        height_px: u32,
        pixel_size_um: f64,
        saturation_voltage: f64,
    ) -> Self {
        Self {
            name: name.into(),
            width_px,
            height_px,
            pixel_size_um,
            saturation_voltage,
        }
    }

    /// Area of a single pixel in square meters
    pub fn pixel_area_m2(&self) -> f64 {
        let pitch_m = self.pixel_size_um * 1e-6;
        pitch_m * pitch_m
    }

    /// Photosensitive area of the full array in square meters
    pub fn area_m2(&self) -> f64 {
        self.pixel_area_m2() * self.width_px as f64 * self.height_px as f64
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        (*models::MT9M001).clone()
    }
}

/// Calibration that scales a QE curve into spectral responsivity
///
/// Responsivity is pinned at a reference wavelength, where the datasheet
/// peak responsivity `scale · gain` corresponds to the peak QE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsivityCalibration {
    /// Amplifier/conversion gain factor
    pub conversion_gain: f64,
    /// Multiplier taking the gain to the peak responsivity
    pub responsivity_scale: f64,
    /// Quantum efficiency at the reference wavelength
    pub reference_qe: f64,
    /// Wavelength the calibration is pinned at, in nanometers
    pub reference_wavelength_nm: f64,
}

impl ResponsivityCalibration {
    /// Peak responsivity `Re_max` in V/(J/m²)
    pub fn max_responsivity(&self) -> f64 {
        self.responsivity_scale * self.conversion_gain
    }
}

impl Default for ResponsivityCalibration {
    /// DCC1545M calibration: Kg = 237, Re_max = 2.1 Kg, QE 0.56 at 550 nm
    fn default() -> Self {
        Self {
            conversion_gain: 237.0,
            responsivity_scale: 2.1,
            reference_qe: 0.56,
            reference_wavelength_nm: 550.0,
        }
    }
}

/// Standard sensor models
pub mod models {
    use super::*;

    /// Aptina MT9M001 monochrome CMOS (Thorlabs DCC1545M), 1280x1024, 5.2μm pixels
    pub static MT9M001: Lazy<SensorConfig> =
        Lazy::new(|| SensorConfig::new("MT9M001", 1280, 1024, 5.2, 1.2));
}
