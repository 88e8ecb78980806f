//! Hardware module for sensor geometry, calibration and pixel electronics

pub mod floating_diffusion;
pub mod sensor;

pub use floating_diffusion::FloatingDiffusionCurve;
pub use sensor::{ResponsivityCalibration, SensorConfig};
