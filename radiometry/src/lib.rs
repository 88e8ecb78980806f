//! Radiometric and photometric characterization of an image sensor
//!
//! Derives spectral responsivity from a quantum efficiency table, estimates the
//! irradiance and flux that saturate the sensor for a set of exposure times,
//! corrects that flux for filter and lens losses, and renders the results as
//! vector charts.

pub mod algo;
pub mod analysis;
pub mod config;
pub mod hardware;
pub mod io;
pub mod photometry;
pub mod plots;
pub mod shared_args;

pub use analysis::{Analysis, AnalysisError, FloatingDiffusionPoint};
pub use config::AnalysisConfig;
