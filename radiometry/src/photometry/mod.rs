//! Photometry models and utilities

pub mod domain;
pub mod exposure;
pub mod photopic;
pub mod quantum_efficiency;
pub mod responsivity;
pub mod spectrum;
pub mod transmittance;
pub mod trapezoid;

pub use domain::DomainError;
pub use exposure::{estimate_saturation, ExposureSweep, SaturationEstimate, DEFAULT_EXPOSURES};
pub use photopic::PhotopicCurve;
pub use quantum_efficiency::QuantumEfficiency;
pub use responsivity::{QeLookup, ResponsivityEstimator};
pub use spectrum::{analysis_grid, Band, SpectralCurve};
pub use transmittance::{CorrectedFlux, OpticalPath};
pub use trapezoid::trap_integrate;
