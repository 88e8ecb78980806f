//! End-to-end characterization pipeline
//!
//! Each step reloads the tables it needs, so the steps can run on their own.
//! [`Analysis::run_all`] draws every chart in a fixed order and stops at the
//! first failure.

use log::info;
use thiserror::Error;

use crate::config::{AnalysisConfig, ConfigError};
use crate::hardware::floating_diffusion::{FloatingDiffusionCurve, FloatingDiffusionError};
use crate::photometry::domain::DomainError;
use crate::photometry::exposure::{ExposureSweep, MILLI};
use crate::photometry::photopic::PhotopicCurve;
use crate::photometry::quantum_efficiency::{QuantumEfficiency, QuantumEfficiencyError};
use crate::photometry::responsivity::{ResponsivityError, ResponsivityEstimator};
use crate::photometry::spectrum::{analysis_grid, SpectralCurve, SpectrumError};
use crate::photometry::transmittance::{CorrectedFlux, OpticalPath};
use crate::photometry::trapezoid::TrapezoidError;
use crate::plots::{self, PlotError, FLUX_CHART, IRRADIANCE_CHART, SYSTEM_FLUX_CHART};

/// Any failure of the characterization run
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Spectrum(#[from] SpectrumError),

    #[error(transparent)]
    QuantumEfficiency(#[from] QuantumEfficiencyError),

    #[error(transparent)]
    Responsivity(#[from] ResponsivityError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    FloatingDiffusion(#[from] FloatingDiffusionError),

    #[error(transparent)]
    Integration(#[from] TrapezoidError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Responsivity together with the QE table it came from
#[derive(Debug, Clone)]
pub struct ResponsivityResult {
    pub quantum_efficiency: QuantumEfficiency,
    /// V/(J/m²) over the analysis grid
    pub responsivity: SpectralCurve,
}

/// Numbers behind the charts, for tabular reporting
#[derive(Debug, Clone)]
pub struct RadiometricReport {
    pub responsivity: SpectralCurve,
    /// Sweep in W/m²/nm and W/nm
    pub sweep: ExposureSweep,
    /// Upstream flux in mW/nm
    pub corrected: CorrectedFlux,
    /// Band-integrated saturating power per exposure, W
    pub integrated_power_w: Vec<f64>,
    /// Saturating illuminance per exposure, lx/nm, when the CIE table is available
    pub illuminance: Option<Vec<SpectralCurve>>,
}

/// Floating diffusion figures at one lithographic feature size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingDiffusionPoint {
    pub feature_size_um: f64,
    /// Interpolated capacitance, fF
    pub capacitance_ff: f64,
    /// Charge to voltage conversion gain, μV/e⁻
    pub conversion_gain_uv_per_e: f64,
}

/// Characterization run driven by an [`AnalysisConfig`]
#[derive(Debug, Clone)]
pub struct Analysis {
    pub config: AnalysisConfig,
}

impl Analysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    fn estimator(&self) -> ResponsivityEstimator {
        ResponsivityEstimator::new(self.config.calibration.clone(), self.config.qe_lookup)
    }

    /// Load the QE table and derive responsivity over the 400-720 nm grid
    pub fn responsivity_from_qe(&self) -> Result<ResponsivityResult, AnalysisError> {
        let path = self.config.input_path(&self.config.inputs.quantum_efficiency);
        let quantum_efficiency = QuantumEfficiency::from_csv(&path)?;
        let responsivity = self.estimator().estimate(&quantum_efficiency, &analysis_grid())?;

        Ok(ResponsivityResult {
            quantum_efficiency,
            responsivity,
        })
    }

    /// Saturating irradiance and flux for every configured exposure, in W units
    pub fn max_radiometric_estimation(&self) -> Result<ExposureSweep, AnalysisError> {
        let responsivity = self.responsivity_from_qe()?.responsivity;
        let sensor = &self.config.sensor;

        Ok(ExposureSweep::run(
            &responsivity,
            sensor.saturation_voltage,
            &self.config.exposures()?,
            sensor.area_m2(),
        )?)
    }

    /// Source flux in mW/nm needed upstream of the filter and lens
    pub fn optical_consideration(&self) -> Result<CorrectedFlux, AnalysisError> {
        let sweep = self.max_radiometric_estimation()?.scaled(MILLI);
        let path = self
            .config
            .input_path(&self.config.inputs.filter_transmittance);
        let optics = OpticalPath::from_filter_csv(&path)?;

        Ok(optics.correct(&sweep)?)
    }

    /// Responsivity and QE chart
    pub fn plot_radiant_responsivity(&self) -> Result<(), AnalysisError> {
        let result = self.responsivity_from_qe()?;
        let path = self.config.output_path(&self.config.outputs.responsivity);

        plots::plot_radiant_responsivity(
            &path,
            &result.responsivity,
            &result.quantum_efficiency,
            self.config.png_preview,
        )?;
        Ok(())
    }

    /// Irradiance and flux families, both in milliwatt units
    pub fn plot_radiometric_graph(&self) -> Result<(), AnalysisError> {
        let sweep = self.max_radiometric_estimation()?.scaled(MILLI);
        let outputs = &self.config.outputs;

        plots::plot_exposure_family(
            &self.config.output_path(&outputs.irradiance),
            &IRRADIANCE_CHART,
            &sweep.wavelength,
            &sweep.irradiance,
            &sweep.exposures,
            self.config.png_preview,
        )?;
        plots::plot_exposure_family(
            &self.config.output_path(&outputs.flux),
            &FLUX_CHART,
            &sweep.wavelength,
            &sweep.flux,
            &sweep.exposures,
            self.config.png_preview,
        )?;
        Ok(())
    }

    /// Flux family corrected for optical losses
    pub fn plot_system_spectral_response(&self) -> Result<(), AnalysisError> {
        let corrected = self.optical_consideration()?;

        plots::plot_exposure_family(
            &self.config.output_path(&self.config.outputs.system_flux),
            &SYSTEM_FLUX_CHART,
            &corrected.wavelength,
            &corrected.flux,
            &self.config.exposures()?,
            self.config.png_preview,
        )?;
        Ok(())
    }

    /// Floating diffusion capacitance chart
    pub fn plot_floating_capacitance(&self) -> Result<(), AnalysisError> {
        let path = self.config.input_path(&self.config.inputs.floating_diffusion);
        let curve = FloatingDiffusionCurve::from_csv(&path)?;

        plots::plot_floating_capacitance(
            &self.config.output_path(&self.config.outputs.capacitance),
            &curve,
            self.config.png_preview,
        )?;
        Ok(())
    }

    /// Interpolate the capacitance table at `feature_size_um`
    pub fn floating_diffusion_at(
        &self,
        feature_size_um: f64,
    ) -> Result<FloatingDiffusionPoint, AnalysisError> {
        let path = self.config.input_path(&self.config.inputs.floating_diffusion);
        let curve = FloatingDiffusionCurve::from_csv(&path)?;

        let point = FloatingDiffusionPoint {
            feature_size_um,
            capacitance_ff: curve.capacitance_at(feature_size_um)?,
            conversion_gain_uv_per_e: curve.conversion_gain_uv_per_e(feature_size_um)?,
        };
        info!(
            "C_fd({} um) = {:.3} fF, {:.3} uV/e-",
            point.feature_size_um, point.capacitance_ff, point.conversion_gain_uv_per_e
        );
        Ok(point)
    }

    /// Draw every chart: responsivity, radiometric pair, system response, capacitance
    pub fn run_all(&self) -> Result<(), AnalysisError> {
        let output_dir = &self.config.output_dir;
        std::fs::create_dir_all(output_dir).map_err(|source| AnalysisError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        self.plot_radiant_responsivity()?;
        self.plot_radiometric_graph()?;
        self.plot_system_spectral_response()?;
        self.plot_floating_capacitance()?;

        info!("All charts written to {}", output_dir.display());
        Ok(())
    }

    /// Compute every table without drawing
    ///
    /// The CIE table is optional here; without it the photometric columns are skipped.
    pub fn report(&self) -> Result<RadiometricReport, AnalysisError> {
        let responsivity = self.responsivity_from_qe()?.responsivity;
        let sweep = self.max_radiometric_estimation()?;
        let corrected = self.optical_consideration()?;
        let integrated_power_w = sweep.integrated_flux()?;

        let photopic_path = self.config.input_path(&self.config.inputs.photopic);
        let illuminance = if photopic_path.exists() {
            let photopic = PhotopicCurve::from_csv(&photopic_path)?;
            let curves = (0..sweep.rows())
                .map(|row| {
                    let irradiance = responsivity
                        .with_values(sweep.irradiance.row(row).to_vec())
                        .ok_or(DomainError::LengthMismatch {
                            expected: responsivity.len(),
                            actual: sweep.irradiance.ncols(),
                        })?;
                    Ok(photopic.to_photometric(&irradiance))
                })
                .collect::<Result<Vec<_>, DomainError>>()?;
            Some(curves)
        } else {
            info!(
                "{} not found, skipping photometric columns",
                photopic_path.display()
            );
            None
        };

        Ok(RadiometricReport {
            responsivity,
            sweep,
            corrected,
            integrated_power_w,
            illuminance,
        })
    }
}
