//! Analysis configuration
//!
//! Defaults reproduce the DCC1545M characterization: MT9M001 geometry,
//! 1.2 V saturation, five exposure times and the fixed input/output file
//! names, all resolved against the working directory. A JSON file may
//! override any subset of fields.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hardware::sensor::{ResponsivityCalibration, SensorConfig};
use crate::photometry::exposure::DEFAULT_EXPOSURES;
use crate::photometry::responsivity::QeLookup;

/// Errors while loading or interpreting a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Exposure time {0} s is not a valid duration")]
    InvalidExposure(f64),
}

/// Input table file names, relative to the data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    pub photopic: PathBuf,
    pub quantum_efficiency: PathBuf,
    pub filter_transmittance: PathBuf,
    pub floating_diffusion: PathBuf,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            photopic: "CIE-sle-photopic.csv".into(),
            quantum_efficiency: "qe-dcc1545m.csv".into(),
            filter_transmittance: "transmitance-lctf.csv".into(),
            floating_diffusion: "floating-diff-capacitance.csv".into(),
        }
    }
}

/// Chart file names, relative to the output directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub responsivity: PathBuf,
    pub irradiance: PathBuf,
    pub flux: PathBuf,
    pub system_flux: PathBuf,
    pub capacitance: PathBuf,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            responsivity: "spectral-responsivity-quantum-eff.pdf".into(),
            irradiance: "max-spectral-flux-density-mt9m001.pdf".into(),
            flux: "max-spectral-flux-mt9m001.pdf".into(),
            system_flux: "max-spectral-flux-mt9m001-wo.pdf".into(),
            capacitance: "floating-diff-capacitance.pdf".into(),
        }
    }
}

/// Everything the analysis pipeline needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub inputs: InputFiles,
    pub outputs: OutputFiles,
    pub sensor: SensorConfig,
    pub calibration: ResponsivityCalibration,
    /// Exposure times in seconds, in sweep order
    pub exposures_s: Vec<f64>,
    pub qe_lookup: QeLookup,
    /// Also rasterize each chart to a PNG next to the PDF
    pub png_preview: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            inputs: InputFiles::default(),
            outputs: OutputFiles::default(),
            sensor: SensorConfig::default(),
            calibration: ResponsivityCalibration::default(),
            exposures_s: DEFAULT_EXPOSURES.iter().map(Duration::as_secs_f64).collect(),
            qe_lookup: QeLookup::default(),
            png_preview: false,
        }
    }
}

impl AnalysisConfig {
    /// Load a JSON config; missing fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Exposure list as durations, rounded to the nearest nanosecond
    pub fn exposures(&self) -> Result<Vec<Duration>, ConfigError> {
        self.exposures_s
            .iter()
            .map(|&s| {
                let nanos = (s * 1e9).round();
                if !s.is_finite() || s < 0.0 || nanos >= u64::MAX as f64 {
                    return Err(ConfigError::InvalidExposure(s));
                }
                Ok(Duration::from_nanos(nanos as u64))
            })
            .collect()
    }

    pub fn set_exposures(&mut self, exposures: &[Duration]) {
        self.exposures_s = exposures.iter().map(Duration::as_secs_f64).collect();
    }

    pub fn input_path(&self, file: &Path) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn output_path(&self, file: &Path) -> PathBuf {
        self.output_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_exposures_round_trip_through_seconds() {
        let config = AnalysisConfig::default();
        assert_eq!(config.exposures().unwrap(), DEFAULT_EXPOSURES.to_vec());
    }

    #[test]
    fn test_default_paths() {
        let config = AnalysisConfig::default();
        assert_eq!(
            config.input_path(&config.inputs.quantum_efficiency),
            PathBuf::from("./qe-dcc1545m.csv")
        );
        assert_eq!(
            config.output_path(&config.outputs.system_flux),
            PathBuf::from("./max-spectral-flux-mt9m001-wo.pdf")
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"exposures_s": [0.002, 0.02], "qe_lookup": "interpolated", "sensor": {{"saturation_voltage": 0.9}}}}"#
        )
        .unwrap();

        let config = AnalysisConfig::from_json_file(file.path()).unwrap();
        assert_eq!(
            config.exposures().unwrap(),
            vec![Duration::from_millis(2), Duration::from_millis(20)]
        );
        assert_eq!(config.qe_lookup, QeLookup::Interpolated);
        assert_eq!(config.sensor.saturation_voltage, 0.9);
        assert_eq!(config.sensor.width_px, 1280);
        assert_eq!(config.inputs, InputFiles::default());
    }

    #[test]
    fn test_negative_exposure_rejected() {
        let config = AnalysisConfig {
            exposures_s: vec![-1.0],
            ..Default::default()
        };
        assert!(matches!(
            config.exposures(),
            Err(ConfigError::InvalidExposure(_))
        ));
    }

    #[test]
    fn test_sub_microsecond_exposure_kept() {
        let config = AnalysisConfig {
            exposures_s: vec![5e-7, 4e-5],
            ..Default::default()
        };
        assert_eq!(
            config.exposures().unwrap(),
            vec![Duration::from_nanos(500), Duration::from_micros(40)]
        );
    }

    #[test]
    fn test_bad_json_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            AnalysisConfig::from_json_file(file.path()),
            Err(ConfigError::Json { .. })
        ));
    }
}
