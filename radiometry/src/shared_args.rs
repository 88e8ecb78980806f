use crate::algo::format_decimal;
use crate::config::{AnalysisConfig, ConfigError};
use crate::hardware::sensor::SensorConfig;
use crate::photometry::responsivity::QeLookup;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Parse duration string with units (e.g., "500ns", "40us", "983ms", "0.1s")
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    let (num_str, unit) = if let Some(num) = s.strip_suffix("ns") {
        (num, "ns")
    } else if let Some(num) = s.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = s.strip_suffix("us") {
        (num, "us")
    } else if let Some(num) = s.strip_suffix('s') {
        (num, "s")
    } else {
        // Default to seconds if no unit specified
        (s, "s")
    };

    let value: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid numeric value: {}", num_str))?;

    if !value.is_finite() || value <= 0.0 {
        return Err("Exposure must be positive".to_string());
    }

    let unit_nanos = match unit {
        "ns" => 1.0,
        "us" => 1e3,
        "ms" => 1e6,
        _ => 1e9,
    };
    let nanos = (value * unit_nanos).round();
    if nanos < 1.0 || nanos >= u64::MAX as f64 {
        return Err(format!("Exposure {} is outside 1ns..584 years", s));
    }

    Ok(Duration::from_nanos(nanos as u64))
}

/// Parse a comma separated exposure list, e.g. "40us,1ms,10ms"
fn parse_exposure_list(s: &str) -> Result<ExposureList, String> {
    let exposures = s
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_duration)
        .collect::<Result<Vec<_>, _>>()?;

    if exposures.is_empty() {
        return Err("Exposure list is empty".to_string());
    }
    Ok(ExposureList(exposures))
}

/// Wrapper for Duration that implements Clone and has a nice Display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationArg(pub Duration);

impl std::str::FromStr for DurationArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s).map(DurationArg)
    }
}

impl std::fmt::Display for DurationArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration = self.0;
        let nanos = duration.as_nanos();

        if nanos < 1_000 {
            write!(f, "{}ns", nanos)
        } else if nanos < 1_000_000 {
            write!(f, "{}us", format_decimal(nanos as f64 / 1e3, 3))
        } else if nanos < 1_000_000_000 {
            write!(f, "{}ms", format_decimal(nanos as f64 / 1e6, 3))
        } else {
            write!(f, "{}s", format_decimal(duration.as_secs_f64(), 3))
        }
    }
}

/// Ordered exposure durations given on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureList(pub Vec<Duration>);

impl std::str::FromStr for ExposureList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_exposure_list(s)
    }
}

/// Available sensor models for selection
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SensorModel {
    /// Aptina MT9M001 monochrome CMOS (1280x1024, 5.2μm pixels) - Default
    #[default]
    Mt9m001,
}

impl std::fmt::Display for SensorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorModel::Mt9m001 => write!(f, "mt9m001"),
        }
    }
}

impl SensorModel {
    /// Get the corresponding SensorConfig for the selected model
    pub fn to_config(&self) -> &'static SensorConfig {
        match self {
            SensorModel::Mt9m001 => &crate::hardware::sensor::models::MT9M001,
        }
    }
}

/// Common arguments shared across the analysis binaries
#[derive(Parser, Debug, Clone)]
pub struct SharedAnalysisArgs {
    /// JSON configuration file; command line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the input CSV tables
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory receiving the charts
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Sensor model
    #[arg(long)]
    pub sensor: Option<SensorModel>,

    /// Exposure list (e.g., "40us,1ms,10ms,100ms,983ms")
    #[arg(long)]
    pub exposures: Option<ExposureList>,

    /// Saturation voltage in volts
    #[arg(long)]
    pub saturation_voltage: Option<f64>,

    /// How QE samples are matched to the analysis grid
    #[arg(long, value_enum)]
    pub qe_lookup: Option<QeLookup>,

    /// Also write a PNG next to every PDF
    #[arg(long, default_value_t = false)]
    pub png_preview: bool,
}

impl SharedAnalysisArgs {
    /// Load the configuration file, if any, and apply the command line overrides
    pub fn to_config(&self) -> Result<AnalysisConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(model) = self.sensor {
            config.sensor = model.to_config().clone();
        }
        if let Some(exposures) = &self.exposures {
            config.set_exposures(&exposures.0);
        }
        if let Some(voltage) = self.saturation_voltage {
            config.sensor.saturation_voltage = voltage;
        }
        if let Some(lookup) = self.qe_lookup {
            config.qe_lookup = lookup;
        }
        config.png_preview |= self.png_preview;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("40us").unwrap(), Duration::from_micros(40));
        assert_eq!(parse_duration("983ms").unwrap(), Duration::from_millis(983));
        assert_relative_eq!(parse_duration("0.04ms").unwrap().as_secs_f64(), 40e-6, epsilon = 1e-12);
        assert_relative_eq!(parse_duration("1.5").unwrap().as_secs_f64(), 1.5);
    }

    #[test]
    fn test_parse_duration_rejects_bad_input() {
        assert!(parse_duration("0ms").is_err());
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("0.1ns").is_err());
    }

    #[test]
    fn test_exposure_list() {
        let list: ExposureList = "40us, 1ms,10ms".parse().unwrap();
        assert_eq!(
            list.0,
            vec![
                Duration::from_micros(40),
                Duration::from_millis(1),
                Duration::from_millis(10)
            ]
        );
        assert!(",".parse::<ExposureList>().is_err());
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(DurationArg(Duration::from_micros(40)).to_string(), "40us");
        assert_eq!(DurationArg(Duration::from_millis(100)).to_string(), "100ms");
        assert_eq!(DurationArg(Duration::from_millis(1500)).to_string(), "1.5s");
    }

    #[test]
    fn test_fractional_millisecond_display() {
        assert_eq!(DurationArg(Duration::from_micros(1500)).to_string(), "1.5ms");
        assert_eq!(DurationArg(Duration::from_micros(2500)).to_string(), "2.5ms");
        assert_eq!(DurationArg(Duration::from_micros(983_250)).to_string(), "983.25ms");
    }

    #[test]
    fn test_sub_microsecond_round_trip() {
        let exposure = parse_duration("0.5us").unwrap();
        assert_eq!(exposure, Duration::from_nanos(500));
        assert_eq!(DurationArg(exposure).to_string(), "500ns");
        assert_eq!("500ns".parse::<DurationArg>().unwrap().0, exposure);
        assert_eq!(DurationArg(Duration::from_nanos(1500)).to_string(), "1.5us");
    }

    #[test]
    fn test_overrides_apply_over_defaults() {
        let args = SharedAnalysisArgs::parse_from([
            "test",
            "--data-dir",
            "tables",
            "--exposures",
            "1ms,2ms",
            "--saturation-voltage",
            "1.0",
            "--qe-lookup",
            "interpolated",
        ]);
        let config = args.to_config().unwrap();

        assert_eq!(config.data_dir, PathBuf::from("tables"));
        assert_eq!(config.exposures_s, vec![1e-3, 2e-3]);
        assert_relative_eq!(config.sensor.saturation_voltage, 1.0);
        assert_eq!(config.qe_lookup, QeLookup::Interpolated);
        assert!(!config.png_preview);
    }
}
