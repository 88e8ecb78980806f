//! Test fixtures for the sensor radiometry workspace.
//!
//! Provides project root discovery, a persistent `test_output/` directory for
//! charts worth inspecting by hand, and writers for the small CSV tables the
//! analysis pipeline reads.
//!
//! ```rust,no_run
//! use test_helpers::{output_path, write_fixture_tables};
//!
//! let dir = output_path("fixtures");
//! std::fs::create_dir_all(&dir).unwrap();
//! write_fixture_tables(&dir).unwrap();
//! ```

use once_cell::sync::Lazy;
use std::env;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Wavelength grid shared by the fixture tables: 400 to 720 nm in 10 nm steps
pub fn fixture_wavelengths() -> Vec<f64> {
    (0..33).map(|i| 400.0 + 10.0 * i as f64).collect()
}

/// Quantum efficiency used by [`write_fixture_tables`]
pub const FIXTURE_QE: f64 = 0.56;

/// Filter transmittance in percent used by [`write_fixture_tables`]
pub const FIXTURE_FILTER_PERCENT: f64 = 50.0;

#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),

    #[error("Failed to write fixture {path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Locate the workspace root by walking up to the Cargo.toml holding `[workspace]`.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {}", e))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {}", e))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// `<project_root>/test_output/`, created on first use
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }

    output_dir
}

/// Path inside the test output directory
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    get_output_dir().join(path)
}

/// Write `rows` as a headerless two column CSV table into `dir/name`.
pub fn write_two_column_csv(
    dir: &Path,
    name: &str,
    rows: &[(f64, f64)],
) -> Result<PathBuf, TestHelperError> {
    let mut text = String::new();
    for (x, y) in rows {
        // Writing to a String cannot fail
        let _ = writeln!(text, "{},{}", x, y);
    }

    let path = dir.join(name);
    std::fs::write(&path, text).map_err(|source| TestHelperError::Fixture {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Flat table over [`fixture_wavelengths`]
pub fn flat_table(value: f64) -> Vec<(f64, f64)> {
    fixture_wavelengths()
        .into_iter()
        .map(|w| (w, value))
        .collect()
}

/// Write all four input tables under their default names.
///
/// QE is flat at [`FIXTURE_QE`], the filter passes [`FIXTURE_FILTER_PERCENT`],
/// the photopic curve is a triangle peaking at 555 nm and the capacitance
/// curve rises linearly with feature size.
pub fn write_fixture_tables(dir: &Path) -> Result<(), TestHelperError> {
    write_two_column_csv(dir, "qe-dcc1545m.csv", &flat_table(FIXTURE_QE))?;
    write_two_column_csv(
        dir,
        "transmitance-lctf.csv",
        &flat_table(FIXTURE_FILTER_PERCENT),
    )?;
    write_two_column_csv(
        dir,
        "CIE-sle-photopic.csv",
        &[(380.0, 0.0), (555.0, 1.0), (780.0, 0.0)],
    )?;
    write_two_column_csv(
        dir,
        "floating-diff-capacitance.csv",
        &[(0.2, 1.5), (0.6, 4.0), (1.0, 7.0), (1.4, 10.5), (1.8, 14.0)],
    )?;
    Ok(())
}
