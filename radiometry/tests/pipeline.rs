//! End-to-end runs of the characterization pipeline over fixture tables

use approx::assert_relative_eq;
use radiometry::config::AnalysisConfig;
use radiometry::photometry::exposure::MILLI;
use radiometry::photometry::responsivity::QeLookup;
use radiometry::hardware::floating_diffusion::{FloatingDiffusionError, ELEMENTARY_CHARGE};
use radiometry::{Analysis, AnalysisError};
use std::path::Path;
use std::time::Duration;
use test_helpers::{flat_table, output_path, write_fixture_tables, write_two_column_csv};

fn fixture_analysis(dir: &Path) -> Analysis {
    write_fixture_tables(dir).unwrap();
    Analysis::new(AnalysisConfig {
        data_dir: dir.to_path_buf(),
        output_dir: dir.join("charts"),
        ..Default::default()
    })
}

#[test]
fn test_run_all_writes_every_chart() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = fixture_analysis(dir.path());

    analysis.run_all().unwrap();

    let charts = dir.path().join("charts");
    for name in [
        "spectral-responsivity-quantum-eff.pdf",
        "max-spectral-flux-density-mt9m001.pdf",
        "max-spectral-flux-mt9m001.pdf",
        "max-spectral-flux-mt9m001-wo.pdf",
        "floating-diff-capacitance.pdf",
    ] {
        let bytes = std::fs::read(charts.join(name)).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "{name} is not a PDF");
    }
}

#[test]
fn test_charts_kept_for_inspection() {
    let dir = tempfile::tempdir().unwrap();
    let mut analysis = fixture_analysis(dir.path());
    analysis.config.output_dir = output_path("radiometry_charts");
    analysis.config.png_preview = true;

    analysis.run_all().unwrap();

    let charts = output_path("radiometry_charts");
    assert!(charts.join("max-spectral-flux-mt9m001-wo.pdf").exists());
    assert!(charts.join("max-spectral-flux-mt9m001-wo.png").exists());
}

#[test]
fn test_floating_diffusion_at_feature_size() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = fixture_analysis(dir.path());

    // Halfway between the 0.6 um (4 fF) and 1.0 um (7 fF) samples
    let point = analysis.floating_diffusion_at(0.8).unwrap();
    assert_relative_eq!(point.capacitance_ff, 5.5, epsilon = 1e-12);
    assert_relative_eq!(
        point.conversion_gain_uv_per_e,
        ELEMENTARY_CHARGE / 5.5e-15 * 1e6,
        max_relative = 1e-12
    );
}

#[test]
fn test_floating_diffusion_outside_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = fixture_analysis(dir.path());

    assert!(matches!(
        analysis.floating_diffusion_at(2.5),
        Err(AnalysisError::FloatingDiffusion(
            FloatingDiffusionError::Interp(_)
        ))
    ));
}

#[test]
fn test_saturation_sweep_shape_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let sweep = fixture_analysis(dir.path())
        .max_radiometric_estimation()
        .unwrap();

    assert_eq!(sweep.irradiance.dim(), (5, 33));
    assert_eq!(sweep.exposures[0], Duration::from_micros(40));

    // Flat QE 0.56 at 550 nm gives R = 497.7 V/(J/m²)
    let area = 5.2e-6 * 5.2e-6 * 1280.0 * 1024.0;
    let expected = 1.2 / (497.7 * 40e-6);
    assert_relative_eq!(sweep.irradiance[[0, 15]], expected, max_relative = 1e-9);
    assert_relative_eq!(sweep.flux[[0, 15]], expected * area, max_relative = 1e-9);

    // Longer exposures need less light
    for col in 0..33 {
        for row in 1..5 {
            assert!(sweep.irradiance[[row, col]] < sweep.irradiance[[row - 1, col]]);
        }
    }
}

#[test]
fn test_filter_loss_is_compensated() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = fixture_analysis(dir.path());

    let sweep = analysis.max_radiometric_estimation().unwrap();
    let corrected = analysis.optical_consideration().unwrap();

    // 50 % filter, unit lens
    assert_relative_eq!(
        corrected.flux[[4, 0]],
        sweep.flux[[4, 0]] * MILLI * 2.0,
        max_relative = 1e-12
    );
}

#[test]
fn test_opaque_filter_sample_fails() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = fixture_analysis(dir.path());
    let mut filter = flat_table(50.0);
    filter[32].1 = 0.0;
    write_two_column_csv(dir.path(), "transmitance-lctf.csv", &filter).unwrap();

    assert!(matches!(
        analysis.optical_consideration(),
        Err(AnalysisError::Domain(_))
    ));
}

#[test]
fn test_missing_qe_table_fails_before_plotting() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = fixture_analysis(dir.path());
    std::fs::remove_file(dir.path().join("qe-dcc1545m.csv")).unwrap();

    assert!(analysis.run_all().is_err());
    assert!(!dir.path().join("charts/spectral-responsivity-quantum-eff.pdf").exists());
}

#[test]
fn test_interpolated_lookup_on_coarse_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut analysis = fixture_analysis(dir.path());
    write_two_column_csv(
        dir.path(),
        "qe-dcc1545m.csv",
        &[(380.0, 0.3), (550.0, 0.56), (760.0, 0.2)],
    )
    .unwrap();
    analysis.config.qe_lookup = QeLookup::Interpolated;

    let result = analysis.responsivity_from_qe().unwrap();
    assert_eq!(result.responsivity.len(), 33);
    assert_relative_eq!(result.responsivity.values()[15], 497.7, epsilon = 1e-9);
}
