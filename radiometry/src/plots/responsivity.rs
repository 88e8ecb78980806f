//! Spectral responsivity and quantum efficiency on twin axes

use std::path::Path;

use plotters::prelude::*;

use super::{render_chart, PlotError, DESC_SIZE, FONT, LABEL_SIZE};
use crate::photometry::quantum_efficiency::QuantumEfficiency;
use crate::photometry::responsivity::PLOT_SCALE_UJ_CM2;
use crate::photometry::spectrum::{SpectralCurve, ANALYSIS_LOWER_NM, ANALYSIS_UPPER_NM};

const RESPONSIVITY_MAX: f64 = 6.0;
const QE_MAX: f64 = 0.6;

/// Responsivity in V/(μJ/cm²) on the left axis, QE on the right axis.
///
/// `responsivity` is in V/(J/m²), as produced by the estimator.
pub fn plot_radiant_responsivity(
    path: &Path,
    responsivity: &SpectralCurve,
    qe: &QuantumEfficiency,
    png_preview: bool,
) -> Result<(), PlotError> {
    let responsivity_points = responsivity.scaled(PLOT_SCALE_UJ_CM2).points();
    let wavelength_range = ANALYSIS_LOWER_NM..ANALYSIS_UPPER_NM;
    let qe_points: Vec<(f64, f64)> = qe
        .curve()
        .iter()
        .filter(|(w, _)| (ANALYSIS_LOWER_NM..=ANALYSIS_UPPER_NM).contains(w))
        .collect();

    render_chart(path, png_preview, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .right_y_label_area_size(70)
            .build_cartesian_2d(wavelength_range.clone(), 0.0..RESPONSIVITY_MAX)?
            .set_secondary_coord(wavelength_range.clone(), 0.0..QE_MAX);

        chart
            .configure_mesh()
            .x_labels(9)
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .x_desc("Wavelength [nm]")
            .y_desc("Spectral responsivity [V/(μJ/cm²)]")
            .axis_desc_style((FONT, DESC_SIZE))
            .label_style((FONT, LABEL_SIZE))
            .bold_line_style(BLACK.mix(0.5))
            .light_line_style(WHITE.mix(0.0))
            .draw()?;

        chart
            .configure_secondary_axes()
            .y_labels(7)
            .y_label_formatter(&|y| format!("{y:.1}"))
            .y_desc("Quantum efficiency")
            .axis_desc_style(FONT.into_font().resize(DESC_SIZE).color(&BLUE))
            .label_style((FONT, LABEL_SIZE))
            .draw()?;

        chart
            .draw_series(LineSeries::new(responsivity_points, RED.stroke_width(2)))?
            .label("R_e,λ")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .draw_secondary_series(DashedLineSeries::new(
                qe_points,
                8,
                5,
                BLUE.stroke_width(2),
            ))?
            .label("QE")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerMiddle)
            .label_font((FONT, LABEL_SIZE))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photometry::responsivity::ResponsivityEstimator;
    use crate::photometry::spectrum::analysis_grid;

    #[test]
    fn test_writes_responsivity_chart() {
        let grid = analysis_grid();
        let values = grid.iter().map(|w| 0.2 + (w - 400.0) / 1000.0).collect();
        let qe = QuantumEfficiency::from_table(grid.clone(), values).unwrap();
        let responsivity = ResponsivityEstimator::default().estimate(&qe, &grid).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectral-responsivity-quantum-eff.pdf");
        plot_radiant_responsivity(&path, &responsivity, &qe, false).unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
