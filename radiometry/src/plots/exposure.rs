//! Semilog families of saturation curves, one series per exposure time

use std::path::Path;
use std::time::Duration;

use ndarray::Array2;
use plotters::prelude::*;

use super::{
    exposure_label, render_chart, series_color, LinePattern, PlotError, DESC_SIZE, FONT,
    LABEL_SIZE,
};
use crate::photometry::spectrum::{ANALYSIS_LOWER_NM, ANALYSIS_UPPER_NM};

/// Axis description and log-scale y range of a family chart
#[derive(Debug, Clone, Copy)]
pub struct FamilyChart {
    pub y_desc: &'static str,
    pub y_min: f64,
    pub y_max: f64,
}

/// Saturating spectral irradiance, mW/m²/nm
pub const IRRADIANCE_CHART: FamilyChart = FamilyChart {
    y_desc: "Spectral irradiance [mW/m²/nm]",
    y_min: 1.0,
    y_max: 1e6,
};

/// Saturating spectral flux at the sensor, mW/nm
pub const FLUX_CHART: FamilyChart = FamilyChart {
    y_desc: "Spectral radiant flux [mW/nm]",
    y_min: 1e-5,
    y_max: 1e2,
};

/// Source flux required upstream of filter and lens, mW/nm
pub const SYSTEM_FLUX_CHART: FamilyChart = FamilyChart {
    y_desc: "Spectral radiant flux [mW/nm]",
    y_min: 1e-4,
    y_max: 1e3,
};

/// Plot row `i` of `values` against row `i` of `wavelength`, labelled by `exposures[i]`.
pub fn plot_exposure_family(
    path: &Path,
    spec: &FamilyChart,
    wavelength: &Array2<f64>,
    values: &Array2<f64>,
    exposures: &[Duration],
    png_preview: bool,
) -> Result<(), PlotError> {
    let series: Vec<(String, Vec<(f64, f64)>)> = exposures
        .iter()
        .enumerate()
        .map(|(row, &exposure)| {
            let points = wavelength
                .row(row)
                .iter()
                .copied()
                .zip(values.row(row).iter().copied())
                .collect();
            (exposure_label(exposure), points)
        })
        .collect();

    render_chart(path, png_preview, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(
                ANALYSIS_LOWER_NM..ANALYSIS_UPPER_NM,
                (spec.y_min..spec.y_max).log_scale(),
            )?;

        chart
            .configure_mesh()
            .x_labels(9)
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.0e}"))
            .x_desc("Wavelength [nm]")
            .y_desc(spec.y_desc)
            .axis_desc_style((FONT, DESC_SIZE))
            .label_style((FONT, LABEL_SIZE))
            .bold_line_style(BLACK.mix(0.5))
            .light_line_style(BLACK.mix(0.1))
            .draw()?;

        for (index, (label, points)) in series.into_iter().enumerate() {
            let color = series_color(index);
            let style = color.stroke_width(2);

            let anno = match LinePattern::for_series(index) {
                LinePattern::Solid => chart.draw_series(LineSeries::new(points, style))?,
                LinePattern::Dashed => {
                    chart.draw_series(DashedLineSeries::new(points, 10, 6, style))?
                }
                LinePattern::DashDot => {
                    chart.draw_series(DashedLineSeries::new(points, 12, 4, style))?
                }
                LinePattern::Dotted => {
                    chart.draw_series(DashedLineSeries::new(points, 2, 4, style))?
                }
                LinePattern::SolidMarked => {
                    chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))?;
                    chart.draw_series(LineSeries::new(points, style))?
                }
            };
            anno.label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((FONT, LABEL_SIZE))
            .background_style(RGBColor(230, 230, 230).mix(0.6))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photometry::exposure::{ExposureSweep, DEFAULT_EXPOSURES, MILLI};
    use crate::photometry::spectrum::{analysis_grid, SpectralCurve};

    #[test]
    fn test_writes_family_chart() {
        let r = SpectralCurve::constant(analysis_grid(), 400.0).unwrap();
        let sweep = ExposureSweep::run(&r, 1.2, &DEFAULT_EXPOSURES, 1.4e-6)
            .unwrap()
            .scaled(MILLI);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("max-spectral-flux-mt9m001.pdf");
        plot_exposure_family(
            &path,
            &FLUX_CHART,
            &sweep.wavelength,
            &sweep.flux,
            &sweep.exposures,
            false,
        )
        .unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
