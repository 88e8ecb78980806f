//! Floating diffusion capacitance against lithographic feature size

use std::path::Path;

use plotters::prelude::*;

use super::{render_chart, series_color, PlotError, DESC_SIZE, FONT, LABEL_SIZE};
use crate::hardware::floating_diffusion::FloatingDiffusionCurve;

pub fn plot_floating_capacitance(
    path: &Path,
    curve: &FloatingDiffusionCurve,
    png_preview: bool,
) -> Result<(), PlotError> {
    let points = curve.points();

    render_chart(path, png_preview, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..2.0, 0.0..20.0)?;

        chart
            .configure_mesh()
            .x_labels(5)
            .x_label_formatter(&|x| format!("{x:.1}"))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .x_desc("Minimum lithographic feature size [μm]")
            .y_desc("Floating diffusion capacitance [fF]")
            .axis_desc_style((FONT, DESC_SIZE))
            .label_style((FONT, LABEL_SIZE))
            .bold_line_style(BLACK.mix(0.5))
            .light_line_style(WHITE.mix(0.0))
            .draw()?;

        chart.draw_series(LineSeries::new(points, series_color(0).stroke_width(2)))?;

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_capacitance_chart_with_preview() {
        let curve = FloatingDiffusionCurve::new(vec![0.25, 0.5, 1.0, 1.8], vec![2.0, 3.5, 7.0, 14.0]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floating-diff-capacitance.pdf");
        plot_floating_capacitance(&path, &curve, true).unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
        assert!(path.with_extension("png").exists());
    }
}
