//! Publication charts for the sensor characterization
//!
//! Charts are drawn with plotters into an in-memory SVG, then converted to
//! vector PDF. An optional PNG preview is rasterized from the same SVG.

pub mod capacitance;
pub mod exposure;
pub mod responsivity;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::info;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use thiserror::Error;

use crate::algo::format_decimal;

pub use capacitance::plot_floating_capacitance;
pub use exposure::{plot_exposure_family, FamilyChart, FLUX_CHART, IRRADIANCE_CHART, SYSTEM_FLUX_CHART};
pub use responsivity::plot_radiant_responsivity;

/// Chart size in SVG user units, 8 x 6 inches at 100 units per inch
pub const CHART_SIZE: (u32, u32) = (800, 600);

/// SVG user units per inch when placing the chart on a PDF page
const UNITS_PER_INCH: f32 = 100.0;

pub(crate) const FONT: &str = "serif";
pub(crate) const LABEL_SIZE: f64 = 16.0;
pub(crate) const DESC_SIZE: f64 = 18.0;

/// Errors while drawing or writing a chart
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Drawing failed: {0}")]
    Draw(String),

    #[error("Rendered SVG is invalid: {0}")]
    Svg(String),

    #[error("PDF conversion failed: {0}")]
    Pdf(String),

    #[error("PNG preview failed: {0}")]
    Png(String),

    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Draw(err.to_string())
    }
}

/// Draw a chart and write it to `path` as PDF, overwriting any existing file.
///
/// With `png_preview` a PNG with the same stem is written alongside.
pub fn render_chart<F>(path: &Path, png_preview: bool, draw: F) -> Result<(), PlotError>
where
    F: for<'a, 'b> FnOnce(&'b DrawingArea<SVGBackend<'a>, Shift>) -> Result<(), PlotError>,
{
    let svg = render_svg(draw)?;

    write_pdf(&svg, path)?;
    info!("Chart saved to: {}", path.display());

    if png_preview {
        let png_path = path.with_extension("png");
        write_png(&svg, &png_path)?;
        info!("Preview saved to: {}", png_path.display());
    }

    Ok(())
}

/// Draw a chart into an SVG document
pub fn render_svg<F>(draw: F) -> Result<String, PlotError>
where
    F: for<'a, 'b> FnOnce(&'b DrawingArea<SVGBackend<'a>, Shift>) -> Result<(), PlotError>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

fn write_pdf(svg: &str, path: &Path) -> Result<(), PlotError> {
    use svg2pdf::usvg;

    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();

    let mut options = usvg::Options::default();
    options.fontdb = Arc::new(fontdb);
    options.font_family = "DejaVu Serif".to_string();

    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| PlotError::Svg(e.to_string()))?;

    let mut page = svg2pdf::PageOptions::default();
    page.dpi = UNITS_PER_INCH;

    let pdf = svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), page)
        .map_err(|e| PlotError::Pdf(format!("{e:?}")))?;

    std::fs::write(path, pdf).map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_png(svg: &str, path: &Path) -> Result<(), PlotError> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();

    let options = usvg::Options {
        fontdb: Arc::new(fontdb),
        font_family: "DejaVu Serif".to_string(),
        text_rendering: usvg::TextRendering::GeometricPrecision,
        shape_rendering: usvg::ShapeRendering::GeometricPrecision,
        ..Default::default()
    };

    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| PlotError::Svg(e.to_string()))?;

    let (width, height) = CHART_SIZE;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PlotError::Png("Failed to create pixmap".to_string()))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap
        .save_png(path)
        .map_err(|e| PlotError::Png(e.to_string()))
}

/// Legend text for an exposure time, e.g. `t_exp = 0,04 ms`
///
/// Always in milliseconds, down to nanosecond resolution, with a decimal
/// comma to match the published figures.
pub fn exposure_label(exposure: Duration) -> String {
    let millis = exposure.as_nanos() as f64 / 1e6;
    format!("t_exp = {} ms", format_decimal(millis, 6).replace('.', ","))
}

/// Line pattern for the `index`-th series of a family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePattern {
    Solid,
    Dashed,
    DashDot,
    Dotted,
    SolidMarked,
}

impl LinePattern {
    /// Patterns cycle solid, dashed, dash-dot, dotted, solid with markers
    pub fn for_series(index: usize) -> Self {
        match index % 5 {
            0 => Self::Solid,
            1 => Self::Dashed,
            2 => Self::DashDot,
            3 => Self::Dotted,
            _ => Self::SolidMarked,
        }
    }
}

/// Colors cycled across series
pub(crate) fn series_color(index: usize) -> RGBColor {
    const PALETTE: [RGBColor; 5] = [
        RGBColor(31, 119, 180),
        RGBColor(255, 127, 14),
        RGBColor(44, 160, 44),
        RGBColor(214, 39, 40),
        RGBColor(148, 103, 189),
    ];
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposure_labels() {
        assert_eq!(exposure_label(Duration::from_micros(40)), "t_exp = 0,04 ms");
        assert_eq!(exposure_label(Duration::from_millis(1)), "t_exp = 1 ms");
        assert_eq!(exposure_label(Duration::from_millis(983)), "t_exp = 983 ms");
        assert_eq!(exposure_label(Duration::from_micros(1500)), "t_exp = 1,5 ms");
        assert_eq!(exposure_label(Duration::from_micros(2500)), "t_exp = 2,5 ms");
    }

    #[test]
    fn test_sub_microsecond_exposure_label() {
        assert_eq!(exposure_label(Duration::from_nanos(500)), "t_exp = 0,0005 ms");
        assert_eq!(exposure_label(Duration::from_nanos(40_250)), "t_exp = 0,04025 ms");
    }

    #[test]
    fn test_line_patterns_cycle() {
        assert_eq!(LinePattern::for_series(0), LinePattern::Solid);
        assert_eq!(LinePattern::for_series(4), LinePattern::SolidMarked);
        assert_eq!(LinePattern::for_series(5), LinePattern::Solid);
    }

    #[test]
    fn test_render_svg_produces_document() {
        let svg = render_svg(|root| {
            let mut chart = ChartBuilder::on(root)
                .margin(10)
                .x_label_area_size(30)
                .y_label_area_size(30)
                .build_cartesian_2d(0.0..1.0, 0.0..1.0)?;
            chart.configure_mesh().draw()?;
            chart.draw_series(LineSeries::new(vec![(0.0, 0.0), (1.0, 1.0)], BLUE))?;
            Ok(())
        })
        .unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_render_chart_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.pdf");

        render_chart(&path, true, |root| {
            let mut chart = ChartBuilder::on(root).build_cartesian_2d(0.0..1.0, 0.0..1.0)?;
            chart.draw_series(LineSeries::new(vec![(0.0, 1.0), (1.0, 0.0)], RED))?;
            Ok(())
        })
        .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(path.with_extension("png").exists());
    }
}
