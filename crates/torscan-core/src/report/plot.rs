//! Scan-profile figures using plotters (SVG output).
//!
//! The SVG backend keeps figure rendering free of system font and display
//! dependencies, so figures come out identical on headless cluster nodes.

use super::ReportError;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::path::Path;

const X_LABEL: &str = "angle (degrees)";
const Y_LABEL: &str = "energy (kcal/mol)";
const FIGURE_SIZE: (u32, u32) = (800, 500);
const MARKER_SIZE: i32 = 4;

/// One labeled (angle, relative-energy) series of a figure.
#[derive(Debug, Clone)]
pub struct FigureSeries<'a> {
    pub label: &'a str,
    pub points: Vec<(f64, f64)>,
}

impl<'a> FigureSeries<'a> {
    pub fn new(label: &'a str, angles: &[f64], energies: &[f64]) -> Self {
        Self {
            label,
            points: angles.iter().copied().zip(energies.iter().copied()).collect(),
        }
    }
}

/// Renders a scatter figure of one or two scan profiles.
///
/// The primary series draws in blue, the secondary in red, matching the
/// MM/QM color convention of the combined figure.
pub fn scatter_figure(
    path: &Path,
    title: &str,
    primary: &FigureSeries,
    secondary: Option<&FigureSeries>,
) -> Result<(), ReportError> {
    let render = |message: String| ReportError::Render {
        path: path.to_path_buf(),
        message,
    };

    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render(e.to_string()))?;

    let mut all_points = primary.points.clone();
    if let Some(s) = secondary {
        all_points.extend_from_slice(&s.points);
    }
    if all_points.is_empty() {
        root.draw(&Text::new(
            "No energy data",
            (400, 250),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))
        .map_err(|e| render(e.to_string()))?;
        root.present().map_err(|e| render(e.to_string()))?;
        return Ok(());
    }

    let (x_range, y_range) = axis_ranges(&all_points);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| render(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .draw()
        .map_err(|e| render(e.to_string()))?;

    draw_scatter(&mut chart, primary, &BLUE).map_err(render)?;
    if let Some(series) = secondary {
        draw_scatter(&mut chart, series, &RED).map_err(render)?;

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(|e| render(e.to_string()))?;
    }

    root.present().map_err(|e| render(e.to_string()))?;
    Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    series: &FigureSeries,
    color: &RGBColor,
) -> Result<(), String> {
    let style = color.filled();
    chart
        .draw_series(
            series
                .points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), MARKER_SIZE, style)),
        )
        .map_err(|e| e.to_string())?
        .label(series.label.to_string())
        .legend(move |(x, y)| Circle::new((x, y), MARKER_SIZE, style));
    Ok(())
}

fn axis_ranges(points: &[(f64, f64)]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    // Degenerate ranges (single point, flat profile) still need area.
    let x_pad = ((x_max - x_min) * 0.05).max(1.0);
    let y_pad = ((y_max - y_min) * 0.1).max(0.1);
    (
        (x_min - x_pad)..(x_max + x_pad),
        (y_min - y_pad)..(y_max + y_pad),
    )
}
