use crate::config::ImageFormat;
use crate::error::ChartError;
use crate::font::FAMILY;
use crate::frame::{Column, MeasurementFrame};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::Path;

/// Largest figure, in pixels, the bitmap backend is asked to allocate.
pub const MAX_PIXELS: u64 = 100_000_000;
const FIGURE_INCHES: (f64, f64) = (6.4, 4.8);
const ERROR_PCT_RANGE: std::ops::Range<f64> = 0.0..101.0;

// matplotlib's blue, cyan, orange and brown
const PALETTE: [RGBColor; 4] = [
    RGBColor(0, 0, 255),
    RGBColor(0, 255, 255),
    RGBColor(255, 165, 0),
    RGBColor(165, 42, 42),
];
const ERROR_COLOR: RGBColor = RGBColor(255, 0, 0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub dpi: u32,
    pub text: bool,
}

impl ChartStyle {
    pub fn size(&self) -> (u32, u32) {
        (
            (FIGURE_INCHES.0 * self.dpi as f64).round() as u32,
            (FIGURE_INCHES.1 * self.dpi as f64).round() as u32,
        )
    }

    /// Pixel count of the figure, `None` when it overflows.
    pub fn pixel_count(&self) -> Option<u64> {
        let width = (FIGURE_INCHES.0 * self.dpi as f64).round() as u64;
        let height = (FIGURE_INCHES.1 * self.dpi as f64).round() as u64;
        width.checked_mul(height)
    }

    fn points(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    fn pixels(&self, points: f64) -> u32 {
        self.points(points).round().max(1.0) as u32
    }
}

pub struct Plot<'a> {
    pub name: &'a str,
    pub frame: &'a MeasurementFrame,
    pub columns: &'a [Column],
    pub style: ChartStyle,
}

impl<'a> Plot<'a> {
    /// Primary-axis columns in selection order, and whether the error
    /// percentage goes on the secondary axis.
    fn split_columns(&self) -> (Vec<Column>, bool) {
        let primary = self
            .columns
            .iter()
            .copied()
            .filter(|column| *column != Column::ErrorPctMovingAverage)
            .collect();
        (primary, self.columns.contains(&Column::ErrorPctMovingAverage))
    }
}

pub fn render_to_file(path: &Path, format: ImageFormat, plot: &Plot) -> Result<(), ChartError> {
    match plot.style.pixel_count() {
        Some(pixels) if pixels <= MAX_PIXELS => {}
        _ => {
            return Err(ChartError::Draw(
                path.to_path_buf(),
                format!("dpi {} gives a figure above {} pixels", plot.style.dpi, MAX_PIXELS),
            ))
        }
    }
    let size = plot.style.size();
    let result = match format {
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw(&root, plot)
                .and_then(|_| root.present())
                .map_err(|error| error.to_string())
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw(&root, plot)
                .and_then(|_| root.present())
                .map_err(|error| error.to_string())
        }
    };
    result.map_err(|reason| ChartError::Draw(path.to_path_buf(), reason))
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plot: &Plot,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let style = plot.style;
    let (primary, error_pct) = plot.split_columns();
    root.fill(&WHITE)?;

    let x_max = (plot.frame.len().max(2) - 1) as f64;
    let y_max = plot
        .frame
        .max_value(&primary)
        .filter(|max| *max > 0.0)
        .unwrap_or(1.0)
        * 1.05;

    let mut builder = ChartBuilder::on(root);
    builder.margin(style.pixels(10.0));
    if style.text {
        builder
            .caption(plot.name, (FAMILY, style.points(12.0)))
            .x_label_area_size(style.pixels(30.0))
            .y_label_area_size(style.pixels(48.0));
        if error_pct {
            builder.right_y_label_area_size(style.pixels(40.0));
        }
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?
        .set_secondary_coord(0f64..x_max, ERROR_PCT_RANGE);

    let label_style = (FAMILY, style.points(10.0));
    if style.text {
        chart
            .configure_mesh()
            .x_desc("Total Requests")
            .y_desc("Time (ms)")
            .label_style(label_style)
            .axis_desc_style(label_style)
            .draw()?;
    } else {
        chart.configure_mesh().draw()?;
    }

    let line_width = style.pixels(1.5);
    for (column, color) in primary.iter().zip(PALETTE.iter().cycle()) {
        let color = *color;
        chart
            .draw_series(LineSeries::new(
                plot.frame.points(*column),
                color.stroke_width(line_width),
            ))?
            .label(column.name())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(line_width))
            });
    }

    if error_pct {
        if style.text {
            chart
                .configure_secondary_axes()
                .y_desc("Error (%)")
                .label_style(label_style)
                .axis_desc_style(label_style)
                .draw()?;
        }
        chart
            .draw_secondary_series(LineSeries::new(
                plot.frame.points(Column::ErrorPctMovingAverage),
                ERROR_COLOR.stroke_width(line_width),
            ))?
            .label(format!("{} (right)", Column::ErrorPctMovingAverage))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], ERROR_COLOR.stroke_width(line_width))
            });
    }

    if style.text {
        chart
            .configure_series_labels()
            .label_font(label_style)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;
    }
    Ok(())
}
