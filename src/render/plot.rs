//! plotters-backed SVG renderer

use std::error::Error as StdError;
use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{Heatmap, ProfilePlot, Renderer};
use crate::{Error, Result};

type DrawResult = std::result::Result<(), Box<dyn StdError>>;

const COLOR_BAR_WIDTH: u32 = 130;
const COLOR_BAR_STEPS: usize = 64;

/// Writes plots as SVG files.
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    profile_size: (u32, u32),
    heatmap_size: (u32, u32),
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self { profile_size: (1400, 700), heatmap_size: (800, 600) }
    }
}

impl SvgRenderer {
    /// Renderer with default canvas sizes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the profile canvas size in pixels.
    #[must_use]
    pub const fn with_profile_size(mut self, width: u32, height: u32) -> Self {
        self.profile_size = (width, height);
        self
    }

    /// Override the heatmap canvas size in pixels.
    #[must_use]
    pub const fn with_heatmap_size(mut self, width: u32, height: u32) -> Self {
        self.heatmap_size = (width, height);
        self
    }
}

impl Renderer for SvgRenderer {
    fn render_profile(&mut self, plot: &ProfilePlot, path: &Path) -> Result<()> {
        draw_profile(plot, path, self.profile_size)
            .map_err(|e| Error::Render(format!("{}: {e}", path.display())))
    }

    fn render_heatmap(&mut self, heatmap: &Heatmap, path: &Path) -> Result<()> {
        draw_heatmap(heatmap, path, self.heatmap_size)
            .map_err(|e| Error::Render(format!("{}: {e}", path.display())))
    }
}

fn draw_profile(plot: &ProfilePlot, path: &Path, size: (u32, u32)) -> DrawResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = padded_range(plot.raw.iter().map(|p| p.0));
    let y_range = padded_range(plot.raw.iter().chain(&plot.smoothed).map(|p| p.1));

    let mut chart = ChartBuilder::on(&root)
        .caption(&plot.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(&plot.x_label)
        .y_desc(&plot.y_label)
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    chart
        .draw_series(
            plot.raw
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, CYAN.mix(0.5).filled())),
        )?
        .label("Raw Data")
        .legend(|(x, y)| Circle::new((x + 10, y), 3, CYAN.filled()));

    chart
        .draw_series(LineSeries::new(plot.smoothed.iter().copied(), BLUE.stroke_width(2)))?
        .label("Smoothed Trend")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_heatmap(heatmap: &Heatmap, path: &Path, size: (u32, u32)) -> DrawResult {
    let rows = heatmap.k_values.len();
    let cols = heatmap.alpha_values.len();
    let range = heatmap.value_range();

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let (main, bar) = root.split_horizontally(size.0.saturating_sub(COLOR_BAR_WIDTH));

    #[allow(clippy::cast_precision_loss)]
    let (cols_f, rows_f) = (cols as f64, rows as f64);
    let mut chart = ChartBuilder::on(&main)
        .caption(&heatmap.title, ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..cols_f - 0.5, -0.5..rows_f - 0.5)?;

    // imshow layout: row 0 sits at the top
    let row_at = |y: f64| -> Option<usize> { cell_index(rows_f - 1.0 - y, rows) };
    let x_fmt = |x: &f64| {
        cell_index(*x, cols).map_or_else(String::new, |j| heatmap.alpha_values[j].to_string())
    };
    let y_fmt = |y: &f64| row_at(*y).map_or_else(String::new, |i| heatmap.k_values[i].to_string());

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(cols)
        .y_labels(rows)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_desc("Alpha")
        .y_desc("k (context size)")
        .draw()?;

    let Some((lo, hi)) = range else {
        root.present()?;
        return Ok(());
    };

    for (i, row) in heatmap.cells.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = rows_f - 1.0 - i as f64;
        for (j, &value) in row.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let x = j as f64;
            let t = normalize(value, lo, hi);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                ramp(t).filled(),
            )))?;
            let text_color = if t < 0.5 { WHITE } else { BLACK };
            chart.draw_series(std::iter::once(Text::new(
                format!("{value:.3}"),
                (x, y),
                ("sans-serif", 14)
                    .into_font()
                    .color(&text_color)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            )))?;
        }
    }

    draw_color_bar(&bar, &heatmap.metric, lo, hi)?;
    root.present()?;
    Ok(())
}

fn draw_color_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    metric: &str,
    lo: f64,
    hi: f64,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let (lo, hi) = if (hi - lo).abs() < f64::EPSILON { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let mut chart = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(70)
        .margin_right(10)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..1.0, lo..hi)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(metric)
        .draw()?;

    #[allow(clippy::cast_precision_loss)]
    let step = (hi - lo) / COLOR_BAR_STEPS as f64;
    chart.draw_series((0..COLOR_BAR_STEPS).map(|s| {
        #[allow(clippy::cast_precision_loss)]
        let y0 = lo + step * s as f64;
        Rectangle::new([(0.0, y0), (1.0, y0 + step)], ramp(normalize(y0, lo, hi)).filled())
    }))?;
    Ok(())
}

/// Dark purple (low) through teal to yellow (high).
fn ramp(t: f64) -> HSLColor {
    let t = t.clamp(0.0, 1.0);
    HSLColor(0.78 - 0.62 * t, 0.75, 0.22 + 0.45 * t)
}

fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if (hi - lo).abs() < f64::EPSILON {
        0.5
    } else {
        (value - lo) / (hi - lo)
    }
}

/// Cell index for an axis coordinate that falls on a cell centre.
fn cell_index(coord: f64, len: usize) -> Option<usize> {
    let rounded = coord.round();
    if (coord - rounded).abs() > 1e-6 || rounded < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = rounded as usize;
    (idx < len).then_some(idx)
}

/// Data bounds widened by 5% (or by 1 for a flat range).
fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = if (hi - lo).abs() < f64::EPSILON { 1.0 } else { (hi - lo) * 0.05 };
    (lo - pad)..(hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ParameterGrid, ParameterPoint};
    use crate::series::ComplexitySeries;
    use crate::table::ResultTable;

    #[test]
    fn test_cell_index() {
        assert_eq!(cell_index(0.0, 3), Some(0));
        assert_eq!(cell_index(2.0, 3), Some(2));
        assert_eq!(cell_index(3.0, 3), None);
        assert_eq!(cell_index(0.5, 3), None);
        assert_eq!(cell_index(-1.0, 3), None);
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range([2.0, 2.0].into_iter()), 1.0..3.0);
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);
        let r = padded_range([0.0, 10.0].into_iter());
        assert!((r.start + 0.5).abs() < 1e-12 && (r.end - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_render_profile_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.svg");
        let point = ParameterPoint::new(2, 0.1).unwrap();
        let series: ComplexitySeries =
            (0..20).map(|i| (i, 1.5 + f64::from(i as u32 % 3))).collect();

        SvgRenderer::new()
            .render_profile(&ProfilePlot::from_series(&point, &series), &path)
            .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_render_heatmap_with_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap.svg");
        let grid = ParameterGrid::axes(vec![7, 9], vec![0.01, 0.1]).unwrap();
        let mut table = ResultTable::new();
        table.insert(ParameterPoint::new(7, 0.01).unwrap(), 0.61);
        table.insert(ParameterPoint::new(9, 0.1).unwrap(), 0.48);
        let heatmap = Heatmap::from_table("NRC values for New1", "NRC", &grid, &table);

        SvgRenderer::new().render_heatmap(&heatmap, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_render_empty_heatmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        let grid = ParameterGrid::axes(vec![7], vec![0.01]).unwrap();
        let heatmap = Heatmap::from_table("empty", "NRC", &grid, &ResultTable::new());

        SvgRenderer::new().render_heatmap(&heatmap, &path).unwrap();
        assert!(path.exists());
    }
}
