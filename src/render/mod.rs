//! Visualization of sweep results
//!
//! The sweep never draws anything itself. It hands labelled data to a
//! [`Renderer`] sink: a [`ProfilePlot`] per profiled point, or a
//! [`Heatmap`] per optimization target. [`SvgRenderer`] is the plotters
//! implementation used by the CLI.

mod plot;

pub use plot::SvgRenderer;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::grid::{ParameterGrid, ParameterPoint};
use crate::series::ComplexitySeries;
use crate::sweep::profile::profile_image_path;
use crate::sweep::{OptimizeSweep, ProfileSweep};
use crate::table::{Outcome, ResultTable};
use crate::Result;

/// Data for one smoothed complexity-profile image.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePlot {
    /// Chart title
    pub title: String,
    /// X axis description
    pub x_label: String,
    /// Y axis description
    pub y_label: String,
    /// Raw `(position, bits)` samples, drawn as scattered points
    pub raw: Vec<(f64, f64)>,
    /// Smoothed trend, drawn as a line
    pub smoothed: Vec<(f64, f64)>,
}

impl ProfilePlot {
    /// Build the plot for one point's series.
    #[must_use]
    pub fn from_series(point: &ParameterPoint, series: &ComplexitySeries) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let xs: Vec<f64> = series.positions().into_iter().map(|p| p as f64).collect();
        let raw = xs.iter().copied().zip(series.values()).collect();
        let smoothed = xs.iter().copied().zip(series.smoothed()).collect();
        Self {
            title: format!("Sequence Complexity Profile (k={}, alpha={})", point.k(), point.alpha()),
            x_label: "Sequence Position".to_string(),
            y_label: "-log(P(e|c)) (Bits per Symbol)".to_string(),
            raw,
            smoothed,
        }
    }
}

/// A `k` x `alpha` matrix of one target's metric.
///
/// Missing cells hold NaN and are left blank when drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    /// Chart title
    pub title: String,
    /// Name of the plotted metric (colour bar label)
    pub metric: String,
    /// Row labels
    pub k_values: Vec<u32>,
    /// Column labels
    pub alpha_values: Vec<f64>,
    /// `cells[row][col]`, NaN where absent
    pub cells: Vec<Vec<f64>>,
}

impl Heatmap {
    /// Lay a target table out on the grid's axes.
    #[must_use]
    pub fn from_table(
        title: impl Into<String>,
        metric: impl Into<String>,
        grid: &ParameterGrid,
        table: &ResultTable<ParameterPoint, f64>,
    ) -> Self {
        let k_values = grid.k_values();
        let alpha_values = grid.alpha_values();
        let cells = k_values
            .iter()
            .map(|&k| {
                alpha_values
                    .iter()
                    .map(|&alpha| {
                        ParameterPoint::new(k, alpha)
                            .map_or(f64::NAN, |point| table.value_or_nan(&point))
                    })
                    .collect()
            })
            .collect();
        Self { title: title.into(), metric: metric.into(), k_values, alpha_values, cells }
    }

    /// Number of cells holding a value.
    #[must_use]
    pub fn populated(&self) -> usize {
        self.cells.iter().flatten().filter(|v| !v.is_nan()).count()
    }

    /// `(min, max)` over populated cells.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Sink that persists plots as image files.
pub trait Renderer {
    /// Write a profile plot to `path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Render` if drawing or writing fails.
    fn render_profile(&mut self, plot: &ProfilePlot, path: &Path) -> Result<()>;

    /// Write a heatmap to `path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Render` if drawing or writing fails.
    fn render_heatmap(&mut self, heatmap: &Heatmap, path: &Path) -> Result<()>;
}

/// Deterministic heatmap path: `<dir>/nrc_heatmap_<target>.svg`.
#[must_use]
pub fn heatmap_image_path(dir: &Path, target: &str) -> PathBuf {
    dir.join(format!("nrc_heatmap_{target}.svg"))
}

/// Render one image per profiled point with data.
///
/// Points recorded as "no data" are skipped quietly; the sweep has
/// already warned about them.
///
/// # Errors
///
/// Returns the first rendering error encountered.
pub fn render_profiles<Rd: Renderer>(
    renderer: &mut Rd,
    sweep: &ProfileSweep,
    input_file: &Path,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (point, outcome) in sweep.table.iter() {
        match outcome {
            Outcome::Data(series) if !series.is_empty() => {
                let path = profile_image_path(output_dir, input_file, point);
                renderer.render_profile(&ProfilePlot::from_series(point, series), &path)?;
                info!("Plot saved as {}", path.display());
                written.push(path);
            }
            Outcome::Data(_) => warn!("Skipping plot for {point} due to lack of valid data"),
            // Already reported by the sweep
            Outcome::NoData(reason) => debug!(%point, reason = reason.as_str(), "no plot"),
        }
    }
    Ok(written)
}

/// Render one heatmap per target of an optimization sweep.
///
/// # Errors
///
/// Returns the first rendering error encountered.
pub fn render_heatmaps<Rd: Renderer>(
    renderer: &mut Rd,
    sweep: &OptimizeSweep,
    metric: &str,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for target in sweep.targets() {
        let heatmap = Heatmap::from_table(
            format!("{metric} values for {target}"),
            metric,
            sweep.grid(),
            &sweep.target_table(target),
        );
        if heatmap.populated() == 0 {
            warn!("No {metric} values for {target}; heatmap will be empty");
        }
        let path = heatmap_image_path(output_dir, target);
        renderer.render_heatmap(&heatmap, &path)?;
        info!("Heatmap saved as {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_plot_from_series() {
        let point = ParameterPoint::new(1, 0.1).unwrap();
        let series: ComplexitySeries = vec![(5, 2.0), (6, 4.0)].into_iter().collect();
        let plot = ProfilePlot::from_series(&point, &series);

        assert_eq!(plot.raw, vec![(5.0, 2.0), (6.0, 4.0)]);
        assert_eq!(plot.smoothed, vec![(5.0, 2.0), (6.0, 3.0)]);
        assert!(plot.title.contains("k=1"));
    }

    #[test]
    fn test_heatmap_from_sparse_table() {
        let grid = ParameterGrid::axes(vec![7, 9], vec![0.01, 0.1]).unwrap();
        let mut table = ResultTable::new();
        table.insert(ParameterPoint::new(7, 0.01).unwrap(), 0.5);
        table.mark_missing(ParameterPoint::new(7, 0.1).unwrap(), "absent");
        table.insert(ParameterPoint::new(9, 0.1).unwrap(), 0.25);

        let heatmap = Heatmap::from_table("t", "NRC", &grid, &table);

        assert_eq!(heatmap.cells.len(), 2);
        assert!((heatmap.cells[0][0] - 0.5).abs() < f64::EPSILON);
        assert!(heatmap.cells[0][1].is_nan());
        assert!(heatmap.cells[1][0].is_nan());
        assert_eq!(heatmap.populated(), 2);
        assert_eq!(heatmap.value_range(), Some((0.25, 0.5)));
    }

    #[test]
    fn test_heatmap_image_path() {
        assert_eq!(
            heatmap_image_path(Path::new("."), "New1"),
            PathBuf::from("./nrc_heatmap_New1.svg")
        );
    }
}
