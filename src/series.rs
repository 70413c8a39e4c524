//! Per-symbol complexity series
//!
//! A [`ComplexitySeries`] is the profile workflow's payload: one
//! `(position, bits-per-symbol)` pair per scored symbol, ordered by
//! position as the tool emitted them.

use serde::Serialize;

/// Trailing window used to smooth complexity curves.
pub const SMOOTHING_WINDOW: usize = 5;

/// A single `(position, value)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    position: u64,
    value: f64,
}

impl SeriesPoint {
    /// Create a sample.
    #[must_use]
    pub const fn new(position: u64, value: f64) -> Self {
        Self { position, value }
    }

    /// Symbol index in the input sequence.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Model surprise at this position, in bits.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}

/// Complexity trace in the order the tool emitted it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplexitySeries {
    points: Vec<SeriesPoint>,
}

impl ComplexitySeries {
    /// Create an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample.
    ///
    /// Returns `false` if `position` is lower than the previous sample's;
    /// the sample is kept either way.
    pub fn push(&mut self, position: u64, value: f64) -> bool {
        let in_order = !self.points.last().is_some_and(|last| position < last.position);
        self.points.push(SeriesPoint::new(position, value));
        in_order
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when the tool produced no usable samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples in order.
    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Positions column.
    #[must_use]
    pub fn positions(&self) -> Vec<u64> {
        self.points.iter().map(SeriesPoint::position).collect()
    }

    /// Values column.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(SeriesPoint::value).collect()
    }

    /// Trailing moving average over [`SMOOTHING_WINDOW`] samples.
    #[must_use]
    pub fn smoothed(&self) -> Vec<f64> {
        moving_average(&self.values(), SMOOTHING_WINDOW)
    }

    /// Mean bits per symbol, `None` for an empty series.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.points.len() as f64;
        Some(self.points.iter().map(SeriesPoint::value).sum::<f64>() / n)
    }
}

impl FromIterator<(u64, f64)> for ComplexitySeries {
    fn from_iter<I: IntoIterator<Item = (u64, f64)>>(iter: I) -> Self {
        let mut series = Self::new();
        for (position, value) in iter {
            series.push(position, value);
        }
        series
    }
}

/// Trailing moving average.
///
/// Element `i` averages `values[i + 1 - w ..= i]`; the first `window - 1`
/// elements average over however many samples exist so far, so the output
/// has the same length as the input and no undefined entries.
#[must_use]
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        #[allow(clippy::cast_precision_loss)]
        let n = (i + 1).min(window) as f64;
        out.push(sum / n);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_partial_window() {
        let avg = moving_average(&[2.0, 4.0, 6.0, 8.0, 10.0, 12.0], 5);
        assert_eq!(avg.len(), 6);
        assert!((avg[0] - 2.0).abs() < 1e-12);
        assert!((avg[1] - 3.0).abs() < 1e-12);
        assert!((avg[4] - 6.0).abs() < 1e-12);
        // Window slides: (4+6+8+10+12)/5
        assert!((avg[5] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_moving_average_empty() {
        assert!(moving_average(&[], SMOOTHING_WINDOW).is_empty());
    }

    #[test]
    fn test_push_keeps_decreasing_position() {
        let mut series = ComplexitySeries::new();
        assert!(series.push(5, 2.3));
        assert!(series.push(5, 2.0));
        assert!(!series.push(4, 1.0));
        assert_eq!(series.positions(), vec![5, 5, 4]);
        assert_eq!(series.values(), vec![2.3, 2.0, 1.0]);
    }

    #[test]
    fn test_mean() {
        let series: ComplexitySeries = vec![(0, 1.0), (1, 3.0)].into_iter().collect();
        assert_eq!(series.mean(), Some(2.0));
        assert_eq!(ComplexitySeries::new().mean(), None);
    }
}
