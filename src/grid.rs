//! Parameter grid enumeration
//!
//! A grid is either a single pinned `(k, alpha)` point or the row-major
//! cross product of a `k` axis and an `alpha` axis. Outer axis (`k`) varies
//! slowest, so every `alpha` for a given `k` is visited consecutively.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::{Error, Result};

/// One `(k, alpha)` combination.
///
/// Identity is value-based: two points with equal `k` and bit-equal
/// `alpha` hash and compare equal.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParameterPoint {
    k: u32,
    alpha: f64,
}

impl ParameterPoint {
    /// Create a point, validating `k >= 1` and `alpha > 0`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if either value is out of range.
    pub fn new(k: u32, alpha: f64) -> Result<Self> {
        validate_k(k)?;
        validate_alpha(alpha)?;
        Ok(Self { k, alpha })
    }

    /// Context order.
    #[must_use]
    pub const fn k(&self) -> u32 {
        self.k
    }

    /// Smoothing parameter.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl PartialEq for ParameterPoint {
    fn eq(&self, other: &Self) -> bool {
        self.k == other.k && self.alpha.to_bits() == other.alpha.to_bits()
    }
}

impl Eq for ParameterPoint {}

impl Hash for ParameterPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.k.hash(state);
        self.alpha.to_bits().hash(state);
    }
}

impl fmt::Display for ParameterPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k={}, alpha={}", self.k, self.alpha)
    }
}

/// The set of points a sweep visits.
///
/// Only the validating constructors build a grid, so every grid is
/// non-empty, holds in-range values and repeats no point.
///
/// ```compile_fail
/// use fcm_sweep::grid::ParameterGrid;
///
/// let grid = ParameterGrid::Axes { k_axis: vec![0, 0], alpha_axis: vec![] };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid(GridKind);

#[derive(Debug, Clone, PartialEq)]
enum GridKind {
    Pinned(ParameterPoint),
    Axes { k_axis: Vec<u32>, alpha_axis: Vec<f64> },
}

impl ParameterGrid {
    /// Grid with exactly one point.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `k` or `alpha` is out of range.
    pub fn pinned(k: u32, alpha: f64) -> Result<Self> {
        Ok(Self(GridKind::Pinned(ParameterPoint::new(k, alpha)?)))
    }

    /// Cross-product grid.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if an axis is empty, holds an
    /// out-of-range value, or repeats a value.
    pub fn axes(k_axis: Vec<u32>, alpha_axis: Vec<f64>) -> Result<Self> {
        if k_axis.is_empty() {
            return Err(Error::InvalidInput("k axis must not be empty".into()));
        }
        if alpha_axis.is_empty() {
            return Err(Error::InvalidInput("alpha axis must not be empty".into()));
        }
        for (i, &k) in k_axis.iter().enumerate() {
            validate_k(k)?;
            if k_axis[..i].contains(&k) {
                return Err(Error::InvalidInput(format!("duplicate k value {k} in axis")));
            }
        }
        for (i, &alpha) in alpha_axis.iter().enumerate() {
            validate_alpha(alpha)?;
            if alpha_axis[..i].iter().any(|a| a.to_bits() == alpha.to_bits()) {
                return Err(Error::InvalidInput(format!(
                    "duplicate alpha value {alpha} in axis"
                )));
            }
        }
        Ok(Self(GridKind::Axes { k_axis, alpha_axis }))
    }

    /// Pick pinned mode when both values are given, axis mode when neither is.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` when exactly one of `k`/`alpha` is
    /// pinned, or when any value is out of range.
    pub fn from_pins(
        k: Option<u32>,
        alpha: Option<f64>,
        k_axis: Vec<u32>,
        alpha_axis: Vec<f64>,
    ) -> Result<Self> {
        match (k, alpha) {
            (Some(k), Some(alpha)) => Self::pinned(k, alpha),
            (None, None) => Self::axes(k_axis, alpha_axis),
            (Some(_), None) => Err(Error::InvalidInput(
                "-k was given without -a; pin both or neither".into(),
            )),
            (None, Some(_)) => Err(Error::InvalidInput(
                "-a was given without -k; pin both or neither".into(),
            )),
        }
    }

    /// True when the grid was built from a single pinned point.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        matches!(self.0, GridKind::Pinned(_))
    }

    /// Number of points, `|k| * |alpha|` in axis mode.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.0 {
            GridKind::Pinned(_) => 1,
            GridKind::Axes { k_axis, alpha_axis } => k_axis.len() * alpha_axis.len(),
        }
    }

    /// A validated grid is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row labels (distinct `k` values, in order).
    #[must_use]
    pub fn k_values(&self) -> Vec<u32> {
        match &self.0 {
            GridKind::Pinned(p) => vec![p.k],
            GridKind::Axes { k_axis, .. } => k_axis.clone(),
        }
    }

    /// Column labels (distinct `alpha` values, in order).
    #[must_use]
    pub fn alpha_values(&self) -> Vec<f64> {
        match &self.0 {
            GridKind::Pinned(p) => vec![p.alpha],
            GridKind::Axes { alpha_axis, .. } => alpha_axis.clone(),
        }
    }

    /// Points in row-major order.
    #[must_use]
    pub fn points(&self) -> Vec<ParameterPoint> {
        match &self.0 {
            GridKind::Pinned(p) => vec![*p],
            GridKind::Axes { k_axis, alpha_axis } => k_axis
                .iter()
                .flat_map(|&k| alpha_axis.iter().map(move |&alpha| ParameterPoint { k, alpha }))
                .collect(),
        }
    }
}

fn validate_k(k: u32) -> Result<()> {
    if k == 0 {
        return Err(Error::InvalidInput("k must be >= 1".into()));
    }
    Ok(())
}

fn validate_alpha(alpha: f64) -> Result<()> {
    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(Error::InvalidInput(format!(
            "alpha must be a positive finite number, got {alpha}"
        )));
    }
    Ok(())
}
