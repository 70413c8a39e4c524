//! Sweep orchestration (Kaizen: data-driven hyperparameter selection)
//!
//! [`Sweeper::execute`] walks a [`ParameterGrid`] in order and runs a
//! per-point action. Whatever the action reports, every point ends up in
//! the [`ResultTable`]: either with data, or with an explicit "no data"
//! marker. A failing point never aborts the rest of the sweep.
//!
//! Two concrete workflows sit on top:
//!
//! - [`profile`]: one scoring run per `(k, alpha)`, yielding a
//!   [`ComplexitySeries`](crate::series::ComplexitySeries).
//! - [`optimize`]: one training run per distinct `k`, reused by every
//!   `alpha`, yielding a
//!   [`TargetMetricMap`](crate::metrics::TargetMetricMap) per point.

pub mod optimize;
pub mod profile;
pub mod record;

pub use optimize::{OptimizeSweep, OptimizeWorkflow};
pub use profile::{ProfileSweep, ProfileWorkflow};
pub use record::{PointRecord, PointStatus, SweepReport};

use tracing::{info, warn};

use crate::grid::{ParameterGrid, ParameterPoint};
use crate::metrics::TargetMetricMap;
use crate::series::ComplexitySeries;
use crate::table::ResultTable;
use crate::Result;

/// One-line description of a point's payload for reports.
pub trait PointSummary {
    /// Human-readable summary.
    fn summary(&self) -> String;
}

impl PointSummary for ComplexitySeries {
    fn summary(&self) -> String {
        match self.mean() {
            Some(mean) => format!("{} points, mean {mean:.3} bps", self.len()),
            None => "0 points".to_string(),
        }
    }
}

impl PointSummary for TargetMetricMap {
    fn summary(&self) -> String {
        self.iter()
            .map(|(id, v)| match v {
                Some(v) => format!("{id}={v:.4}"),
                None => format!("{id}=-"),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Results of a sweep: the table plus per-point records.
#[derive(Debug, Clone)]
pub struct SweepOutput<V> {
    /// Outcome per grid point, in grid order
    pub table: ResultTable<ParameterPoint, V>,
    /// Lifecycle record per grid point
    pub report: SweepReport,
}

/// Sequential sweep executor.
#[derive(Debug, Clone)]
pub struct Sweeper {
    workflow: String,
}

impl Sweeper {
    /// Create a sweeper labelled `workflow` in logs and reports.
    #[must_use]
    pub fn new(workflow: impl Into<String>) -> Self {
        Self { workflow: workflow.into() }
    }

    /// Run `action` for every point of `grid`, in grid order.
    ///
    /// - `Ok(Some(v))` records `v`
    /// - `Ok(None)` records "no data" (the tool ran but gave nothing usable)
    /// - `Err(e)` logs the failure and records "no data" with the reason
    pub fn execute<V, F>(&self, grid: &ParameterGrid, mut action: F) -> SweepOutput<V>
    where
        V: PointSummary,
        F: FnMut(&ParameterPoint) -> Result<Option<V>>,
    {
        let mut table = ResultTable::new();
        let mut report = SweepReport::new(self.workflow.clone());

        for point in grid.points() {
            info!(workflow = %self.workflow, "Testing {point}...");
            let mut record = PointRecord::new(point);
            record.start();

            match action(&point) {
                Ok(Some(value)) => {
                    record.complete(PointStatus::Success, value.summary());
                    table.insert(point, value);
                }
                Ok(None) => {
                    warn!("No valid data returned for {point}");
                    record.complete(PointStatus::NoData, "no valid data returned");
                    table.mark_missing(point, "no valid data returned");
                }
                Err(e) => {
                    warn!(error = %e, "Error testing {point}");
                    let reason = e.to_string();
                    record.complete(PointStatus::Failed, reason.clone());
                    table.mark_missing(point, reason);
                }
            }

            report.push(record);
        }

        info!(
            workflow = %self.workflow,
            points = table.len(),
            with_data = table.data_count(),
            missing = table.missing_count(),
            "sweep finished"
        );

        SweepOutput { table, report }
    }
}
