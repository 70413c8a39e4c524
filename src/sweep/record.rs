//! Point Record - execution lifecycle of one grid point

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::grid::ParameterPoint;
use crate::Result;

/// Status of a grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointStatus {
    /// Point is enumerated but not yet visited.
    Pending,
    /// External tools are running for this point.
    Running,
    /// Usable data was recorded.
    Success,
    /// The tools ran but produced nothing usable.
    NoData,
    /// A tool failed to launch or exited unsuccessfully.
    Failed,
}

impl PointStatus {
    /// Short label for tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "ok",
            Self::NoData => "no data",
            Self::Failed => "failed",
        }
    }
}

/// Point Record tracks one grid point from enumeration to outcome.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PointRecord {
    point: ParameterPoint,
    status: PointStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    detail: Option<String>,
}

impl PointRecord {
    /// Create a record in Pending status.
    #[must_use]
    pub const fn new(point: ParameterPoint) -> Self {
        Self { point, status: PointStatus::Pending, started_at: None, ended_at: None, detail: None }
    }

    /// The grid point.
    #[must_use]
    pub const fn point(&self) -> ParameterPoint {
        self.point
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> PointStatus {
        self.status
    }

    /// Start timestamp, once running.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// End timestamp, once complete.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Result summary or failure reason.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Transition from Pending to Running.
    pub fn start(&mut self) {
        self.status = PointStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Complete with a final status and a human-readable detail line.
    pub fn complete(&mut self, status: PointStatus, detail: impl Into<String>) {
        self.status = status;
        self.detail = Some(detail.into());
        self.ended_at = Some(Utc::now());
    }
}

/// Every point record of one sweep, in grid order.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    workflow: String,
    created_at: DateTime<Utc>,
    records: Vec<PointRecord>,
}

impl SweepReport {
    /// Create an empty report for `workflow`.
    #[must_use]
    pub fn new(workflow: impl Into<String>) -> Self {
        Self { workflow: workflow.into(), created_at: Utc::now(), records: Vec::new() }
    }

    /// Workflow name ("profile" or "optimize").
    #[must_use]
    pub fn workflow(&self) -> &str {
        &self.workflow
    }

    /// When the sweep started.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Append a finished record.
    pub fn push(&mut self, record: PointRecord) {
        self.records.push(record);
    }

    /// Records in grid order.
    #[must_use]
    pub fn records(&self) -> &[PointRecord] {
        &self.records
    }

    /// Number of records with `status`.
    #[must_use]
    pub fn count(&self, status: PointStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// Write the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Format as ASCII table.
    #[must_use]
    pub fn to_table(&self) -> String {
        let mut output = format!("{} sweep\n", self.workflow);
        output.push_str("┌──────┬────────────┬──────────┬──────────────────────────────────────┐\n");
        output.push_str("│ k    │ alpha      │ status   │ detail                               │\n");
        output.push_str("├──────┼────────────┼──────────┼──────────────────────────────────────┤\n");

        for record in &self.records {
            let _ = writeln!(
                output,
                "│ {:>4} │ {:>10} │ {:<8} │ {:<36} │",
                record.point.k(),
                record.point.alpha(),
                record.status.label(),
                truncate(record.detail().unwrap_or(""), 36),
            );
        }

        output.push_str("└──────┴────────────┴──────────┴──────────────────────────────────────┘\n");
        let _ = writeln!(
            output,
            "{} ok, {} no data, {} failed",
            self.count(PointStatus::Success),
            self.count(PointStatus::NoData),
            self.count(PointStatus::Failed)
        );
        output
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
