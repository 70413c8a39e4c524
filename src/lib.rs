//! # fcm-sweep: Parameter Sweeps for Finite-Context Model Tools
//!
//! fcm-sweep drives external finite-context compression tools across a
//! grid of context orders `k` and smoothing parameters `alpha`, collects
//! what they print, and turns it into plots.
//!
//! Two workflows are supported:
//!
//! - **Complexity profile**: run the profiler once per `(k, alpha)`, parse
//!   its `position value symbol` lines, and plot raw plus smoothed
//!   bits-per-symbol against sequence position.
//! - **Optimization**: train one model per `k`, score a sequence database
//!   with it for every `alpha`, pull the NRC of each target out of the
//!   ranking, and draw one heatmap per target.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Jidoka**: a failing grid point is recorded and the sweep moves on
//! - **Muda elimination**: one training run per `k`, reused by every `alpha`
//! - **Poka-Yoke safety**: grids reject empty, invalid and duplicate axes
//! - **Genchi Genbutsu**: skipped output lines are counted, never hidden
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fcm_sweep::config::ProfileConfig;
//! use fcm_sweep::runner::SystemRunner;
//! use fcm_sweep::sweep::ProfileWorkflow;
//! use std::path::Path;
//!
//! let config = ProfileConfig::default();
//! let grid = config.grid(Some(3), Some(0.05))?;
//! let sweep = ProfileWorkflow::new(&config, SystemRunner::new())
//!     .run(&grid, Path::new("model.txt"), Path::new("sequence.txt"));
//!
//! println!("{}", sweep.report.to_table());
//! # Ok::<(), fcm_sweep::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod grid;
pub mod metrics;
pub mod parser;
pub mod render;
pub mod runner;
pub mod series;
pub mod sweep;
pub mod table;

pub use error::{Error, Result};
pub use grid::{ParameterGrid, ParameterPoint};
pub use metrics::TargetMetricMap;
pub use series::ComplexitySeries;
pub use table::{Outcome, ResultTable};
