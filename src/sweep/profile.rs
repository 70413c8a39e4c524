//! Complexity-profile workflow
//!
//! For every `(k, alpha)` the profiler is run once against a fixed source
//! (model or reference) and input sequence:
//!
//! ```text
//! fcm -s <source_file> -i <input_file> -k <k> -a <alpha>
//! ```
//!
//! Its stdout is parsed in series mode into a
//! [`ComplexitySeries`](crate::series::ComplexitySeries).

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ProfileConfig;
use crate::grid::{ParameterGrid, ParameterPoint};
use crate::parser::parse_series;
use crate::runner::{Capture, ProcessRunner};
use crate::series::ComplexitySeries;
use crate::sweep::{SweepOutput, Sweeper};

/// Table and report of a profile sweep.
pub type ProfileSweep = SweepOutput<ComplexitySeries>;

/// Drives the profiler across a grid.
#[derive(Debug)]
pub struct ProfileWorkflow<'a, R> {
    config: &'a ProfileConfig,
    runner: R,
}

impl<'a, R: ProcessRunner> ProfileWorkflow<'a, R> {
    /// Create a workflow using `runner` to spawn the profiler.
    pub const fn new(config: &'a ProfileConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Give back the runner (useful for inspecting test doubles).
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Profile `input_file` against `source_file` at every grid point.
    pub fn run(&mut self, grid: &ParameterGrid, source_file: &Path, input_file: &Path) -> ProfileSweep {
        let program = self.config.executable.to_string_lossy().into_owned();
        let runner = &mut self.runner;

        Sweeper::new("profile").execute(grid, |point| {
            let args = profile_args(source_file, input_file, point);
            let output = runner.run(&program, &args, &Capture::Memory)?;
            let parse = parse_series(output.stdout().unwrap_or_default());
            debug!(
                %point,
                accepted = parse.accepted(),
                skipped = parse.skipped(),
                "parsed profile output"
            );
            Ok((!parse.is_empty()).then(|| parse.into_series()))
        })
    }
}

/// Argument vector for one profiler invocation.
#[must_use]
pub fn profile_args(source_file: &Path, input_file: &Path, point: &ParameterPoint) -> Vec<String> {
    vec![
        "-s".to_string(),
        source_file.to_string_lossy().into_owned(),
        "-i".to_string(),
        input_file.to_string_lossy().into_owned(),
        "-k".to_string(),
        point.k().to_string(),
        "-a".to_string(),
        point.alpha().to_string(),
    ]
}

/// Deterministic image path for one profiled point:
/// `<output_dir>/i_<input basename>_k_<k>_a_<alpha>.svg`.
#[must_use]
pub fn profile_image_path(output_dir: &Path, input_file: &Path, point: &ParameterPoint) -> PathBuf {
    let input_name = input_file
        .file_name()
        .map_or_else(|| input_file.to_string_lossy(), |n| n.to_string_lossy());
    output_dir.join(format!("i_{input_name}_k_{}_a_{}.svg", point.k(), point.alpha()))
}
