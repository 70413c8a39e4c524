//! `(k, alpha)` optimization workflow
//!
//! Training depends on `k` only, scoring on `(k, alpha)`:
//!
//! ```text
//! trainer -i <meta> -k <k>                          # once per k
//! scorer  -db <db> -m <model> -a <alpha> -t <top>   # once per (k, alpha)
//! ```
//!
//! The trainer drops its model at a fixed relative path, so the artifact
//! is moved into the sweep's models directory right after it appears;
//! otherwise the next `k` would overwrite it. Artifacts are memoized per
//! `k`: the first grid point with a given `k` trains, every later point
//! reuses the result (including a failed result, which then costs no
//! further training attempts).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;

use tracing::{debug, info, warn};

use crate::artifact::ModelArtifact;
use crate::config::OptimizeConfig;
use crate::grid::{ParameterGrid, ParameterPoint};
use crate::metrics::TargetMetricMap;
use crate::parser::{extract_metrics, MetricPattern};
use crate::runner::{Capture, ProcessRunner};
use crate::sweep::{SweepOutput, SweepReport, Sweeper};
use crate::table::{Outcome, ResultTable};
use crate::{Error, Result};

/// Drives training and scoring across a grid.
#[derive(Debug)]
pub struct OptimizeWorkflow<'a, R> {
    config: &'a OptimizeConfig,
    runner: R,
    pattern: MetricPattern,
}

impl<'a, R: ProcessRunner> OptimizeWorkflow<'a, R> {
    /// Create a workflow; the configuration is validated up front.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the configuration is invalid.
    pub fn new(config: &'a OptimizeConfig, runner: R) -> Result<Self> {
        config.validate()?;
        let pattern = MetricPattern::new(&config.tools.metric_label)?;
        Ok(Self { config, runner, pattern })
    }

    /// Give back the runner (useful for inspecting test doubles).
    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Create every directory the sweep writes into.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a directory cannot be created.
    pub fn prepare_dirs(&self) -> Result<()> {
        for dir in [
            &self.config.models_dir,
            &self.config.results_dir,
            &self.config.tools.trainer_output_dir,
            &self.config.tools.heatmap_dir,
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Run the full sweep.
    ///
    /// # Errors
    ///
    /// Returns an error only for setup problems (invalid grid, directories
    /// that cannot be created). Per-point failures are recorded in the
    /// result table instead.
    pub fn run(&mut self) -> Result<OptimizeSweep> {
        let grid = self.config.grid()?;
        self.prepare_dirs()?;

        let config = self.config;
        let pattern = &self.pattern;
        let runner = &mut self.runner;
        let mut models: HashMap<u32, std::result::Result<ModelArtifact, String>> = HashMap::new();
        let mut training_runs = 0_usize;

        let output = Sweeper::new("optimize").execute(&grid, |point| {
            let model = match models.entry(point.k()) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => {
                    training_runs += 1;
                    e.insert(train(&mut *runner, config, point.k()).map_err(|err| {
                        warn!(
                            k = point.k(),
                            error = %err,
                            "Training failed; every alpha for this k is skipped"
                        );
                        err.to_string()
                    }))
                }
            };
            let model = model.as_ref().map_err(|reason| Error::Artifact {
                path: config.model_path(point.k()),
                message: format!("no trained model for k={}: {reason}", point.k()),
            })?;
            score(&mut *runner, config, pattern, model, point)
        });

        let mut artifacts: Vec<ModelArtifact> = models.into_values().filter_map(|m| m.ok()).collect();
        artifacts.sort_by_key(ModelArtifact::k);

        Ok(OptimizeSweep {
            grid,
            targets: self.config.target_ids.clone(),
            output,
            artifacts,
            training_runs,
        })
    }
}

fn train<R: ProcessRunner>(runner: &mut R, config: &OptimizeConfig, k: u32) -> Result<ModelArtifact> {
    info!("Training model for k={k}...");
    let args = vec![
        "-i".to_string(),
        config.meta_path.to_string_lossy().into_owned(),
        "-k".to_string(),
        k.to_string(),
    ];
    let output = runner.run(&config.tools.trainer.to_string_lossy(), &args, &Capture::Memory)?;
    if let Some(stdout) = output.stdout() {
        debug!(k, stdout = stdout.trim(), "trainer finished");
    }
    ModelArtifact::relocate(k, &config.produced_model_path(k), &config.model_path(k))
}

fn score<R: ProcessRunner>(
    runner: &mut R,
    config: &OptimizeConfig,
    pattern: &MetricPattern,
    model: &ModelArtifact,
    point: &ParameterPoint,
) -> Result<Option<TargetMetricMap>> {
    let result_path = config.result_path(point.k(), point.alpha());
    let args = vec![
        "-db".to_string(),
        config.db_path.to_string_lossy().into_owned(),
        "-m".to_string(),
        model.path().to_string_lossy().into_owned(),
        "-a".to_string(),
        point.alpha().to_string(),
        "-t".to_string(),
        config.tools.top_count.to_string(),
    ];
    runner.run(&config.tools.scorer.to_string_lossy(), &args, &Capture::file(&result_path))?;

    // Undecodable bytes only spoil the lines that hold them
    let bytes = fs::read(&result_path)?;
    let text = String::from_utf8_lossy(&bytes);
    let metrics = extract_metrics(&text, &config.target_ids, pattern);
    for (target, value) in metrics.iter() {
        if value.is_none() {
            debug!(%point, target_id = target, "target not found in scorer output");
        }
    }
    Ok((metrics.found_count() > 0).then_some(metrics))
}

/// Results of an optimization sweep.
#[derive(Debug, Clone)]
pub struct OptimizeSweep {
    grid: ParameterGrid,
    targets: Vec<String>,
    output: SweepOutput<TargetMetricMap>,
    artifacts: Vec<ModelArtifact>,
    training_runs: usize,
}

impl OptimizeSweep {
    /// The swept grid.
    #[must_use]
    pub const fn grid(&self) -> &ParameterGrid {
        &self.grid
    }

    /// Tracked target identifiers, in configuration order.
    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Per-point metric maps.
    #[must_use]
    pub const fn table(&self) -> &ResultTable<ParameterPoint, TargetMetricMap> {
        &self.output.table
    }

    /// Per-point lifecycle records.
    #[must_use]
    pub const fn report(&self) -> &SweepReport {
        &self.output.report
    }

    /// Successfully trained models, ordered by `k`.
    #[must_use]
    pub fn artifacts(&self) -> &[ModelArtifact] {
        &self.artifacts
    }

    /// Number of training invocations made.
    #[must_use]
    pub const fn training_runs(&self) -> usize {
        self.training_runs
    }

    /// The sub-sweep for one target, keyed by `(k, alpha)`.
    ///
    /// Points where the run failed, or the target was absent from the
    /// output, carry the "no data" marker.
    #[must_use]
    pub fn target_table(&self, target: &str) -> ResultTable<ParameterPoint, f64> {
        let mut table = ResultTable::new();
        for (point, outcome) in self.output.table.iter() {
            match outcome {
                Outcome::Data(map) => match map.get(target) {
                    Some(value) => table.insert(*point, value),
                    None => table.mark_missing(*point, format!("{target} not found in output")),
                },
                Outcome::NoData(reason) => table.mark_missing(*point, reason.clone()),
            }
        }
        table
    }

    /// All targets flattened into one table keyed by `(target, point)`.
    #[must_use]
    pub fn metric_table(&self) -> ResultTable<(String, ParameterPoint), f64> {
        let mut table = ResultTable::new();
        for target in &self.targets {
            for (point, outcome) in self.target_table(target).iter() {
                table.put((target.clone(), *point), outcome.clone());
            }
        }
        table
    }

    /// Lowest metric for `target` and the point that produced it.
    #[must_use]
    pub fn best(&self, target: &str) -> Option<(ParameterPoint, f64)> {
        self.target_table(target).min_entry().map(|(p, v)| (*p, v))
    }
}
