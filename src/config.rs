//! Sweep configuration
//!
//! Both workflows receive an immutable configuration struct at startup.
//! Defaults reproduce the axes and paths the model tools are normally run
//! with; the optimization workflow can also be loaded from a JSON file,
//! which only accepts the recognised options.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::grid::ParameterGrid;
use crate::parser::DEFAULT_METRIC_LABEL;
use crate::{Error, Result};

/// Profile-tool executable for the current platform.
#[must_use]
pub fn default_profiler() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("./fcm.exe")
    } else {
        PathBuf::from("./fcm")
    }
}

/// Configuration for the complexity-profile workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Context orders swept when none is pinned
    pub k_axis: Vec<u32>,
    /// Smoothing values swept when none is pinned
    pub alpha_axis: Vec<f64>,
    /// Profiling executable
    pub executable: PathBuf,
    /// Directory receiving one image per grid point
    pub output_dir: PathBuf,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            k_axis: (1..=10).collect(),
            alpha_axis: vec![0.01, 0.05, 0.1, 0.2, 0.5],
            executable: default_profiler(),
            output_dir: PathBuf::from("img"),
        }
    }
}

impl ProfileConfig {
    /// Build the grid, honouring optional pinned values.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for partial pinning or invalid values.
    pub fn grid(&self, k: Option<u32>, alpha: Option<f64>) -> Result<ParameterGrid> {
        ParameterGrid::from_pins(k, alpha, self.k_axis.clone(), self.alpha_axis.clone())
    }
}

/// External tools used by the optimization workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolPaths {
    /// Model training executable (`-i <meta> -k <k>`)
    pub trainer: PathBuf,
    /// Database scoring executable (`-db <db> -m <model> -a <alpha> -t <top>`)
    pub scorer: PathBuf,
    /// Directory where the trainer deposits `k<k>.bin`
    pub trainer_output_dir: PathBuf,
    /// How many ranked sequences the scorer reports
    pub top_count: u32,
    /// Label preceding the metric in scorer output
    pub metric_label: String,
    /// Directory receiving one heatmap per target
    pub heatmap_dir: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            trainer: PathBuf::from("./src/bin/models_generator.out"),
            scorer: PathBuf::from("./src/bin/main.out"),
            trainer_output_dir: PathBuf::from("models"),
            // High enough to include every target in the report
            top_count: 100,
            metric_label: DEFAULT_METRIC_LABEL.to_string(),
            heatmap_dir: PathBuf::from("."),
        }
    }
}

/// Configuration for the `(k, alpha)` optimization workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeConfig {
    /// Context orders (heatmap rows)
    pub k_axis: Vec<u32>,
    /// Smoothing values (heatmap columns)
    pub alpha_axis: Vec<f64>,
    /// Sequence identifiers whose metric is tracked
    pub target_ids: Vec<String>,
    /// Training sequence (metagenome sample)
    pub meta_path: PathBuf,
    /// Database of sequences to score
    pub db_path: PathBuf,
    /// Sweep-local directory for relocated models
    pub models_dir: PathBuf,
    /// Directory for raw per-point scorer output
    pub results_dir: PathBuf,
    /// Executables and their conventions
    pub tools: ToolPaths,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            k_axis: vec![7, 9, 11, 13],
            alpha_axis: vec![0.01, 0.05, 0.1, 0.2],
            target_ids: vec!["New1".to_string(), "New2".to_string()],
            meta_path: PathBuf::from("txt_files/meta_4.txt"),
            db_path: PathBuf::from("txt_files/db_4.txt"),
            models_dir: PathBuf::from("models_heat"),
            results_dir: PathBuf::from("results_heat"),
            tools: ToolPaths::default(),
        }
    }
}

impl OptimizeConfig {
    /// Load and validate a JSON configuration file.
    ///
    /// Omitted keys take their default values; unknown keys are rejected.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read, parsed, or
    /// fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate().map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Check axes, targets and tool settings.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.grid()?;
        if self.target_ids.is_empty() {
            return Err(Error::InvalidInput("target_ids must not be empty".into()));
        }
        if self.target_ids.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::InvalidInput("target_ids must not contain blanks".into()));
        }
        if self.tools.metric_label.trim().is_empty() {
            return Err(Error::InvalidInput("metric_label must not be empty".into()));
        }
        Ok(())
    }

    /// Cross-product grid of both axes.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if an axis is empty, invalid or repeats
    /// a value.
    pub fn grid(&self) -> Result<ParameterGrid> {
        ParameterGrid::axes(self.k_axis.clone(), self.alpha_axis.clone())
    }

    /// Where the trainer leaves the model for `k`.
    #[must_use]
    pub fn produced_model_path(&self, k: u32) -> PathBuf {
        self.tools.trainer_output_dir.join(format!("k{k}.bin"))
    }

    /// Sweep-local home of the model for `k`.
    #[must_use]
    pub fn model_path(&self, k: u32) -> PathBuf {
        self.models_dir.join(format!("k{k}.bin"))
    }

    /// Raw scorer output file for one point.
    #[must_use]
    pub fn result_path(&self, k: u32, alpha: f64) -> PathBuf {
        self.results_dir.join(format!("result_k{k}_a{alpha}.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let config = ProfileConfig::default();
        assert_eq!(config.k_axis.len(), 10);
        assert_eq!(config.grid(None, None).unwrap().len(), 50);
        assert_eq!(config.grid(Some(3), Some(0.05)).unwrap().len(), 1);
    }

    #[test]
    fn test_optimize_defaults_validate() {
        let config = OptimizeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.grid().unwrap().len(), 16);
    }

    #[test]
    fn test_paths() {
        let config = OptimizeConfig::default();
        assert_eq!(config.model_path(9), PathBuf::from("models_heat/k9.bin"));
        assert_eq!(config.produced_model_path(9), PathBuf::from("models/k9.bin"));
        assert_eq!(
            config.result_path(7, 0.05),
            PathBuf::from("results_heat/result_k7_a0.05.txt")
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: OptimizeConfig =
            serde_json::from_str(r#"{"k_axis": [2, 3], "target_ids": ["X"]}"#).unwrap();
        assert_eq!(config.k_axis, vec![2, 3]);
        assert_eq!(config.alpha_axis, vec![0.01, 0.05, 0.1, 0.2]);
        assert_eq!(config.tools.top_count, 100);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let parsed = serde_json::from_str::<OptimizeConfig>(r#"{"k_values": [2]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validate_rejects_empty_targets() {
        let config = OptimizeConfig { target_ids: vec![], ..OptimizeConfig::default() };
        assert!(config.validate().is_err());
    }
}
