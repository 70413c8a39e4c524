//! Command-line surface
//!
//! ```text
//! fcm-sweep [-v] profile <source_file> <input_file> [-k <k> -a <alpha>]
//! fcm-sweep [-v] optimize [--config <json>] [--report <path>]
//! ```
//!
//! `-k` and `-a` pin a single point and must be given together; either one
//! alone is an argument error.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::{OptimizeConfig, ProfileConfig};
use crate::render::{render_heatmaps, render_profiles, Renderer, SvgRenderer};
use crate::runner::{ProcessRunner, SystemRunner};
use crate::sweep::{OptimizeSweep, OptimizeWorkflow, ProfileSweep, ProfileWorkflow, SweepReport};
use crate::Result;

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "fcm-sweep")]
#[command(about = "Parameter sweeps over (k, alpha) for finite-context model tools")]
#[command(version)]
pub struct Cli {
    /// Debug-level logging (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workflow to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available workflows.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plot the per-symbol complexity profile of a sequence across (k, alpha)
    Profile(ProfileArgs),
    /// Train and score across (k, alpha), then draw one heatmap per target
    Optimize(OptimizeArgs),
}

/// Arguments of `profile`.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Model or reference sequence file
    pub source_file: PathBuf,

    /// Sequence to profile
    pub input_file: PathBuf,

    /// Pin the context order (requires -a)
    #[arg(short, requires = "alpha")]
    pub k: Option<u32>,

    /// Pin the smoothing parameter (requires -k)
    #[arg(short = 'a', requires = "k")]
    pub alpha: Option<f64>,

    /// Profiling executable
    #[arg(long)]
    pub executable: Option<PathBuf>,

    /// Directory for generated images
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Write the per-point JSON report here
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl ProfileArgs {
    /// Default configuration with command-line overrides applied.
    #[must_use]
    pub fn config(&self) -> ProfileConfig {
        let mut config = ProfileConfig::default();
        if let Some(executable) = &self.executable {
            config.executable.clone_from(executable);
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        config
    }
}

/// Arguments of `optimize`.
#[derive(Debug, Args)]
pub struct OptimizeArgs {
    /// JSON configuration; omitted keys keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the per-point JSON report here
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl OptimizeArgs {
    /// Load the configuration file, or fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be used.
    pub fn config(&self) -> Result<OptimizeConfig> {
        self.config
            .as_ref()
            .map_or_else(|| Ok(OptimizeConfig::default()), OptimizeConfig::from_file)
    }
}

/// Dispatch a parsed command line with the real process runner and the
/// SVG renderer.
///
/// # Errors
///
/// Returns argument, configuration, rendering and report-writing errors.
/// Per-point tool failures are recorded, not returned.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Profile(args) => {
            profile(args, SystemRunner::new(), &mut SvgRenderer::new()).map(|_| ())
        }
        Command::Optimize(args) => {
            optimize(args, SystemRunner::new(), &mut SvgRenderer::new()).map(|_| ())
        }
    }
}

/// Run the profile workflow, render its images and print the summary.
///
/// # Errors
///
/// Returns `Error::InvalidInput` for bad pinned values, or rendering and
/// I/O errors.
pub fn profile<R, Rd>(args: &ProfileArgs, runner: R, renderer: &mut Rd) -> Result<ProfileSweep>
where
    R: ProcessRunner,
    Rd: Renderer,
{
    let config = args.config();
    let grid = config.grid(args.k, args.alpha)?;
    fs::create_dir_all(&config.output_dir)?;

    info!(points = grid.len(), input = %args.input_file.display(), "Starting complexity profile sweep");
    let sweep = ProfileWorkflow::new(&config, runner).run(&grid, &args.source_file, &args.input_file);
    let images = render_profiles(renderer, &sweep, &args.input_file, &config.output_dir)?;

    println!("{}", sweep.report.to_table());
    println!("{} image(s) written to {}", images.len(), config.output_dir.display());
    write_report(args.report.as_deref(), &sweep.report)?;
    Ok(sweep)
}

/// Run the optimization workflow, render heatmaps and print the best
/// point per target.
///
/// # Errors
///
/// Returns configuration, setup, rendering and I/O errors.
pub fn optimize<R, Rd>(args: &OptimizeArgs, runner: R, renderer: &mut Rd) -> Result<OptimizeSweep>
where
    R: ProcessRunner,
    Rd: Renderer,
{
    let config = args.config()?;
    let label = config.tools.metric_label.clone();

    info!(
        k_values = config.k_axis.len(),
        alpha_values = config.alpha_axis.len(),
        targets = config.target_ids.len(),
        "Starting (k, alpha) optimization sweep"
    );
    let sweep = OptimizeWorkflow::new(&config, runner)?.run()?;
    render_heatmaps(renderer, &sweep, &label, &config.tools.heatmap_dir)?;

    println!("{}", sweep.report().to_table());
    for target in sweep.targets() {
        match sweep.best(target) {
            Some((point, value)) => println!("Lowest {label} for {target}: {value:.4} at {point}"),
            None => println!("No {label} values recorded for {target}"),
        }
    }
    write_report(args.report.as_deref(), sweep.report())?;
    Ok(sweep)
}

fn write_report(path: Option<&Path>, report: &SweepReport) -> Result<()> {
    if let Some(path) = path {
        report.write_json(path)?;
        info!("Report written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("fcm-sweep").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pinned_point_yields_single_grid_point() {
        let cli = parse(&["profile", "model.txt", "seq.txt", "-k", "3", "-a", "0.05"]).unwrap();
        let Command::Profile(args) = cli.command else {
            panic!("expected profile command");
        };
        let grid = args.config().grid(args.k, args.alpha).unwrap();
        let points = grid.points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].k(), 3);
        assert!((points[0].alpha() - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unpinned_profile_uses_full_grid() {
        let cli = parse(&["profile", "model.txt", "seq.txt"]).unwrap();
        let Command::Profile(args) = cli.command else {
            panic!("expected profile command");
        };
        assert_eq!(args.config().grid(args.k, args.alpha).unwrap().len(), 50);
    }

    #[test]
    fn test_partial_pinning_is_an_argument_error() {
        assert!(parse(&["profile", "m", "s", "-k", "3"]).is_err());
        assert!(parse(&["profile", "m", "s", "-a", "0.1"]).is_err());
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        assert!(parse(&["profile", "m", "s", "-k", "three", "-a", "0.1"]).is_err());
        assert!(parse(&["profile", "m", "s", "-k", "3", "-a", "x"]).is_err());
        assert!(parse(&["profile", "m", "s", "--bogus"]).is_err());
    }

    #[test]
    fn test_profile_overrides() {
        let cli = parse(&[
            "-v",
            "profile",
            "m",
            "s",
            "--executable",
            "/opt/fcm",
            "--output-dir",
            "plots",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Profile(args) = cli.command else {
            panic!("expected profile command");
        };
        let config = args.config();
        assert_eq!(config.executable, PathBuf::from("/opt/fcm"));
        assert_eq!(config.output_dir, PathBuf::from("plots"));
    }

    #[test]
    fn test_optimize_without_config_uses_defaults() {
        let cli = parse(&["optimize"]).unwrap();
        let Command::Optimize(args) = cli.command else {
            panic!("expected optimize command");
        };
        assert_eq!(args.config().unwrap(), OptimizeConfig::default());
    }
}
