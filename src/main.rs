//! fcm-sweep CLI entry point.

use anyhow::Context;
use clap::Parser;
use fcm_sweep::cli::{self, Cli, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "fcm_sweep=debug" } else { "fcm_sweep=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let workflow = match cli.command {
        Command::Profile(_) => "profile",
        Command::Optimize(_) => "optimize",
    };

    if let Err(e) = cli::run(&cli).with_context(|| format!("{workflow} sweep failed")) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
