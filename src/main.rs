//! Circuit Compare CLI
//!
//! Command-line interface for the circuit comparison harness.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use circuit_compare::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Circuit Compare v{}", env!("CARGO_PKG_VERSION"));

    let outcome = match &cli.command {
        Commands::Run { config, output } => commands::run_config(config, output)
            .with_context(|| format!("run failed for {}", config.display())),
        Commands::Preset { name, save, output } => commands::run_preset(*name, save.as_deref(), output)
            .with_context(|| format!("preset {name:?} failed")),
        Commands::Models => commands::list_models().context("could not list models"),
    };

    if let Err(e) = &outcome {
        if let Some(cause) = e.downcast_ref::<circuit_compare::CompareError>() {
            error!("[{}] {}", cause.error_code(), cause);
            if cause.is_structural() {
                error!("Comparison aborted, the model set or its outputs are inconsistent");
            }
            for hint in cause.recovery_suggestions() {
                info!("  hint: {}", hint);
            }
        }
    }
    outcome
}
