//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use super::{OutputArgs, PresetName};
use crate::config::RunConfig;
use crate::error::Result;
use crate::models::ModelRegistry;
use crate::pipeline::{Pipeline, RunReport};

/// Run a comparison from a config file.
pub fn run_config(path: &Path, output: &OutputArgs) -> Result<()> {
    info!("Loading run configuration: {}", path.display());

    let mut config = RunConfig::load(path)?;
    output.apply(&mut config);
    execute(&config)
}

/// Run or save a built-in comparison.
pub fn run_preset(name: PresetName, save: Option<&Path>, output: &OutputArgs) -> Result<()> {
    let mut config = name.config();
    output.apply(&mut config);

    if let Some(path) = save {
        config.save(path)?;
        println!("Preset written: {}", path.display());
        return Ok(());
    }

    info!("Running preset {:?}", name);
    execute(&config)
}

/// List the registered models.
pub fn list_models() -> Result<()> {
    let registry = ModelRegistry::with_defaults();

    println!("Registered models ({}):", registry.len());
    for model in registry.list_model_info() {
        println!("  {:<16} {:?}  {}", model.id, model.control, model.description);
    }

    Ok(())
}

fn execute(config: &RunConfig) -> Result<()> {
    let registry = ModelRegistry::with_defaults();
    let report = Pipeline::new(&registry).run(config)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "Compared {} models over {} samples",
        report.models.len(),
        report.num_samples
    );
    for path in report.artifacts.iter().chain(&report.wav_files) {
        println!("  {}", path.display());
    }
}
