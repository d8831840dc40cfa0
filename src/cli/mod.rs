//! CLI Module
//!
//! Command-line interface for the circuit comparison harness.

pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::RunConfig;

/// Circuit Compare - side-by-side analysis of nonlinear audio circuit models
#[derive(Parser, Debug)]
#[command(name = "circuit-compare")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a comparison described by a JSON config
    #[command(name = "run")]
    Run {
        /// Path to the run configuration
        #[arg(short, long)]
        config: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run one of the built-in comparisons
    #[command(name = "preset")]
    Preset {
        /// Preset to run
        #[arg(value_enum)]
        name: PresetName,

        /// Write the preset's config to this path instead of running it
        #[arg(long)]
        save: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List registered models
    #[command(name = "models")]
    Models,
}

/// Overrides applied on top of a configuration
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Directory for the generated pages
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Open each page after writing it
    #[arg(long)]
    pub open: bool,

    /// Also write panel descriptors as JSON
    #[arg(long)]
    pub json: bool,

    /// Export stimulus and model outputs as WAV
    #[arg(long)]
    pub wav: bool,
}

impl OutputArgs {
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        config.open |= self.open;
        config.write_json |= self.json;
        config.export_wav |= self.wav;
    }
}

/// Built-in comparisons
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresetName {
    /// Spectrogram of both VCAs under a 0-24 kHz chirp
    VcaChirp,
    /// Step response of both VCAs
    VcaStep,
    /// Spectrogram of the Van der Pol family under a frequency sweep
    VdpSweep,
    /// Time response of the Van der Pol family to a slow sine
    VdpSine,
}

impl PresetName {
    pub fn config(self) -> RunConfig {
        match self {
            PresetName::VcaChirp => RunConfig::vca_chirp(),
            PresetName::VcaStep => RunConfig::vca_step(),
            PresetName::VdpSweep => RunConfig::vdp_sweep(),
            PresetName::VdpSine => RunConfig::vdp_sine(),
        }
    }
}
