//! Circuit Compare - comparison harness for nonlinear audio circuit models
//!
//! Drives several circuit simulations with one shared stimulus and lays a
//! chosen analysis of every output side by side.
//!
//! # Architecture
//!
//! A run flows through five stages:
//! - Stimulus: a [`TimeBase`] plus stimulus and control signals
//! - Models: named simulations resolved from a [`ModelRegistry`]
//! - Runner: invokes every model and checks output lengths
//! - Transforms: spectrogram, time response, PSD or FFT magnitude panels
//! - Grid + sink: panels in a fixed column count, written as HTML or JSON

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod grid;
pub mod io;
pub mod models;
pub mod panel;
pub mod pipeline;
pub mod render;
pub mod runner;
pub mod signal;
pub mod stimulus;

pub use analysis::Transform;
pub use config::RunConfig;
pub use error::{CompareError, Result};
pub use grid::{Grid, GridCompositor};
pub use models::{ModelRegistry, SimulationModel};
pub use panel::PanelDescriptor;
pub use pipeline::{Pipeline, RunReport};
pub use render::{HtmlSink, JsonSink, OutputSink};
pub use runner::{ModelResult, ModelRunner};
pub use signal::{Signal, TimeBase};
