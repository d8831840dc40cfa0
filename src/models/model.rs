//! Simulation model trait and core types
//!
//! Defines the interface every circuit model exposes to the harness.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What a model expects on its control input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// Gain control voltage (VCA models)
    #[default]
    Gain,
    /// Angular frequency trajectory in rad/s (oscillator models)
    AngularFrequency,
    /// Control input is ignored
    Unused,
}

/// Information about a registered model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Registry key, treated as an opaque string
    pub id: String,

    /// Description of what the model simulates
    pub description: String,

    /// Meaning of the control input
    pub control: ControlKind,
}

impl ModelInfo {
    pub fn new(id: &str, description: &str, control: ControlKind) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            control,
        }
    }
}

/// Trait that all simulation models must implement
///
/// Models are stateless from the caller's perspective: any integrator state
/// lives inside a single `process` call, so repeated calls with the same
/// inputs give the same output.
pub trait SimulationModel: Send + Sync {
    /// Get model information
    fn info(&self) -> &ModelInfo;

    /// Run the model over a whole signal
    ///
    /// # Arguments
    /// * `input` - Audio input samples
    /// * `control` - Control samples, same length as `input`
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Returns
    /// One output sample per input sample
    fn process(&self, input: &[f64], control: &[f64], sample_rate: f64) -> Result<Vec<f64>>;

    /// Get model ID (convenience method)
    fn id(&self) -> &str {
        &self.info().id
    }
}

/// Signature of a plain function usable as a model
pub type ModelFn = fn(&[f64], &[f64], f64) -> Vec<f64>;

/// Adapter that registers a plain function as a model
pub struct FnModel {
    info: ModelInfo,
    func: ModelFn,
}

impl FnModel {
    pub fn new(info: ModelInfo, func: ModelFn) -> Self {
        Self { info, func }
    }
}

impl SimulationModel for FnModel {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn process(&self, input: &[f64], control: &[f64], sample_rate: f64) -> Result<Vec<f64>> {
        Ok((self.func)(input, control, sample_rate))
    }
}
