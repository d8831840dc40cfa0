//! Simulation model interfaces and implementations
//!
//! This module provides:
//! - `SimulationModel` trait for all circuit models
//! - Model registry with fail-fast name resolution
//! - Reference models (stubs, VCA, Van der Pol) for stand-alone runs

mod model;
mod reference;
mod registry;

pub use model::{ControlKind, FnModel, ModelFn, ModelInfo, SimulationModel};
pub use reference::{Doubler, Passthrough, VanDerPol, Vca, VcaCore};
pub use registry::{vdp_model_name, ModelRegistry, VDP_MU_VALUES};
