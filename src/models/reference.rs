//! Reference circuit models
//!
//! Small built-in models so the harness runs without external simulation
//! code: identity-like stubs, a VCA built from two nonlinear one-pole
//! integrators, and a forced Van der Pol oscillator.

use std::f64::consts::PI;

use super::model::{ControlKind, ModelInfo, SimulationModel};
use crate::error::{CompareError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Supply rail the VCA output stage saturates to
const SUPPLY_VOLTAGE: f64 = 12.0;

/// Extra scaling of the control path before its integrator
const CV_SCALING: f64 = 3.0;

/// Newton iteration cap for the implicit integrator step
const MAX_NEWTON_ITERATIONS: usize = 32;

/// Newton stopping tolerance on the residual
const NEWTON_TOLERANCE: f64 = 1.0e-10;

/// Upper bound on Van der Pol integration substeps per sample
const MAX_VDP_SUBSTEPS: usize = 512;

// ============================================================================
// Stubs
// ============================================================================

/// Returns its input unchanged
pub struct Passthrough {
    info: ModelInfo,
}

impl Passthrough {
    pub fn new() -> Self {
        Self {
            info: ModelInfo::new("passthrough", "Identity model", ControlKind::Unused),
        }
    }
}

impl Default for Passthrough {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationModel for Passthrough {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn process(&self, input: &[f64], _control: &[f64], _sample_rate: f64) -> Result<Vec<f64>> {
        Ok(input.to_vec())
    }
}

/// Returns twice its input
pub struct Doubler {
    info: ModelInfo,
}

impl Doubler {
    pub fn new() -> Self {
        Self {
            info: ModelInfo::new("doubler", "Fixed gain of two", ControlKind::Unused),
        }
    }
}

impl Default for Doubler {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationModel for Doubler {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn process(&self, input: &[f64], _control: &[f64], _sample_rate: f64) -> Result<Vec<f64>> {
        Ok(input.iter().map(|x| 2.0 * x).collect())
    }
}

// ============================================================================
// VCA
// ============================================================================

/// Integrator topology used on both VCA paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcaCore {
    /// `dy/dt = wc * tanh(x - y)`
    Ota,
    /// `dy/dt = wc * (tanh(x) - tanh(y))`
    Transistor,
}

impl VcaCore {
    fn default_rolloff_hz(self) -> f64 {
        match self {
            VcaCore::Ota => 10_000.0,
            VcaCore::Transistor => 20_000.0,
        }
    }

    fn description(self) -> &'static str {
        match self {
            VcaCore::Ota => "VCA with OTA one-pole integrators",
            VcaCore::Transistor => "VCA with transistor one-pole integrators",
        }
    }
}

/// One-pole nonlinear integrator, backward Euler with a prewarped gain
#[derive(Debug, Clone, Copy)]
struct OnePole {
    core: VcaCore,
    g: f64,
    y1: f64,
}

impl OnePole {
    fn new(core: VcaCore, sample_rate: f64) -> Self {
        let rolloff = core.default_rolloff_hz().min(0.45 * sample_rate);
        Self {
            core,
            g: 2.0 * (PI * rolloff / sample_rate).tan(),
            y1: 0.0,
        }
    }

    fn step(&mut self, x: f64) -> f64 {
        let (g, y1) = (self.g, self.y1);
        let tanh_x = x.tanh();
        let mut y = y1;
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let (f, df) = match self.core {
                VcaCore::Ota => {
                    let t = (x - y).tanh();
                    (y - y1 - g * t, 1.0 + g * (1.0 - t * t))
                }
                VcaCore::Transistor => {
                    let t = y.tanh();
                    (y - y1 - g * (tanh_x - t), 1.0 + g * (1.0 - t * t))
                }
            };
            y -= f / df;
            if f.abs() < NEWTON_TOLERANCE {
                break;
            }
        }
        self.y1 = y;
        y
    }
}

/// Voltage-controlled amplifier: filtered audio times filtered CV, then a
/// tanh output stage saturating to the supply rail
pub struct Vca {
    info: ModelInfo,
    core: VcaCore,
}

impl Vca {
    pub fn new(id: &str, core: VcaCore) -> Self {
        Self {
            info: ModelInfo::new(id, core.description(), ControlKind::Gain),
            core,
        }
    }
}

impl SimulationModel for Vca {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn process(&self, input: &[f64], control: &[f64], sample_rate: f64) -> Result<Vec<f64>> {
        let mut audio_path = OnePole::new(self.core, sample_rate);
        let mut cv_path = OnePole::new(self.core, sample_rate);

        Ok(input
            .iter()
            .zip(control)
            .map(|(&x, &cv)| {
                let a = audio_path.step(x);
                let c = cv_path.step(CV_SCALING * cv);
                SUPPLY_VOLTAGE * (a * c / CV_SCALING / SUPPLY_VOLTAGE).tanh()
            })
            .collect())
    }
}

// ============================================================================
// Van der Pol oscillator
// ============================================================================

/// Forced Van der Pol oscillator
///
/// `y'' = mu (1 - y^2) y' w - y w^2 + w^2 x`, with the control carrying the
/// angular frequency `w` in rad/s. Starts from `y = 0, y' = 1`.
pub struct VanDerPol {
    info: ModelInfo,
    mu: f64,
}

impl VanDerPol {
    pub fn new(id: &str, mu: f64) -> Self {
        Self {
            info: ModelInfo::new(
                id,
                "Van der Pol oscillator driven by an angular frequency trajectory",
                ControlKind::AngularFrequency,
            ),
            mu,
        }
    }

    fn derivative(&self, state: [f64; 2], x: f64, w: f64) -> [f64; 2] {
        let [y, dy] = state;
        [
            dy,
            self.mu * (1.0 - y * y) * dy * w - y * w * w + w * w * x,
        ]
    }

    fn rk4(&self, state: [f64; 2], x: f64, w: f64, h: f64) -> [f64; 2] {
        let add = |s: [f64; 2], k: [f64; 2], c: f64| [s[0] + c * k[0], s[1] + c * k[1]];
        let k1 = self.derivative(state, x, w);
        let k2 = self.derivative(add(state, k1, 0.5 * h), x, w);
        let k3 = self.derivative(add(state, k2, 0.5 * h), x, w);
        let k4 = self.derivative(add(state, k3, h), x, w);
        [
            state[0] + h / 6.0 * (k1[0] + 2.0 * k2[0] + 2.0 * k3[0] + k4[0]),
            state[1] + h / 6.0 * (k1[1] + 2.0 * k2[1] + 2.0 * k3[1] + k4[1]),
        ]
    }

    fn substeps(&self, state: [f64; 2], w: f64, dt: f64) -> usize {
        // Stiffness grows with mu, w and the amplitude of the limit cycle
        let rate = w.abs() * (1.0 + self.mu * (1.0 + state[0] * state[0]));
        ((rate * dt / 0.5).ceil() as usize).clamp(1, MAX_VDP_SUBSTEPS)
    }
}

impl SimulationModel for VanDerPol {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn process(&self, input: &[f64], control: &[f64], sample_rate: f64) -> Result<Vec<f64>> {
        let dt = 1.0 / sample_rate;
        let mut state = [0.0, 1.0];
        let mut output = Vec::with_capacity(input.len());

        for (i, (&x, &w)) in input.iter().zip(control).enumerate() {
            output.push(state[0]);
            let n = self.substeps(state, w, dt);
            let h = dt / n as f64;
            for _ in 0..n {
                state = self.rk4(state, x, w, h);
            }
            if !state[0].is_finite() || !state[1].is_finite() {
                return Err(CompareError::ModelFailed {
                    model: self.info.id.clone(),
                    reason: format!("integration diverged at sample {i}"),
                });
            }
        }

        Ok(output)
    }
}
