//! Stimulus and control signal generation
//!
//! Canonical test signals built as pure functions of a [`TimeBase`]:
//! chirp, step, impulse and sinusoid stimuli, plus constant and ramp
//! control signals. [`StimulusSpec`] and [`ControlSpec`] describe the same
//! signals declaratively for run configurations.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};
use crate::signal::{Signal, TimeBase};

// ============================================================================
// Stimuli
// ============================================================================

/// Linear frequency sweep from `f0` at `t = 0` to `f1` at `t = t_end`
///
/// `gain * cos(2 pi (f0 t + (f1 - f0) t^2 / (2 t_end)))`
pub fn chirp(time: &TimeBase, f0: f64, f1: f64, t_end: f64, gain: f64) -> Result<Signal> {
    if !t_end.is_finite() || t_end <= 0.0 {
        return Err(CompareError::invalid(
            "t_end",
            format!("chirp end time must be positive, got {t_end}"),
        ));
    }
    let beta = (f1 - f0) / t_end;
    Ok(time.map(|t| gain * (2.0 * PI * (f0 * t + 0.5 * beta * t * t)).cos()))
}

/// Heaviside step: `0` for `t < 0`, `gain` for `t >= 0`
pub fn step(time: &TimeBase, gain: f64) -> Signal {
    time.map(|t| if t >= 0.0 { gain } else { 0.0 })
}

/// Step that switches on strictly after `t = 0`, leaving the first sample at zero
pub fn step_after(time: &TimeBase, gain: f64) -> Signal {
    time.map(|t| if t > 0.0 { gain } else { 0.0 })
}

/// Single nonzero sample of height `gain` at `t = 0`
pub fn impulse(time: &TimeBase, gain: f64) -> Signal {
    time.map(|t| if t == 0.0 { gain } else { 0.0 })
}

/// Fixed-frequency sine over the full duration
pub fn sinusoid(time: &TimeBase, frequency: f64, amplitude: f64) -> Signal {
    time.map(|t| amplitude * (2.0 * PI * frequency * t).sin())
}

// ============================================================================
// Control signals
// ============================================================================

/// Constant control, e.g. the unit gain CV of the VCA runs
pub fn constant(time: &TimeBase, value: f64) -> Signal {
    time.map(|_| value)
}

/// Evenly spaced values from `from` to `to`, both endpoints included
pub fn linear_ramp(time: &TimeBase, from: f64, to: f64) -> Signal {
    Signal::new(linspace(from, to, time.len()), time.sample_rate())
}

/// Ramp up from `from` to `to` over the first half, then back down
pub fn up_down_ramp(time: &TimeBase, from: f64, to: f64) -> Signal {
    if time.len() <= 1 {
        return linear_ramp(time, from, to);
    }
    let rising = time.len() / 2;
    let mut samples = linspace(from, to, rising);
    samples.extend(linspace(to, from, time.len() - rising));
    Signal::new(samples, time.sample_rate())
}

fn linspace(from: f64, to: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![from],
        _ => {
            let step = (to - from) / (n - 1) as f64;
            (0..n).map(|i| from + step * i as f64).collect()
        }
    }
}

// ============================================================================
// Declarative specs
// ============================================================================

/// Stimulus description used by run configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StimulusSpec {
    /// Linear chirp; `t_end` defaults to the time of the last sample
    Chirp {
        f0: f64,
        f1: f64,
        gain: f64,
        #[serde(default)]
        t_end: Option<f64>,
    },
    Step {
        gain: f64,
    },
    StepAfter {
        gain: f64,
    },
    Impulse {
        gain: f64,
    },
    Sinusoid {
        frequency: f64,
        amplitude: f64,
    },
    Silence,
}

impl StimulusSpec {
    pub fn build(&self, time: &TimeBase) -> Result<Signal> {
        match *self {
            StimulusSpec::Chirp { f0, f1, gain, t_end } => {
                chirp(time, f0, f1, t_end.unwrap_or_else(|| time.end()), gain)
            }
            StimulusSpec::Step { gain } => Ok(step(time, gain)),
            StimulusSpec::StepAfter { gain } => Ok(step_after(time, gain)),
            StimulusSpec::Impulse { gain } => Ok(impulse(time, gain)),
            StimulusSpec::Sinusoid {
                frequency,
                amplitude,
            } => Ok(sinusoid(time, frequency, amplitude)),
            StimulusSpec::Silence => Ok(constant(time, 0.0)),
        }
    }
}

/// Control signal description used by run configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlSpec {
    Constant { value: f64 },
    LinearRamp { from: f64, to: f64 },
    UpDownRamp { from: f64, to: f64 },
    /// Angular frequency trajectory `2 pi linspace(from_hz, to_hz)`
    AngularRamp { from_hz: f64, to_hz: f64 },
}

impl Default for ControlSpec {
    fn default() -> Self {
        ControlSpec::Constant { value: 1.0 }
    }
}

impl ControlSpec {
    pub fn build(&self, time: &TimeBase) -> Signal {
        match *self {
            ControlSpec::Constant { value } => constant(time, value),
            ControlSpec::LinearRamp { from, to } => linear_ramp(time, from, to),
            ControlSpec::UpDownRamp { from, to } => up_down_ramp(time, from, to),
            ControlSpec::AngularRamp { from_hz, to_hz } => {
                linear_ramp(time, 2.0 * PI * from_hz, 2.0 * PI * to_hz)
            }
        }
    }
}
