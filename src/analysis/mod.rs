//! Transform library
//!
//! Converts a model's input/output pair into a renderable panel.
//! Four transforms are available: spectrogram, time response, power
//! spectral density and frequency response.
//!
//! # Log scaling
//!
//! Power is clamped to [`POWER_FLOOR`] before every logarithm, so silent
//! segments and empty bins map to a finite floor (-120 dB) instead of
//! `-inf`. The spectrogram colour floor of -80 dB is a display setting only;
//! data below it is kept.

pub mod spectral;
pub mod transforms;
pub mod window;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};
use crate::panel::PanelDescriptor;
use crate::signal::TimeBase;

pub use transforms::{freq_response, panel_title, power_spectral_density, spectrogram, time_response};

/// Smallest power fed to a logarithm
pub const POWER_FLOOR: f64 = 1.0e-12;

/// Colour-scale minimum of spectrogram panels
pub const SPECTROGRAM_FLOOR_DB: f64 = -80.0;

/// Power to decibels, `10 log10(max(p, POWER_FLOOR))`
#[inline]
pub fn power_to_db(power: f64) -> f64 {
    10.0 * power.max(POWER_FLOOR).log10()
}

/// Magnitude to decibels with the same floor, `20 log10(max(m, sqrt(POWER_FLOOR)))`
#[inline]
pub fn magnitude_to_db(magnitude: f64) -> f64 {
    power_to_db(magnitude * magnitude)
}

/// Signature shared by all transforms
pub type TransformFn = fn(&str, &TimeBase, &[f64], &[f64], f64) -> Result<PanelDescriptor>;

/// Named transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    Spectrogram,
    TimeResponse,
    PowerSpectralDensity,
    FreqResponse,
}

impl Transform {
    pub const ALL: [Transform; 4] = [
        Transform::Spectrogram,
        Transform::TimeResponse,
        Transform::PowerSpectralDensity,
        Transform::FreqResponse,
    ];

    /// Name used for the output artifact
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Spectrogram => "spectrogram",
            Transform::TimeResponse => "time_response",
            Transform::PowerSpectralDensity => "power_spectral_density",
            Transform::FreqResponse => "freq_response",
        }
    }

    pub fn function(&self) -> TransformFn {
        match self {
            Transform::Spectrogram => spectrogram,
            Transform::TimeResponse => time_response,
            Transform::PowerSpectralDensity => power_spectral_density,
            Transform::FreqResponse => freq_response,
        }
    }

    /// Apply the transform to one model's signals
    pub fn apply(
        &self,
        name: &str,
        time: &TimeBase,
        input: &[f64],
        output: &[f64],
        sample_rate: f64,
    ) -> Result<PanelDescriptor> {
        (self.function())(name, time, input, output, sample_rate)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.to_lowercase().replace('-', "_");
        Transform::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .or(match normalized.as_str() {
                "psd" => Some(Transform::PowerSpectralDensity),
                "time" => Some(Transform::TimeResponse),
                "fft" => Some(Transform::FreqResponse),
                _ => None,
            })
            .ok_or_else(|| CompareError::invalid("transform", format!("unknown transform '{s}'")))
    }
}
