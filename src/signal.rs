//! Sampled signals and the shared time base
//!
//! Every signal in a run is derived from one [`TimeBase`], so stimulus,
//! control and model outputs line up sample for sample.

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};

/// Validate a sample rate
pub fn check_sample_rate(sample_rate: f64) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(CompareError::InvalidSampleRate { sample_rate })
    }
}

/// Uniform time base `t[i] = i / fs` starting at zero
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBase {
    sample_rate: f64,
    times: Vec<f64>,
}

impl TimeBase {
    /// Create a time base of `num_samples` points at `sample_rate` Hz
    pub fn new(num_samples: usize, sample_rate: f64) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        let times = (0..num_samples).map(|i| i as f64 / sample_rate).collect();
        Ok(Self { sample_rate, times })
    }

    /// Create a time base covering `duration_secs` seconds
    pub fn from_duration(duration_secs: f64, sample_rate: f64) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(CompareError::invalid(
                "duration_secs",
                format!("must be a non-negative number, got {duration_secs}"),
            ));
        }
        Self::new((duration_secs * sample_rate).round() as usize, sample_rate)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last sample, zero for an empty base
    pub fn end(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// `time * fs`, i.e. the sample index as a float
    pub fn sample_indices(&self) -> Vec<f64> {
        self.times.iter().map(|t| t * self.sample_rate).collect()
    }

    /// Build a signal by evaluating `f` at every time point
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Signal {
        Signal {
            samples: self.times.iter().map(|&t| f(t)).collect(),
            sample_rate: self.sample_rate,
        }
    }
}

/// Real-valued samples at a uniform sample rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub samples: Vec<f64>,
    pub sample_rate: f64,
}

impl Signal {
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Maximum absolute sample value
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0, f64::max)
    }

    /// Root mean square level
    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_squares: f64 = self.samples.iter().map(|s| s * s).sum();
        (sum_squares / self.samples.len() as f64).sqrt()
    }
}

impl AsRef<[f64]> for Signal {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}
