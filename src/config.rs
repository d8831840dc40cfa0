//! Run configuration
//!
//! A [`RunConfig`] describes one comparison: the time base, the stimulus
//! and control signals, the models to compare and the transforms to draw.
//! Configurations are stored as JSON; the presets reproduce the classic
//! VCA and Van der Pol comparisons.

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::Transform;
use crate::error::{CompareError, Result};
use crate::grid::DEFAULT_NUM_COLS;
use crate::models::{vdp_model_name, VDP_MU_VALUES};
use crate::render::PanelStyle;
use crate::signal::{check_sample_rate, TimeBase};
use crate::stimulus::{ControlSpec, StimulusSpec};

const AUDIO_RATE: f64 = 48_000.0;

fn default_transforms() -> Vec<Transform> {
    Transform::ALL.to_vec()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_num_cols() -> usize {
    DEFAULT_NUM_COLS
}

/// One comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub sample_rate: f64,

    /// Exactly one of `num_samples` and `duration_secs` must be set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_samples: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,

    pub stimulus: StimulusSpec,
    #[serde(default)]
    pub control: ControlSpec,

    pub models: Vec<String>,
    #[serde(default = "default_transforms")]
    pub transforms: Vec<Transform>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_num_cols")]
    pub num_cols: usize,
    /// Panel size and drawing limits of the HTML pages
    #[serde(default)]
    pub style: PanelStyle,

    /// Open HTML pages after writing them
    #[serde(default)]
    pub open: bool,
    /// Also write `<transform>.json` next to each page
    #[serde(default)]
    pub write_json: bool,
    /// Write the stimulus and each output to `<output_dir>/wav/`
    #[serde(default)]
    pub export_wav: bool,
}

impl RunConfig {
    fn base(stimulus: StimulusSpec, models: Vec<String>) -> Self {
        Self {
            sample_rate: AUDIO_RATE,
            num_samples: None,
            duration_secs: None,
            stimulus,
            control: ControlSpec::default(),
            models,
            transforms: default_transforms(),
            output_dir: default_output_dir(),
            num_cols: DEFAULT_NUM_COLS,
            style: PanelStyle::default(),
            open: false,
            write_json: false,
            export_wav: false,
        }
    }

    fn vca_models() -> Vec<String> {
        vec!["vca_ota".to_string(), "vca_transistor".to_string()]
    }

    fn vdp_models() -> Vec<String> {
        VDP_MU_VALUES.iter().map(|&mu| vdp_model_name(mu)).collect()
    }

    /// Ten seconds of a 0 to 24 kHz chirp at amplitude 5 through both VCAs
    pub fn vca_chirp() -> Self {
        Self {
            duration_secs: Some(10.0),
            transforms: vec![Transform::Spectrogram],
            ..Self::base(
                StimulusSpec::Chirp {
                    f0: 0.0,
                    f1: 24_000.0,
                    gain: 5.0,
                    t_end: None,
                },
                Self::vca_models(),
            )
        }
    }

    /// 1000 samples of a step to 3 after t = 0 through both VCAs
    pub fn vca_step() -> Self {
        Self {
            num_samples: Some(1000),
            transforms: vec![Transform::TimeResponse],
            ..Self::base(StimulusSpec::StepAfter { gain: 3.0 }, Self::vca_models())
        }
    }

    /// Unforced Van der Pol family under a 0 to 4200 Hz natural-frequency sweep
    pub fn vdp_sweep() -> Self {
        Self {
            duration_secs: Some(10.0),
            control: ControlSpec::AngularRamp {
                from_hz: 0.0,
                to_hz: 4200.0,
            },
            transforms: vec![Transform::Spectrogram],
            ..Self::base(StimulusSpec::Silence, Self::vdp_models())
        }
    }

    /// Van der Pol family at 100 Hz driven by a 10 Hz sine of amplitude 5
    pub fn vdp_sine() -> Self {
        Self {
            duration_secs: Some(1.0),
            control: ControlSpec::Constant {
                value: 2.0 * PI * 100.0,
            },
            transforms: vec![Transform::TimeResponse],
            ..Self::base(
                StimulusSpec::Sinusoid {
                    frequency: 10.0,
                    amplitude: 5.0,
                },
                Self::vdp_models(),
            )
        }
    }

    /// Load and validate a JSON configuration
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        check_sample_rate(self.sample_rate)?;
        match (self.num_samples, self.duration_secs) {
            (Some(_), Some(_)) => {
                return Err(CompareError::invalid(
                    "num_samples",
                    "set either num_samples or duration_secs, not both",
                ))
            }
            (None, None) => {
                return Err(CompareError::invalid(
                    "num_samples",
                    "one of num_samples or duration_secs is required",
                ))
            }
            _ => {}
        }
        if self.models.is_empty() {
            return Err(CompareError::EmptyModelList);
        }
        if self.transforms.is_empty() {
            return Err(CompareError::invalid("transforms", "at least one transform is required"));
        }
        if self.num_cols == 0 {
            return Err(CompareError::invalid("num_cols", "must be at least 1"));
        }
        Ok(())
    }

    /// Shared time base of the run
    pub fn time_base(&self) -> Result<TimeBase> {
        match (self.num_samples, self.duration_secs) {
            (Some(n), _) => TimeBase::new(n, self.sample_rate),
            (None, Some(secs)) => TimeBase::from_duration(secs, self.sample_rate),
            (None, None) => Err(CompareError::invalid(
                "num_samples",
                "one of num_samples or duration_secs is required",
            )),
        }
    }
}
