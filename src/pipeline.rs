//! End-to-end comparison runs
//!
//! stimulus -> models -> transform -> grid -> sink, once per configured
//! transform. Any error aborts the run; nothing is retried.

use std::path::PathBuf;

use log::info;

use crate::config::RunConfig;
use crate::error::Result;
use crate::grid::GridCompositor;
use crate::io::export_results;
use crate::models::ModelRegistry;
use crate::render::{HtmlSink, JsonSink, OutputSink};
use crate::runner::ModelRunner;

/// Summary of a finished run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub models: Vec<String>,
    pub num_samples: usize,
    /// Files written by the sinks, in transform order
    pub artifacts: Vec<PathBuf>,
    pub wav_files: Vec<PathBuf>,
}

/// Executes [`RunConfig`]s against a registry
pub struct Pipeline<'a> {
    registry: &'a ModelRegistry,
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a ModelRegistry) -> Self {
        Self { registry }
    }

    /// Run with the sinks the configuration asks for
    pub fn run(&self, config: &RunConfig) -> Result<RunReport> {
        let html = HtmlSink::new(&config.output_dir)
            .with_style(config.style.clone())
            .with_open(config.open);
        let json = JsonSink::new(&config.output_dir);

        let mut sinks: Vec<&dyn OutputSink> = vec![&html];
        if config.write_json {
            sinks.push(&json);
        }
        self.run_with_sinks(config, &sinks)
    }

    /// Run and hand every grid to each of `sinks`
    pub fn run_with_sinks(&self, config: &RunConfig, sinks: &[&dyn OutputSink]) -> Result<RunReport> {
        config.validate()?;
        let time = config.time_base()?;
        let stimulus = config.stimulus.build(&time)?;
        let control = config.control.build(&time);

        let results = ModelRunner::new(self.registry).run_all(
            stimulus.as_slice(),
            control.as_slice(),
            config.sample_rate,
            config.models.as_slice(),
        )?;

        let compositor = GridCompositor::new(config.num_cols)?;
        let mut report = RunReport {
            models: config.models.clone(),
            num_samples: time.len(),
            ..RunReport::default()
        };

        for &transform in &config.transforms {
            let grid =
                compositor.compose_results(transform, config.sample_rate, &time, &stimulus, &results)?;
            for sink in sinks {
                report.artifacts.push(sink.emit(transform.name(), &grid)?);
            }
            info!("{}: {} panels in rows {:?}", transform, grid.num_panels(), grid.shape());
        }

        if config.export_wav {
            report.wav_files = export_results(&config.output_dir.join("wav"), &stimulus, &results)?;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Transform;
    use crate::error::CompareError;
    use crate::stimulus::StimulusSpec;
    use tempfile::TempDir;

    fn small_config(dir: &TempDir) -> RunConfig {
        RunConfig {
            num_samples: Some(256),
            duration_secs: None,
            models: vec!["passthrough".to_string(), "doubler".to_string()],
            transforms: vec![Transform::TimeResponse, Transform::FreqResponse],
            output_dir: dir.path().to_path_buf(),
            write_json: true,
            export_wav: true,
            ..RunConfig::vca_step()
        }
    }

    #[test]
    fn test_run_writes_all_artifacts() {
        let dir = TempDir::new().unwrap();
        let registry = ModelRegistry::with_defaults();
        let report = Pipeline::new(&registry).run(&small_config(&dir)).unwrap();

        assert_eq!(report.num_samples, 256);
        assert_eq!(
            report.artifacts,
            vec![
                dir.path().join("time_response.html"),
                dir.path().join("time_response.json"),
                dir.path().join("freq_response.html"),
                dir.path().join("freq_response.json"),
            ]
        );
        assert_eq!(report.wav_files.len(), 3);
        assert!(report.artifacts.iter().chain(&report.wav_files).all(|p| p.exists()));
    }

    #[test]
    fn test_unknown_model_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let registry = ModelRegistry::with_defaults();
        let mut config = small_config(&dir);
        config.models.push("vca_OTA_cheby7".to_string());
        config.stimulus = StimulusSpec::Step { gain: 1.0 };

        let err = Pipeline::new(&registry).run(&config).unwrap_err();
        assert!(matches!(err, CompareError::ModelNotFound { .. }));
        assert!(!dir.path().join("time_response.html").exists());
    }
}
