//! Model runner
//!
//! Invokes registered models against one stimulus, control and sample rate,
//! checking the equal-length invariant on both sides of every call.

use log::{debug, info};

use crate::error::{CompareError, Result};
use crate::models::{ModelRegistry, SimulationModel};
use crate::signal::{check_sample_rate, Signal};

/// Output of one model for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResult {
    pub model_name: String,
    pub output: Signal,
}

/// Runs models from a registry
pub struct ModelRunner<'a> {
    registry: &'a ModelRegistry,
}

impl<'a> ModelRunner<'a> {
    pub fn new(registry: &'a ModelRegistry) -> Self {
        Self { registry }
    }

    /// Run a single model by name
    pub fn run(
        &self,
        stimulus: &[f64],
        control: &[f64],
        sample_rate: f64,
        model_name: &str,
    ) -> Result<Signal> {
        check_sample_rate(sample_rate)?;
        let model = self.registry.get(model_name)?;
        invoke(model.as_ref(), stimulus, control, sample_rate)
    }

    /// Run every named model in order
    ///
    /// All names are resolved before any model runs, so an unknown name
    /// fails the run without wasting computation.
    pub fn run_all<S: AsRef<str>>(
        &self,
        stimulus: &[f64],
        control: &[f64],
        sample_rate: f64,
        model_names: &[S],
    ) -> Result<Vec<ModelResult>> {
        if model_names.is_empty() {
            return Err(CompareError::EmptyModelList);
        }
        check_sample_rate(sample_rate)?;
        check_control(stimulus, control)?;
        let models = self.registry.resolve(model_names)?;

        info!(
            "Running {} models on {} samples at {} Hz",
            models.len(),
            stimulus.len(),
            sample_rate
        );

        models
            .iter()
            .zip(model_names)
            .map(|(model, name)| {
                let output = invoke(model.as_ref(), stimulus, control, sample_rate)?;
                Ok(ModelResult {
                    model_name: name.as_ref().to_string(),
                    output,
                })
            })
            .collect()
    }
}

fn check_control(stimulus: &[f64], control: &[f64]) -> Result<()> {
    if stimulus.len() != control.len() {
        return Err(CompareError::shape(
            "control signal",
            stimulus.len(),
            control.len(),
        ));
    }
    Ok(())
}

fn invoke(
    model: &dyn SimulationModel,
    stimulus: &[f64],
    control: &[f64],
    sample_rate: f64,
) -> Result<Signal> {
    check_control(stimulus, control)?;

    let started = std::time::Instant::now();
    let output = model.process(stimulus, control, sample_rate)?;
    let elapsed = started.elapsed();

    if output.len() != stimulus.len() {
        return Err(CompareError::shape(
            format!("output of model '{}'", model.id()),
            stimulus.len(),
            output.len(),
        ));
    }
    if let Some(i) = output.iter().position(|v| !v.is_finite()) {
        return Err(CompareError::ModelFailed {
            model: model.id().to_string(),
            reason: format!("non-finite output {} at sample {}", output[i], i),
        });
    }

    let output = Signal::new(output, sample_rate);
    debug!(
        "Model '{}' processed {:.3} s in {:?} (peak {:.3}, rms {:.3})",
        model.id(),
        output.duration_secs(),
        elapsed,
        output.peak(),
        output.rms()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truncating(input: &[f64], _control: &[f64], _fs: f64) -> Vec<f64> {
        input[..input.len().saturating_sub(1)].to_vec()
    }

    #[test]
    fn test_run_single_model() {
        let registry = ModelRegistry::with_defaults();
        let runner = ModelRunner::new(&registry);
        let y = runner
            .run(&[1.0, 2.0], &[1.0, 1.0], 48000.0, "doubler")
            .unwrap();
        assert_eq!(y.samples, vec![2.0, 4.0]);
        assert_eq!(y.sample_rate, 48000.0);
    }

    #[test]
    fn test_control_length_mismatch() {
        let registry = ModelRegistry::with_defaults();
        let runner = ModelRunner::new(&registry);
        let err = runner
            .run(&[1.0, 2.0, 3.0], &[1.0], 48000.0, "passthrough")
            .unwrap_err();
        assert!(matches!(
            err,
            CompareError::ShapeMismatch {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_output_length_checked() {
        let mut registry = ModelRegistry::new();
        registry.register_fn("truncating", "Drops the last sample", truncating);
        let runner = ModelRunner::new(&registry);
        let err = runner
            .run(&[1.0, 2.0], &[1.0, 1.0], 48000.0, "truncating")
            .unwrap_err();
        assert!(err.to_string().contains("truncating"));
    }

    fn diverging(input: &[f64], _control: &[f64], _fs: f64) -> Vec<f64> {
        input
            .iter()
            .enumerate()
            .map(|(i, x)| if i == 100 { f64::NAN } else { *x })
            .collect()
    }

    #[test]
    fn test_non_finite_output_rejected() {
        let mut registry = ModelRegistry::with_defaults();
        registry.register_fn("diverging", "Emits NaN at sample 100", diverging);
        let runner = ModelRunner::new(&registry);
        let x = vec![0.1; 256];
        let err = runner.run(&x, &x, 48000.0, "diverging").unwrap_err();
        match err {
            CompareError::ModelFailed { model, reason } => {
                assert_eq!(model, "diverging");
                assert!(reason.contains("sample 100"), "{reason}");
            }
            other => panic!("expected ModelFailed, got {other:?}"),
        }

        let err = runner
            .run_all(&x, &x, 48000.0, &["passthrough", "diverging"])
            .unwrap_err();
        assert!(matches!(err, CompareError::ModelFailed { .. }));
    }

    #[test]
    fn test_run_all_preserves_order() {
        let registry = ModelRegistry::with_defaults();
        let runner = ModelRunner::new(&registry);
        let results = runner
            .run_all(&[1.0], &[1.0], 48000.0, &["doubler", "passthrough", "doubler"])
            .unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.model_name.as_str()).collect();
        assert_eq!(names, vec!["doubler", "passthrough", "doubler"]);
        assert_eq!(results[1].output.samples, vec![1.0]);
    }

    #[test]
    fn test_run_all_rejects_empty_list() {
        let registry = ModelRegistry::with_defaults();
        let runner = ModelRunner::new(&registry);
        let names: [&str; 0] = [];
        assert!(matches!(
            runner.run_all(&[1.0], &[1.0], 48000.0, &names),
            Err(CompareError::EmptyModelList)
        ));
    }

    #[test]
    fn test_run_all_unknown_model_fails() {
        let registry = ModelRegistry::with_defaults();
        let runner = ModelRunner::new(&registry);
        assert!(matches!(
            runner.run_all(&[1.0], &[1.0], 48000.0, &["passthrough", "missing"]),
            Err(CompareError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_sample_rate() {
        let registry = ModelRegistry::with_defaults();
        let runner = ModelRunner::new(&registry);
        assert!(matches!(
            runner.run(&[1.0], &[1.0], -1.0, "passthrough"),
            Err(CompareError::InvalidSampleRate { .. })
        ));
    }
}
