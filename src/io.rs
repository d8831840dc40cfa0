//! WAV export of stimuli and model outputs

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use log::{debug, info};

use crate::error::{CompareError, Result};
use crate::runner::ModelResult;
use crate::signal::Signal;

/// Write a mono 32-bit float WAV file
///
/// The sample rate is rounded to the nearest integer Hz.
pub fn export_wav(path: &Path, signal: &Signal) -> Result<()> {
    let sample_rate = signal.sample_rate.round();
    if !(sample_rate >= 1.0 && sample_rate <= u32::MAX as f64) {
        return Err(CompareError::InvalidSampleRate {
            sample_rate: signal.sample_rate,
        });
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: sample_rate as u32,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in &signal.samples {
        writer.write_sample(sample as f32)?;
    }
    writer.finalize()?;

    debug!("Wrote {} samples to {}", signal.len(), path.display());
    Ok(())
}

/// Export the stimulus and every model output into `dir`
///
/// Files are named `stimulus.wav` and `<model>.wav`, with characters that
/// are awkward in file names replaced by `_`.
pub fn export_results(dir: &Path, stimulus: &Signal, results: &[ModelResult]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(results.len() + 1);
    let path = dir.join("stimulus.wav");
    export_wav(&path, stimulus)?;
    written.push(path);

    for result in results {
        let path = dir.join(format!("{}.wav", file_stem(&result.model_name)));
        export_wav(&path, &result.output)?;
        written.push(path);
    }

    info!("Exported {} WAV files to {}", written.len(), dir.display());
    Ok(written)
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect()
}
