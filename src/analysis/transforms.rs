//! Panel transforms
//!
//! Each transform turns `(name, time, input, output, fs)` into a
//! [`PanelDescriptor`]. All panels from one transform share axis kinds and
//! payload kind, and every title reads `"<model> <fs>"`.

use super::spectral::{fft_magnitude, stft_power, welch};
use super::window::{blackman, hann};
use super::{magnitude_to_db, power_to_db, SPECTROGRAM_FLOOR_DB};
use crate::error::{CompareError, Result};
use crate::panel::{Axis, Curve, Heatmap, PanelDescriptor, Rgb};
use crate::signal::{check_sample_rate, TimeBase};

/// Spectrogram window length
pub const SPECTROGRAM_NPERSEG: usize = 1024;

/// Welch segment length
pub const WELCH_NPERSEG: usize = 1024;

/// Upper frequency bound of the frequency response panel
pub const FREQ_RESPONSE_MAX_HZ: f64 = 22_000.0;

/// Title shared by all transforms
pub fn panel_title(name: &str, sample_rate: f64) -> String {
    format!("{} {}", name, sample_rate.trunc() as i64)
}

fn check_inputs(time: &TimeBase, input: &[f64], output: &[f64], sample_rate: f64) -> Result<()> {
    check_sample_rate(sample_rate)?;
    if output.is_empty() {
        return Err(CompareError::EmptySignal);
    }
    if input.len() != time.len() {
        return Err(CompareError::shape("stimulus", time.len(), input.len()));
    }
    if output.len() != time.len() {
        return Err(CompareError::shape("model output", time.len(), output.len()));
    }
    Ok(())
}

/// Blackman-windowed spectrogram of the output in dB
pub fn spectrogram(
    name: &str,
    time: &TimeBase,
    input: &[f64],
    output: &[f64],
    sample_rate: f64,
) -> Result<PanelDescriptor> {
    check_inputs(time, input, output, sample_rate)?;

    let nperseg = SPECTROGRAM_NPERSEG.min(output.len());
    let stft = stft_power(output, sample_rate, &blackman(nperseg), nperseg / 8)?;

    let values = stft
        .power
        .iter()
        .map(|row| row.iter().map(|&p| power_to_db(p)).collect())
        .collect();

    let x_axis = match (stft.times.first(), stft.times.last()) {
        (Some(&t0), Some(&t1)) => Axis::linear("Time [sec]").with_range(t0, t1),
        _ => Axis::linear("Time [sec]"),
    };
    let f_max = stft.frequencies.last().copied().unwrap_or(0.0);
    let y_axis = Axis::linear("Freq [Hz]").with_range(0.0, f_max);

    Ok(PanelDescriptor::heatmap(
        panel_title(name, sample_rate),
        x_axis,
        y_axis,
        Heatmap {
            x: stft.times,
            y: stft.frequencies,
            values,
            color_floor: SPECTROGRAM_FLOOR_DB,
        },
    ))
}

/// Stimulus and output over the sample index, unnormalized
pub fn time_response(
    name: &str,
    time: &TimeBase,
    input: &[f64],
    output: &[f64],
    sample_rate: f64,
) -> Result<PanelDescriptor> {
    check_inputs(time, input, output, sample_rate)?;

    let samples = time.sample_indices();
    let curves = vec![
        Curve {
            label: "input".to_string(),
            x: samples.clone(),
            y: input.to_vec(),
            color: Rgb::FIREBRICK,
            alpha: 0.3,
        },
        Curve {
            label: "output".to_string(),
            x: samples,
            y: output.to_vec(),
            color: Rgb::NAVY,
            alpha: 0.9,
        },
    ];

    Ok(PanelDescriptor::curves(
        panel_title(name, sample_rate),
        Axis::linear("Sample"),
        Axis::linear("Output"),
        curves,
    ))
}

/// Welch power spectral density on a log frequency axis
///
/// The DC bin is left out since it has no place on a log axis.
pub fn power_spectral_density(
    name: &str,
    time: &TimeBase,
    input: &[f64],
    output: &[f64],
    sample_rate: f64,
) -> Result<PanelDescriptor> {
    check_inputs(time, input, output, sample_rate)?;

    let nperseg = WELCH_NPERSEG.min(output.len());
    let (freqs, density) = welch(output, sample_rate, &hann(nperseg), nperseg / 2)?;

    let (x, y) = freqs
        .iter()
        .zip(&density)
        .filter(|(f, _)| **f > 0.0)
        .map(|(&f, &d)| (f, power_to_db(d)))
        .unzip();

    Ok(PanelDescriptor::curves(
        panel_title(name, sample_rate),
        Axis::log("Freq [Hz]"),
        Axis::linear("Psd [dB]"),
        vec![Curve {
            label: "psd".to_string(),
            x,
            y,
            color: Rgb::STEEL_BLUE,
            alpha: 1.0,
        }],
    ))
}

/// Single-sided FFT magnitude of the whole output in dB
pub fn freq_response(
    name: &str,
    time: &TimeBase,
    input: &[f64],
    output: &[f64],
    sample_rate: f64,
) -> Result<PanelDescriptor> {
    check_inputs(time, input, output, sample_rate)?;

    let (freqs, magnitudes) = fft_magnitude(output, sample_rate);
    let amplitude = magnitudes.iter().map(|&m| magnitude_to_db(m)).collect();

    Ok(PanelDescriptor::curves(
        panel_title(name, sample_rate),
        Axis::linear("Freq [Hz]").with_range(0.0, FREQ_RESPONSE_MAX_HZ),
        Axis::linear("amplitude [dB]"),
        vec![Curve {
            label: "magnitude".to_string(),
            x: freqs,
            y: amplitude,
            color: Rgb::STEEL_BLUE,
            alpha: 1.0,
        }],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::AxisScale;
    use crate::stimulus;
    use approx::assert_relative_eq;

    const FS: f64 = 48000.0;

    #[test]
    fn test_title_encodes_model_and_rate() {
        assert_eq!(panel_title("vca_ota", 48000.0), "vca_ota 48000");
        assert_eq!(panel_title("vdp_mu=0.5", 96000.0), "vdp_mu=0.5 96000");
        assert_eq!(panel_title("m", 44100.6), "m 44100");
    }

    /// Bin holding the most power in segment `segment`
    fn peak_bin(heatmap: &crate::panel::Heatmap, segment: usize) -> usize {
        heatmap
            .values
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (bin, row)| {
                if row[segment] > best.1 {
                    (bin, row[segment])
                } else {
                    best
                }
            })
            .0
    }

    #[test]
    fn test_spectrogram_places_sine_in_its_bin() {
        let time = TimeBase::new(8192, FS).unwrap();
        // 3000 Hz is exactly bin 64 at 1024 points
        let x = stimulus::sinusoid(&time, 3000.0, 1.0);
        let panel = spectrogram("m", &time, &x.samples, &x.samples, FS).unwrap();
        let heatmap = panel.as_heatmap().unwrap();
        for segment in 0..heatmap.x.len() {
            assert_eq!(peak_bin(heatmap, segment), 64, "segment {segment}");
        }
        assert_relative_eq!(heatmap.y[64], 3000.0);
    }

    #[test]
    fn test_spectrogram_tracks_linear_chirp() {
        let time = TimeBase::new(48000, FS).unwrap();
        let t_end = time.end();
        let x = stimulus::chirp(&time, 0.0, 24000.0, t_end, 5.0).unwrap();
        let panel = spectrogram("m", &time, &x.samples, &x.samples, FS).unwrap();
        let heatmap = panel.as_heatmap().unwrap();
        let bin_width = FS / SPECTROGRAM_NPERSEG as f64;

        let last = heatmap.x.len() - 1;
        for segment in [0, last / 2, last] {
            let t = heatmap.x[segment];
            let expected = 24000.0 * t / t_end;
            let found = heatmap.y[peak_bin(heatmap, segment)];
            assert!(
                (found - expected).abs() <= bin_width,
                "segment {segment} at {t} s: peak {found} Hz, expected {expected} Hz"
            );
        }
    }

    #[test]
    fn test_spectrogram_axes_and_floor() {
        let time = TimeBase::new(4096, FS).unwrap();
        let x = stimulus::sinusoid(&time, 1000.0, 1.0);
        let panel = spectrogram("m", &time, &x.samples, &x.samples, FS).unwrap();
        let heatmap = panel.as_heatmap().unwrap();
        assert_eq!(heatmap.y.len(), 513);
        assert_eq!(heatmap.values.len(), 513);
        assert_eq!(heatmap.values[0].len(), heatmap.x.len());
        assert_eq!(heatmap.color_floor, -80.0);
        assert_eq!(panel.y_axis.range, Some((0.0, 24000.0)));
        assert!(heatmap.values.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_spectrogram_of_silence_is_clamped() {
        let time = TimeBase::new(2048, FS).unwrap();
        let silence = vec![0.0; 2048];
        let panel = spectrogram("silent", &time, &silence, &silence, FS).unwrap();
        let heatmap = panel.as_heatmap().unwrap();
        assert!(heatmap
            .values
            .iter()
            .flatten()
            .all(|&v| v == power_to_db(0.0)));
    }

    #[test]
    fn test_spectrogram_short_signal_shrinks_window() {
        let time = TimeBase::new(100, FS).unwrap();
        let x = vec![1.0; 100];
        let panel = spectrogram("short", &time, &x, &x, FS).unwrap();
        let heatmap = panel.as_heatmap().unwrap();
        assert_eq!(heatmap.x.len(), 1);
        assert_eq!(heatmap.y.len(), 51);
    }

    #[test]
    fn test_time_response_curves() {
        let time = TimeBase::new(4, FS).unwrap();
        let x = [0.0, 3.0, 3.0, 3.0];
        let y = [0.0, 1.0, 2.0, 3.0];
        let panel = time_response("vca", &time, &x, &y, FS).unwrap();
        let curves = panel.as_curves().unwrap();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].x, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(curves[0].y, x.to_vec());
        assert_eq!(curves[1].y, y.to_vec());
        assert_relative_eq!(curves[0].alpha, 0.3);
        assert_relative_eq!(curves[1].alpha, 0.9);
    }

    #[test]
    fn test_psd_log_axis_without_dc() {
        let time = TimeBase::new(8192, FS).unwrap();
        let x = stimulus::sinusoid(&time, 3000.0, 1.0);
        let panel = power_spectral_density("m", &time, &x.samples, &x.samples, FS).unwrap();
        assert_eq!(panel.x_axis.scale, AxisScale::Log);
        let curve = &panel.as_curves().unwrap()[0];
        assert_eq!(curve.x.len(), 512);
        assert!(curve.x.iter().all(|&f| f > 0.0));
        assert!(curve.y.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_freq_response_range_and_peak() {
        let time = TimeBase::new(48000, FS).unwrap();
        let x = stimulus::sinusoid(&time, 440.0, 2.0);
        let panel = freq_response("m", &time, &x.samples, &x.samples, FS).unwrap();
        assert_eq!(panel.x_axis.range, Some((0.0, FREQ_RESPONSE_MAX_HZ)));
        let curve = &panel.as_curves().unwrap()[0];
        assert_eq!(curve.x.len(), 24000);
        assert_relative_eq!(curve.y[440], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let time = TimeBase::new(8, FS).unwrap();
        let err = time_response("m", &time, &[0.0; 8], &[0.0; 7], FS).unwrap_err();
        assert!(matches!(err, CompareError::ShapeMismatch { .. }));
        let err = spectrogram("m", &time, &[0.0; 6], &[0.0; 8], FS).unwrap_err();
        assert!(matches!(err, CompareError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_empty_output_rejected() {
        let time = TimeBase::new(0, FS).unwrap();
        assert!(matches!(
            freq_response("m", &time, &[], &[], FS),
            Err(CompareError::EmptySignal)
        ));
    }
}
