//! Spectral estimators
//!
//! Short-time power spectra, Welch averaging and a single-sided FFT
//! magnitude. Segments are detrended by their mean, windowed, and scaled
//! to a one-sided power spectral density `|X|^2 / (fs * sum(w^2))` with
//! the non-DC, non-Nyquist bins doubled.
//!
//! FFT plans are built per call so repeated calls share no state.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{CompareError, Result};

/// Short-time power spectral density
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramData {
    /// Bin frequencies in Hz, `0..=fs/2`
    pub frequencies: Vec<f64>,
    /// Segment centre times in seconds
    pub times: Vec<f64>,
    /// `power[bin][segment]`
    pub power: Vec<Vec<f64>>,
}

/// Segmented one-sided PSD
///
/// `window.len()` is the segment length; consecutive segments overlap by
/// `overlap` samples. Returns frequencies, segment centre times and the PSD
/// of each segment.
pub fn stft_power(
    samples: &[f64],
    sample_rate: f64,
    window: &[f64],
    overlap: usize,
) -> Result<SpectrogramData> {
    let nperseg = window.len();
    if nperseg == 0 || nperseg > samples.len() {
        return Err(CompareError::invalid(
            "nperseg",
            format!(
                "segment length {} must be within 1..={}",
                nperseg,
                samples.len()
            ),
        ));
    }
    if overlap >= nperseg {
        return Err(CompareError::invalid(
            "overlap",
            format!("overlap {overlap} must be smaller than segment length {nperseg}"),
        ));
    }

    let step = nperseg - overlap;
    let num_segments = (samples.len() - overlap) / step;
    let num_bins = nperseg / 2 + 1;
    let scale = 1.0 / (sample_rate * window.iter().map(|w| w * w).sum::<f64>());

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nperseg);
    let mut buffer = vec![Complex::new(0.0, 0.0); nperseg];

    let mut power = vec![Vec::with_capacity(num_segments); num_bins];
    let mut times = Vec::with_capacity(num_segments);

    for segment in 0..num_segments {
        let start = segment * step;
        let chunk = &samples[start..start + nperseg];
        let mean = chunk.iter().sum::<f64>() / nperseg as f64;
        for ((slot, &x), &w) in buffer.iter_mut().zip(chunk).zip(window) {
            *slot = Complex::new((x - mean) * w, 0.0);
        }
        fft.process(&mut buffer);

        for (bin, row) in power.iter_mut().enumerate() {
            let mut p = buffer[bin].norm_sqr() * scale;
            if bin != 0 && !(nperseg % 2 == 0 && bin == nperseg / 2) {
                p *= 2.0;
            }
            row.push(p);
        }
        times.push((start as f64 + nperseg as f64 / 2.0) / sample_rate);
    }

    Ok(SpectrogramData {
        frequencies: bin_frequencies(num_bins, nperseg, sample_rate),
        times,
        power,
    })
}

/// Welch PSD estimate: mean of the segment spectra
pub fn welch(
    samples: &[f64],
    sample_rate: f64,
    window: &[f64],
    overlap: usize,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let stft = stft_power(samples, sample_rate, window, overlap)?;
    let num_segments = stft.times.len().max(1) as f64;
    let density = stft
        .power
        .iter()
        .map(|row| row.iter().sum::<f64>() / num_segments)
        .collect();
    Ok((stft.frequencies, density))
}

/// Single-sided FFT magnitude `|X[k]| / N` for `k < N / 2`, with bin frequencies
pub fn fft_magnitude(samples: &[f64], sample_rate: f64) -> (Vec<f64>, Vec<f64>) {
    let n = samples.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    let half = n / 2;
    let magnitudes = buffer
        .iter()
        .take(half)
        .map(|c| c.norm() / n as f64)
        .collect();
    (bin_frequencies(half, n, sample_rate), magnitudes)
}

fn bin_frequencies(count: usize, fft_len: usize, sample_rate: f64) -> Vec<f64> {
    (0..count)
        .map(|k| k as f64 * sample_rate / fft_len as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::window::{blackman, hann};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn sine(n: usize, freq: f64, fs: f64, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn test_stft_segment_layout() {
        let x = vec![0.5; 4096];
        let stft = stft_power(&x, 1000.0, &blackman(1024), 128).unwrap();
        // (4096 - 128) / 896 = 4 segments
        assert_eq!(stft.times.len(), 4);
        assert_eq!(stft.frequencies.len(), 513);
        assert_eq!(stft.power.len(), 513);
        assert_relative_eq!(stft.times[0], 0.512);
        assert_relative_eq!(stft.frequencies[512], 500.0);
        // Constant input vanishes after detrending
        assert!(stft.power.iter().flatten().all(|p| p.abs() < 1e-20));
    }

    #[test]
    fn test_stft_rejects_bad_segments() {
        let x = vec![0.0; 10];
        assert!(stft_power(&x, 1.0, &hann(16), 0).is_err());
        assert!(stft_power(&x, 1.0, &hann(8), 8).is_err());
    }

    #[test]
    fn test_welch_integrates_to_signal_power() {
        let fs = 8192.0;
        let x = sine(8192 * 4, 1024.0, fs, 2.0);
        let (freqs, psd) = welch(&x, fs, &hann(1024), 512).unwrap();
        let df = freqs[1] - freqs[0];
        let total: f64 = psd.iter().sum::<f64>() * df;
        // Mean power of a sine with amplitude 2 is 2
        assert_relative_eq!(total, 2.0, max_relative = 0.01);

        let peak_bin = psd
            .iter()
            .enumerate()
            .fold((0, 0.0), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
            .0;
        assert_relative_eq!(freqs[peak_bin], 1024.0);
    }

    #[test]
    fn test_fft_magnitude_bin_centred_sine() {
        let fs = 1000.0;
        let x = sine(1000, 50.0, fs, 3.0);
        let (freqs, mags) = fft_magnitude(&x, fs);
        assert_eq!(freqs.len(), 500);
        assert_relative_eq!(freqs[50], 50.0);
        assert_relative_eq!(mags[50], 1.5, epsilon = 1e-9);
        assert!(mags[10] < 1e-9);
    }

    #[test]
    fn test_fft_magnitude_empty() {
        let (freqs, mags) = fft_magnitude(&[], 48000.0);
        assert!(freqs.is_empty() && mags.is_empty());
    }
}
