//! Periodic analysis windows
//!
//! Periodic (DFT-even) windows: the symmetric window of length `n + 1`
//! with the last point dropped.

use std::f64::consts::PI;

/// Periodic Blackman window
pub fn blackman(n: usize) -> Vec<f64> {
    generalized_cosine(n, &[0.42, 0.5, 0.08])
}

/// Periodic Hann window
pub fn hann(n: usize) -> Vec<f64> {
    generalized_cosine(n, &[0.5, 0.5])
}

fn generalized_cosine(n: usize, coefficients: &[f64]) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| {
            let phase = 2.0 * PI * i as f64 / n as f64;
            coefficients
                .iter()
                .enumerate()
                .map(|(k, a)| {
                    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                    sign * a * (k as f64 * phase).cos()
                })
                .sum()
        })
        .collect()
}
