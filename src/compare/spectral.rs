//! Spectral Comparators
//!
//! DFT magnitude, linear cross-correlation and Welch-averaged
//! magnitude-squared coherence.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

/// Full-length DFT magnitude `|X[k]|`, `k = 0..n`.
pub fn fft_magnitude(signal: &[f64]) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mut buf: Vec<Complex64> = signal.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(buf.len()).process(&mut buf);
    buf.iter().map(|c| c.norm()).collect()
}

/// Full linear (non-circular) cross-correlation.
///
/// `z[k] = Σ_l a[l] · b[l − k + n − 1]` for `k = 0..m + n − 1`, where
/// `m = a.len()` and `n = b.len()`. Zero lag sits at index `n − 1`.
pub fn cross_correlate(a: &[f64], b: &[f64]) -> Vec<f64> {
    let (m, n) = (a.len(), b.len());
    if m == 0 || n == 0 {
        return Vec::new();
    }
    (0..m + n - 1)
        .map(|k| {
            // b index j = l + (n - 1) - k must lie in 0..n
            let l_start = k.saturating_sub(n - 1);
            let l_end = (k + 1).min(m);
            (l_start..l_end)
                .map(|l| a[l] * b[l + n - 1 - k])
                .sum::<f64>()
        })
        .collect()
}

/// Periodic Hann window (DFT-even), the default for spectral estimation.
fn hann_periodic(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / size as f64).cos()))
        .collect()
}

/// Welch cross spectral density estimator.
///
/// Periodic Hann window, 50 % overlap, constant detrend per segment,
/// one-sided density scaling, mean across segments.
pub struct CrossSpectrum {
    segment_len: usize,
    sample_rate: f64,
}

impl CrossSpectrum {
    pub fn new(segment_len: usize, sample_rate: f64) -> Self {
        Self {
            segment_len,
            sample_rate,
        }
    }

    /// One-sided `Pxy` for `x`, `y`. The shorter input is zero-padded and a
    /// segment length above the signal length is clamped to it.
    pub fn csd(&self, x: &[f64], y: &[f64]) -> Vec<Complex64> {
        let n = x.len().max(y.len());
        if n == 0 || self.segment_len == 0 {
            return Vec::new();
        }
        let pad = |s: &[f64]| {
            let mut v = s.to_vec();
            v.resize(n, 0.0);
            v
        };
        let (x, y) = (pad(x), pad(y));

        let nperseg = self.segment_len.min(n);
        let noverlap = nperseg / 2;
        let step = nperseg - noverlap;
        let window = hann_periodic(nperseg);
        let scale = 1.0 / (self.sample_rate * window.iter().map(|w| w * w).sum::<f64>());
        let bins = nperseg / 2 + 1;

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(nperseg);
        let spectrum = |seg: &[f64]| {
            let mean = seg.iter().sum::<f64>() / seg.len() as f64;
            let mut buf: Vec<Complex64> = seg
                .iter()
                .zip(&window)
                .map(|(&v, &w)| Complex64::new((v - mean) * w, 0.0))
                .collect();
            fft.process(&mut buf);
            buf.truncate(bins);
            buf
        };

        let mut acc = vec![Complex64::new(0.0, 0.0); bins];
        let mut segments = 0usize;
        let mut start = 0;
        while start + nperseg <= n {
            let xs = spectrum(&x[start..start + nperseg]);
            let ys = spectrum(&y[start..start + nperseg]);
            for ((slot, xf), yf) in acc.iter_mut().zip(&xs).zip(&ys) {
                *slot += xf.conj() * yf;
            }
            segments += 1;
            start += step;
        }

        // Fold the negative frequencies in: every bin except DC (and
        // Nyquist for even lengths) is doubled.
        let last_doubled = if nperseg % 2 == 0 { bins - 1 } else { bins };
        let denom = segments as f64;
        acc.iter()
            .enumerate()
            .map(|(k, &p)| {
                let factor = if k > 0 && k < last_doubled { 2.0 } else { 1.0 };
                p * (scale * factor / denom)
            })
            .collect()
    }

    /// Magnitude-squared coherence `|Pxy|² / (Pxx · Pyy)` per frequency bin.
    ///
    /// A bin where either auto spectrum is zero yields NaN.
    pub fn coherence(&self, x: &[f64], y: &[f64]) -> Vec<f64> {
        let pxy = self.csd(x, y);
        let pxx = self.csd(x, x);
        let pyy = self.csd(y, y);
        pxy.iter()
            .zip(&pxx)
            .zip(&pyy)
            .map(|((xy, xx), yy)| xy.norm_sqr() / (xx.re * yy.re))
            .collect()
    }

    /// Arithmetic mean of [`Self::coherence`] over all bins.
    pub fn mean_coherence(&self, x: &[f64], y: &[f64]) -> f64 {
        let c = self.coherence(x, y);
        if c.is_empty() {
            return f64::NAN;
        }
        c.iter().sum::<f64>() / c.len() as f64
    }
}
