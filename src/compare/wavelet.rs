use std::f64::consts::FRAC_1_SQRT_2;

/// One-level Haar decomposition into (approximation, detail) bands.
///
/// Odd-length input is extended symmetrically (the last sample repeats),
/// so each band has `ceil(n / 2)` coefficients.
pub fn haar_level1(signal: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let pairs = signal.len().div_ceil(2);
    let mut approx = Vec::with_capacity(pairs);
    let mut detail = Vec::with_capacity(pairs);
    for pair in signal.chunks(2) {
        let a = pair[0];
        let b = pair.get(1).copied().unwrap_or(a);
        approx.push((a + b) * FRAC_1_SQRT_2);
        detail.push((a - b) * FRAC_1_SQRT_2);
    }
    (approx, detail)
}

/// Approximation band followed by detail band, as one sequence.
pub fn haar_flattened(signal: &[f64]) -> Vec<f64> {
    let (mut approx, detail) = haar_level1(signal);
    approx.extend(detail);
    approx
}
