//! Distribution and Regression Statistics
//!
//! Two-sample Kolmogorov–Smirnov test, coefficient of determination and
//! Pearson correlation. R² is delegated to `aprender::metrics`; the KS
//! p-value and Pearson r stay in f64 here.

use std::f64::consts::PI;

use aprender::metrics;
use aprender::primitives::Vector;

use super::PairError;

/// Above this combined sample size the KS p-value switches from the exact
/// lattice-path probability to the asymptotic Kolmogorov distribution.
const KS_EXACT_MAX_TOTAL: usize = 10_000;

/// Two-sample KS statistic with its p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsResult {
    pub statistic: f64,
    pub p_value: f64,
}

/// Two-sided two-sample Kolmogorov–Smirnov test.
///
/// The statistic is `max |F_a(x) − F_b(x)|` over the pooled sample.
pub fn ks_2samp(a: &[f64], b: &[f64]) -> Result<KsResult, PairError> {
    if a.is_empty() || b.is_empty() {
        return Err(PairError::Degenerate("KS test needs non-empty samples".into()));
    }
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (m, n) = (a.len(), b.len());
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;
    while i < m && j < n {
        let v = if a[i].total_cmp(&b[j]).is_le() { a[i] } else { b[j] };
        while i < m && a[i].total_cmp(&v).is_le() {
            i += 1;
        }
        while j < n && b[j].total_cmp(&v).is_le() {
            j += 1;
        }
        d = d.max((i as f64 / m as f64 - j as f64 / n as f64).abs());
    }

    let p_value = if m + n <= KS_EXACT_MAX_TOTAL {
        ks_exact_pvalue(m, n, d)
    } else {
        let en = (m * n) as f64 / (m + n) as f64;
        kolmogorov_sf(d * en.sqrt())
    };

    Ok(KsResult {
        statistic: d,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// `P(D ≥ d)` under the null: one minus the probability that a uniformly
/// random monotone lattice path from (0,0) to (m,n) keeps
/// `|i·n − j·m| < d·m·n` at every point.
fn ks_exact_pvalue(m: usize, n: usize, d: f64) -> f64 {
    // d is a multiple of 1/(m·n); rounding recovers the integer bound.
    let bound = (d * m as f64 * n as f64).round() as i128;
    let inside = |i: usize, j: usize| ((i * n) as i128 - (j * m) as i128).abs() < bound;

    // row[j] = probability of reaching (i, j) without leaving the band.
    let mut row = vec![0.0f64; n + 1];
    for i in 0..=m {
        for j in 0..=n {
            let p = if i == 0 && j == 0 {
                1.0
            } else {
                let from_left = if i > 0 {
                    // step i-1 -> i taken from (i-1, j)
                    let rem_i = (m - (i - 1)) as f64;
                    let rem = (m - (i - 1) + n - j) as f64;
                    row[j] * rem_i / rem
                } else {
                    0.0
                };
                let from_below = if j > 0 {
                    let rem_j = (n - (j - 1)) as f64;
                    let rem = (m - i + n - (j - 1)) as f64;
                    row[j - 1] * rem_j / rem
                } else {
                    0.0
                };
                from_left + from_below
            };
            row[j] = if inside(i, j) { p } else { 0.0 };
        }
    }
    1.0 - row[n]
}

/// Survival function of the limiting Kolmogorov distribution.
fn kolmogorov_sf(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    if lambda < 1.18 {
        // Small-argument form, converges where the alternating series does not.
        let y = -PI * PI / (8.0 * lambda * lambda);
        let sum: f64 = (0..8)
            .map(|k| {
                let odd = (2 * k + 1) as f64;
                (odd * odd * y).exp()
            })
            .sum();
        1.0 - (2.0 * PI).sqrt() / lambda * sum
    } else {
        let sum: f64 = (1..=100)
            .map(|k| {
                let k = k as f64;
                let sign = if k as u64 % 2 == 1 { 1.0 } else { -1.0 };
                sign * (-2.0 * k * k * lambda * lambda).exp()
            })
            .sum();
        2.0 * sum
    }
}

/// Coefficient of determination, `truth` as ground truth and `predicted`
/// as the model output. Scored by aprender in f32.
///
/// When `truth` has zero variance the score is `1.0` for a perfect
/// prediction and `0.0` otherwise.
pub fn r_squared(truth: &[f64], predicted: &[f64]) -> Result<f64, PairError> {
    if truth.len() != predicted.len() {
        return Err(PairError::LengthMismatch);
    }
    if truth.is_empty() {
        return Err(PairError::Degenerate("R² needs at least one sample".into()));
    }
    let first = truth[0];
    if truth.iter().all(|&t| t == first) {
        let exact = truth.iter().zip(predicted).all(|(t, p)| t == p);
        return Ok(if exact { 1.0 } else { 0.0 });
    }

    let to_vector = |values: &[f64]| {
        Vector::from_slice(&values.iter().map(|&v| v as f32).collect::<Vec<f32>>())
    };
    let score = metrics::r_squared(&to_vector(predicted), &to_vector(truth));
    Ok(f64::from(score))
}

/// Pearson product-moment correlation coefficient.
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64, PairError> {
    if a.len() != b.len() {
        return Err(PairError::LengthMismatch);
    }
    if a.len() < 2 {
        return Err(PairError::Degenerate("Pearson r needs at least two samples".into()));
    }
    let len = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / len;
    let mean_b = b.iter().sum::<f64>() / len;

    let (mut sab, mut saa, mut sbb) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        sab += dx * dy;
        saa += dx * dx;
        sbb += dy * dy;
    }
    if saa == 0.0 || sbb == 0.0 {
        return Err(PairError::Degenerate(
            "Pearson r is undefined for a constant sequence".into(),
        ));
    }
    Ok((sab / (saa * sbb).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_samples_give_zero_statistic() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let ks = ks_2samp(&x, &x).unwrap();
        assert_eq!(ks.statistic, 0.0);
        assert_eq!(ks.p_value, 1.0);
    }

    #[test]
    fn disjoint_samples_give_unit_statistic() {
        let ks = ks_2samp(&[0.0, 0.1, 0.2], &[5.0, 6.0, 7.0]).unwrap();
        assert_eq!(ks.statistic, 1.0);
        // Only 2 of the C(6,3) = 20 paths reach D = 1.
        assert!((ks.p_value - 0.1).abs() < 1e-12);
    }

    #[test]
    fn ks_matches_reference_value() {
        // 50 of the C(11, 5) = 462 interleavings reach D >= 2/3.
        let ks = ks_2samp(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.5, 4.5, 5.5, 6.0, 7.0, 8.0]).unwrap();
        assert!((ks.statistic - 2.0 / 3.0).abs() < 1e-12);
        assert!((ks.p_value - 50.0 / 462.0).abs() < 1e-9);
    }

    #[test]
    fn ks_ties_across_samples() {
        let ks = ks_2samp(&[1.0, 1.0, 2.0], &[1.0, 2.0, 2.0]).unwrap();
        assert!((ks.statistic - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn asymptotic_tail_is_monotone() {
        assert_eq!(kolmogorov_sf(0.0), 1.0);
        let vals: Vec<f64> = [0.3, 0.8, 1.18, 1.5, 2.5].iter().map(|&l| kolmogorov_sf(l)).collect();
        assert!(vals.windows(2).all(|w| w[0] > w[1]));
        // Q(1.36) ≈ 0.05
        assert!((kolmogorov_sf(1.358) - 0.05).abs() < 1e-3);
    }

    #[test]
    fn r_squared_of_perfect_prediction_is_one() {
        let x = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(r_squared(&x, &x), Ok(1.0));
        assert_eq!(r_squared(&[2.0, 2.0], &[2.0, 2.0]), Ok(1.0));
        assert_eq!(r_squared(&[2.0, 2.0], &[2.0, 3.0]), Ok(0.0));
    }

    #[test]
    fn r_squared_of_partial_fit() {
        let r2 = r_squared(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 5.0]).unwrap();
        assert!((r2 - 0.8).abs() < 1e-6);
    }

    #[test]
    fn r_squared_of_mean_prediction_is_zero() {
        let truth = [1.0, 2.0, 3.0];
        assert_eq!(r_squared(&truth, &[2.0, 2.0, 2.0]), Ok(0.0));
        assert_eq!(r_squared(&truth, &[1.0]), Err(PairError::LengthMismatch));
    }

    #[test]
    fn pearson_extremes() {
        let x = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(pearson(&x, &x), Ok(1.0));
        assert_eq!(pearson(&x, &[3.0, 2.0, 1.0, 0.0]), Ok(-1.0));
        assert!(matches!(pearson(&x, &[1.0; 4]), Err(PairError::Degenerate(_))));
        assert_eq!(pearson(&x, &[1.0]), Err(PairError::LengthMismatch));
    }
}
