use super::PairError;

/// Straight-line distance between two equal-length profiles seen as points
/// in `R^n`. No alignment happens; this is what `dtw_results.txt` has always
/// held.
pub fn euclidean(a: &[f64], b: &[f64]) -> Result<f64, PairError> {
    if a.len() != b.len() {
        return Err(PairError::LengthMismatch);
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt())
}

/// Dynamic time warping distance with `|a_i - b_j|` as local cost.
///
/// Classic O(m·n) recurrence with steps (1,0), (0,1) and (1,1); only two
/// rows are kept. Lengths may differ but neither side may be empty.
pub fn dtw(a: &[f64], b: &[f64]) -> Result<f64, PairError> {
    if a.is_empty() || b.is_empty() {
        return Err(PairError::Degenerate("cannot warp an empty sequence".into()));
    }
    let n = b.len();
    let mut prev = vec![f64::INFINITY; n + 1];
    let mut curr = vec![f64::INFINITY; n + 1];
    prev[0] = 0.0;

    for &x in a {
        curr[0] = f64::INFINITY;
        for (j, &y) in b.iter().enumerate() {
            let best = prev[j].min(prev[j + 1]).min(curr[j]);
            curr[j + 1] = (x - y).abs() + best;
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    Ok(prev[n])
}
