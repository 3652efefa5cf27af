use crate::error::{AnalysisError, Result};

use super::model::{Profile, ProfileSet};

/// Min-max rescale to `[0, 1]`.
///
/// Non-degenerate input maps its minimum to exactly `0.0` and its maximum to
/// exactly `1.0`; running it again on the output is the identity. Empty,
/// constant or non-finite input is [`AnalysisError::DegenerateInput`].
pub fn normalize(what: &str, values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(AnalysisError::degenerate(what, "cannot normalise an empty sequence"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::degenerate(what, "sequence contains non-finite values"));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range == 0.0 {
        return Err(AnalysisError::degenerate(
            what,
            format!("constant sequence (every value is {min}), min-max range is zero"),
        ));
    }

    Ok(values.iter().map(|&x| (x - min) / range).collect())
}

pub fn normalize_profile(profile: &Profile) -> Result<Profile> {
    Ok(Profile::new(
        profile.name.clone(),
        normalize(&profile.name, &profile.values)?,
    ))
}

/// Normalise every profile, failing on the first degenerate one.
pub fn normalize_set(set: &ProfileSet) -> Result<ProfileSet> {
    set.iter()
        .map(normalize_profile)
        .collect::<Result<Vec<_>>>()
        .map(ProfileSet::new)
}
