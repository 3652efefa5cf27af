use crate::error::{AnalysisError, Result};

use super::model::Profile;

/// Fold a sample stream into one window-length profile.
///
/// The stream is cut into `floor(n / window)` contiguous, non-overlapping
/// windows from the left; the trailing `n % window` samples are dropped.
/// Element `i` of the result is the mean of element `i` across all windows,
/// so the output length is always exactly `window`.
///
/// A stream shorter than one window has nothing to average and is
/// reported as [`AnalysisError::DegenerateInput`].
pub fn average_windows<T>(name: &str, samples: &[T], window: usize) -> Result<Profile>
where
    T: Copy + Into<f64>,
{
    if window == 0 {
        return Err(AnalysisError::InvalidConfig("window size must be > 0".into()));
    }
    let windows = samples.len() / window;
    if windows == 0 {
        return Err(AnalysisError::degenerate(
            name,
            format!(
                "{} samples is shorter than one {window}-sample window",
                samples.len()
            ),
        ));
    }

    let mut sums = vec![0.0f64; window];
    for chunk in samples.chunks_exact(window) {
        for (sum, &v) in sums.iter_mut().zip(chunk) {
            *sum += v.into();
        }
    }
    let count = windows as f64;
    let values = sums.into_iter().map(|s| s / count).collect();

    log::debug!("{name}: averaged {windows} windows of {window}");
    Ok(Profile::new(name, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_element_wise_and_drops_remainder() {
        let samples: Vec<u32> = vec![1, 2, 3, 3, 4, 5, 100];
        let profile = average_windows("a.txt", &samples, 3).unwrap();
        assert_eq!(profile.values, vec![2.0, 3.0, 4.0]);
        assert_eq!(profile.name, "a.txt");
    }

    #[test]
    fn identical_windows_return_the_window() {
        let window = [10u32, 0, 4095, 7];
        let samples: Vec<u32> = window.iter().copied().cycle().take(4 * 9).collect();
        let profile = average_windows("w", &samples, 4).unwrap();
        assert_eq!(profile.values, vec![10.0, 0.0, 4095.0, 7.0]);
    }

    #[test]
    fn short_stream_is_degenerate() {
        let err = average_windows::<u32>("empty.txt", &[], 128).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DegenerateInput { ref what, .. } if what == "empty.txt"
        ));

        let err = average_windows("short.txt", &[1u32; 127], 128).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { .. }));
    }

    #[test]
    fn zero_window_is_a_config_error() {
        assert!(matches!(
            average_windows("x", &[1u32, 2], 0),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }
}
