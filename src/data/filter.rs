use crate::config::IngestConfig;

use super::model::{FileReport, RawSamples};

// ---------------------------------------------------------------------------
// Sample line filter: which dump lines become samples
// ---------------------------------------------------------------------------

/// Line acceptance and polarity rules for instrument dumps.
///
/// A line is a sample when, after trimming, it is a non-empty run of ASCII
/// digits whose value lies in `[0, sample_bound]`. Anything else (signs,
/// decimals, text, out-of-range values) is dropped without error.
#[derive(Debug, Clone)]
pub struct SampleFilter {
    header_lines: usize,
    sample_bound: u32,
    inversion_constant: u32,
    inverted_prefix: Option<String>,
}

impl SampleFilter {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            header_lines: config.header_lines,
            sample_bound: config.sample_bound,
            inversion_constant: config.inversion_constant,
            inverted_prefix: config.inverted_prefix.clone(),
        }
    }

    /// Parse one body line. `None` means the line is not a sample.
    pub fn accept(&self, line: &str) -> Option<u32> {
        let line = line.trim();
        if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Overflowing digit runs are out of range by definition.
        let value: u64 = line.parse().ok()?;
        (value <= u64::from(self.sample_bound)).then_some(value as u32)
    }

    /// Whether samples from this file are stored polarity-inverted.
    pub fn is_inverted(&self, file_name: &str) -> bool {
        self.inverted_prefix
            .as_deref()
            .is_some_and(|prefix| file_name.starts_with(prefix))
    }

    /// Apply header skipping, acceptance and inversion to a whole dump.
    pub fn apply(&self, file_name: &str, text: &str) -> (RawSamples, FileReport) {
        let inverted = self.is_inverted(file_name);
        let mut samples = Vec::new();
        let mut rejected = 0;

        for line in text.lines().skip(self.header_lines) {
            match self.accept(line) {
                Some(v) if inverted => samples.push(self.inversion_constant.saturating_sub(v)),
                Some(v) => samples.push(v),
                None => rejected += 1,
            }
        }

        let report = FileReport {
            name: file_name.to_string(),
            accepted: samples.len(),
            rejected,
            inverted,
        };
        (
            RawSamples {
                name: file_name.to_string(),
                samples,
            },
            report,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(prefix: Option<&str>) -> SampleFilter {
        SampleFilter::new(&IngestConfig {
            header_lines: 2,
            sample_bound: 4095,
            inversion_constant: 4096,
            inverted_prefix: prefix.map(str::to_string),
        })
    }

    #[test]
    fn accepts_only_bare_in_range_integers() {
        let f = filter(None);
        assert_eq!(f.accept("0"), Some(0));
        assert_eq!(f.accept("  4095 \r"), Some(4095));
        assert_eq!(f.accept("4096"), None);
        assert_eq!(f.accept("-1"), None);
        assert_eq!(f.accept("+12"), None);
        assert_eq!(f.accept("12.5"), None);
        assert_eq!(f.accept("1 2"), None);
        assert_eq!(f.accept(""), None);
        assert_eq!(f.accept("Time,Value"), None);
        assert_eq!(f.accept("99999999999999999999999"), None);
    }

    #[test]
    fn header_lines_are_skipped_even_if_numeric() {
        let (raw, report) = filter(None).apply("scope_1.txt", "7\n8\n1\nbad\n2\n");
        assert_eq!(raw.samples, vec![1, 2]);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected, 1);
        assert!(!report.inverted);
    }

    #[test]
    fn inverted_prefix_flips_polarity() {
        let f = filter(Some("APD"));
        let (raw, report) = f.apply("APD_run3.txt", "h\nh\n0\n96\n4095\n");
        assert_eq!(raw.samples, vec![4096, 4000, 1]);
        assert!(report.inverted);

        let (raw, _) = f.apply("PMT_run3.txt", "h\nh\n96\n");
        assert_eq!(raw.samples, vec![96]);
    }

    #[test]
    fn file_shorter_than_header_yields_nothing() {
        let (raw, report) = filter(None).apply("short.txt", "only header\n");
        assert!(raw.samples.is_empty());
        assert_eq!(report.rejected, 0);
    }
}
