//! Comparator suite: every measure applied to (reference, experimental).
//!
//! Pairwise comparators walk the Cartesian product reference-major, so the
//! result at index `r * experimental.len() + e` belongs to reference `r`
//! and experimental `e`. Single-collection comparators (Fourier, wavelet)
//! emit one file per collection; k-means emits one label per profile.

pub mod cluster;
pub mod distance;
pub mod spectral;
pub mod stats;
pub mod wavelet;

use serde::{Deserialize, Serialize};

use crate::config::{CentroidInit, Config, DtwMode};
use crate::data::model::{ProfileSet, ResultValue};
use crate::error::{AnalysisError, Result};

use cluster::KMeans;
use spectral::CrossSpectrum;

// ---------------------------------------------------------------------------
// Comparator catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparatorKind {
    Coherence,
    CrossCorrelation,
    Dtw,
    Fourier,
    Wavelet,
    KMeans,
    KsTest,
    RSquared,
    Pearson,
}

impl ComparatorKind {
    pub const ALL: [ComparatorKind; 9] = [
        ComparatorKind::Coherence,
        ComparatorKind::CrossCorrelation,
        ComparatorKind::Dtw,
        ComparatorKind::Fourier,
        ComparatorKind::Wavelet,
        ComparatorKind::KMeans,
        ComparatorKind::KsTest,
        ComparatorKind::RSquared,
        ComparatorKind::Pearson,
    ];

    /// Short name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            ComparatorKind::Coherence => "coherence",
            ComparatorKind::CrossCorrelation => "xcorr",
            ComparatorKind::Dtw => "dtw",
            ComparatorKind::Fourier => "fourier",
            ComparatorKind::Wavelet => "wavelet",
            ComparatorKind::KMeans => "kmeans",
            ComparatorKind::KsTest => "kstest",
            ComparatorKind::RSquared => "rsquare",
            ComparatorKind::Pearson => "pearson",
        }
    }

    /// Whether every reference profile must have the length of every
    /// experimental profile.
    pub fn requires_equal_lengths(self, dtw_mode: DtwMode) -> bool {
        match self {
            ComparatorKind::Dtw => dtw_mode == DtwMode::Euclidean,
            ComparatorKind::KMeans | ComparatorKind::RSquared | ComparatorKind::Pearson => true,
            _ => false,
        }
    }
}

/// Why a single pair could not be compared. Mapped to an
/// [`AnalysisError`] carrying the comparator and pair indices.
#[derive(Debug, Clone, PartialEq)]
pub enum PairError {
    LengthMismatch,
    Degenerate(String),
}

/// One result file worth of records.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparatorOutput {
    pub kind: ComparatorKind,
    pub file_name: String,
    pub values: Vec<ResultValue>,
}

impl ComparatorOutput {
    fn new(kind: ComparatorKind, file_name: impl Into<String>, values: Vec<ResultValue>) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            values,
        }
    }
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

/// Apply `f` to every (reference, experimental) pair, reference-major.
/// The first failing pair aborts with its indices attached.
pub fn pairwise<F>(
    comparator: &'static str,
    reference: &ProfileSet,
    experimental: &ProfileSet,
    mut f: F,
) -> Result<Vec<ResultValue>>
where
    F: FnMut(&[f64], &[f64]) -> std::result::Result<ResultValue, PairError>,
{
    let mut out = Vec::with_capacity(reference.len() * experimental.len());
    for (r, rp) in reference.iter().enumerate() {
        for (e, ep) in experimental.iter().enumerate() {
            let value = f(&rp.values, &ep.values).map_err(|err| match err {
                PairError::LengthMismatch => AnalysisError::ShapeMismatch {
                    comparator,
                    reference: r,
                    experimental: e,
                    left_len: rp.len(),
                    right_len: ep.len(),
                },
                PairError::Degenerate(reason) => AnalysisError::DegenerateInput {
                    what: format!(
                        "{comparator} reference[{r}] ({}) vs experimental[{e}] ({})",
                        rp.name, ep.name
                    ),
                    reason,
                },
            })?;
            out.push(value);
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Suite
// ---------------------------------------------------------------------------

/// Runs the configured comparators over normalised collections.
pub struct ComparatorSuite<'a> {
    config: &'a Config,
    reference: &'a ProfileSet,
    experimental: &'a ProfileSet,
}

impl<'a> ComparatorSuite<'a> {
    pub fn new(
        config: &'a Config,
        reference: &'a ProfileSet,
        experimental: &'a ProfileSet,
    ) -> Self {
        Self {
            config,
            reference,
            experimental,
        }
    }

    /// Every configured comparator, in configuration order.
    pub fn run_all(&self) -> Result<Vec<ComparatorOutput>> {
        let mut outputs = Vec::new();
        for &kind in &self.config.comparators {
            log::info!("Running {} comparator", kind.name());
            outputs.extend(self.run(kind)?);
        }
        Ok(outputs)
    }

    pub fn run(&self, kind: ComparatorKind) -> Result<Vec<ComparatorOutput>> {
        let (reference, experimental) = (self.reference, self.experimental);
        let name = kind.name();
        let single = |file: &str, values: Vec<ResultValue>| -> Result<Vec<ComparatorOutput>> {
            Ok(vec![ComparatorOutput::new(kind, file, values)])
        };

        match kind {
            ComparatorKind::Coherence => {
                let est = CrossSpectrum::new(
                    self.config.coherence.segment_len,
                    self.config.coherence.sample_rate,
                );
                let values = pairwise(name, reference, experimental, |a, b| {
                    Ok(ResultValue::Scalar(est.mean_coherence(a, b)))
                })?;
                single("coherence_results.txt", values)
            }
            ComparatorKind::CrossCorrelation => {
                let values = pairwise(name, reference, experimental, |a, b| {
                    Ok(ResultValue::Sequence(spectral::cross_correlate(a, b)))
                })?;
                single("xcorr_results.txt", values)
            }
            ComparatorKind::Dtw => {
                let mode = self.config.dtw_mode;
                let values = pairwise(name, reference, experimental, |a, b| {
                    let d = match mode {
                        DtwMode::Euclidean => distance::euclidean(a, b)?,
                        DtwMode::Warping => distance::dtw(a, b)?,
                    };
                    Ok(ResultValue::Scalar(d))
                })?;
                single("dtw_results.txt", values)
            }
            ComparatorKind::Fourier => Ok(self.per_collection(kind, |p| {
                ResultValue::Sequence(spectral::fft_magnitude(p))
            })),
            ComparatorKind::Wavelet => Ok(self.per_collection(kind, |p| {
                ResultValue::Sequence(wavelet::haar_flattened(p))
            })),
            ComparatorKind::KMeans => single("cluster_results.txt", self.cluster_labels()?),
            ComparatorKind::KsTest => {
                let values = pairwise(name, reference, experimental, |a, b| {
                    let ks = stats::ks_2samp(a, b)?;
                    Ok(ResultValue::Pair(ks.statistic, ks.p_value))
                })?;
                single("kstest_results.txt", values)
            }
            ComparatorKind::RSquared => {
                let values = pairwise(name, reference, experimental, |a, b| {
                    stats::r_squared(a, b).map(ResultValue::Scalar)
                })?;
                single("rsquare_results.txt", values)
            }
            ComparatorKind::Pearson => {
                let values = pairwise(name, reference, experimental, |a, b| {
                    stats::pearson(a, b).map(ResultValue::Scalar)
                })?;
                single("pearson_results.txt", values)
            }
        }
    }

    /// `<kind>_theoretical_results.txt` and `<kind>_experimental_results.txt`,
    /// one line per profile.
    fn per_collection<F>(&self, kind: ComparatorKind, f: F) -> Vec<ComparatorOutput>
    where
        F: Fn(&[f64]) -> ResultValue,
    {
        [("theoretical", self.reference), ("experimental", self.experimental)]
            .into_iter()
            .map(|(label, set)| {
                ComparatorOutput::new(
                    kind,
                    format!("{}_{label}_results.txt", kind.name()),
                    set.iter().map(|p| f(&p.values)).collect(),
                )
            })
            .collect()
    }

    /// Labels for reference profiles followed by experimental profiles.
    fn cluster_labels(&self) -> Result<Vec<ResultValue>> {
        let name = ComparatorKind::KMeans.name();
        let points: Vec<&[f64]> = self
            .reference
            .iter()
            .chain(self.experimental.iter())
            .map(|p| p.values.as_slice())
            .collect();

        let Some(expected) = points.first().map(|p| p.len()) else {
            return Ok(Vec::new());
        };
        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| p.len() != expected) {
            return Err(AnalysisError::RaggedProfiles {
                comparator: name,
                index,
                expected,
                found: p.len(),
            });
        }

        let k = self.config.kmeans.clusters;
        if k > points.len() {
            return Err(AnalysisError::InvalidConfig(format!(
                "kmeans.clusters = {k} but only {} profiles to cluster",
                points.len()
            )));
        }

        let seeds: Vec<&[f64]> = match self.config.kmeans.init {
            CentroidInit::Reference => points[..self.reference.len()].to_vec(),
            CentroidInit::KMeansPlusPlus => Vec::new(),
        };
        let fit = KMeans::new(&self.config.kmeans).fit(&points, &seeds)?;
        log::debug!("k-means: k = {k}, inertia {:.6}", fit.inertia);
        Ok(fit.labels.into_iter().map(ResultValue::Label).collect())
    }
}
