use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compare::ComparatorKind;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Where the experimental profiles come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// A directory of raw instrument dumps (`*.txt`), ingested and averaged.
    Samples { dir: PathBuf },
    /// A previously written sanitised file of averaged profiles.
    Sanitised { path: PathBuf },
}

/// Where the theoretical profiles come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    /// The literal waveforms compiled into [`crate::data::reference`],
    /// resampled to `window_size`.
    Builtin,
    /// A sanitised-format file, one bracketed array per line.
    File { path: PathBuf },
}

/// Parsing rules for instrument dumps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Lines skipped unconditionally at the top of every dump.
    pub header_lines: usize,
    /// Inclusive upper bound for an accepted sample.
    pub sample_bound: u32,
    /// Polarity-inverted samples are stored as `inversion_constant - v`.
    pub inversion_constant: u32,
    /// File-name prefix of the instrument class whose polarity is inverted.
    pub inverted_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceConfig {
    /// Welch segment length (`nperseg`).
    pub segment_len: usize,
    pub sample_rate: f64,
}

/// How k-means picks its starting centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentroidInit {
    /// Seeded k-means++, best of `n_init` restarts.
    KMeansPlusPlus,
    /// The first `k` reference profiles.
    Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansConfig {
    pub clusters: usize,
    pub seed: u64,
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold on the summed squared centroid shift, relative
    /// to the mean per-dimension variance of the data.
    pub tolerance: f64,
    pub init: CentroidInit,
}

/// Distance written to `dtw_results.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtwMode {
    /// Flat Euclidean distance between equal-length profiles.
    Euclidean,
    /// Dynamic-programming time warping with absolute-difference cost.
    Warping,
}

/// Every tunable of a run. The two presets mirror the two historical
/// revisions of the analysis; [`Config::default`] is the legacy one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputSource,
    pub reference: ReferenceSource,
    pub ingest: IngestConfig,
    /// Samples per averaging window; also the averaged profile length.
    pub window_size: usize,
    /// Averaged profiles are also written here when ingesting raw dumps.
    pub sanitised_output: Option<PathBuf>,
    /// Comparators to run, in output order.
    pub comparators: Vec<ComparatorKind>,
    pub coherence: CoherenceConfig,
    pub kmeans: KMeansConfig,
    pub dtw_mode: DtwMode,
    pub results_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::legacy()
    }
}

impl Config {
    /// First revision: 128-sample windows over `SamplesOld`, no polarity
    /// inversion, seven comparators.
    pub fn legacy() -> Self {
        Self {
            input: InputSource::Samples {
                dir: PathBuf::from("SamplesOld"),
            },
            reference: ReferenceSource::Builtin,
            ingest: IngestConfig {
                header_lines: 5,
                sample_bound: 4095,
                inversion_constant: 4096,
                inverted_prefix: None,
            },
            window_size: 128,
            sanitised_output: Some(PathBuf::from("sanitised_data.txt")),
            comparators: vec![
                ComparatorKind::Coherence,
                ComparatorKind::CrossCorrelation,
                ComparatorKind::Dtw,
                ComparatorKind::Fourier,
                ComparatorKind::Wavelet,
                ComparatorKind::KMeans,
                ComparatorKind::KsTest,
            ],
            coherence: CoherenceConfig {
                segment_len: 16,
                sample_rate: 0.1,
            },
            kmeans: KMeansConfig {
                clusters: 2,
                seed: 0,
                n_init: 10,
                max_iter: 300,
                tolerance: 1e-4,
                init: CentroidInit::KMeansPlusPlus,
            },
            dtw_mode: DtwMode::Euclidean,
            results_dir: PathBuf::from("results"),
        }
    }

    /// Second revision: 1500-sample windows, inverted photodiode channel,
    /// reference-seeded clustering and the full comparator set.
    pub fn revised() -> Self {
        Self {
            input: InputSource::Samples {
                dir: PathBuf::from("Samples"),
            },
            ingest: IngestConfig {
                header_lines: 4,
                sample_bound: 4096,
                inversion_constant: 4096,
                inverted_prefix: Some("APD".to_string()),
            },
            window_size: 1500,
            comparators: ComparatorKind::ALL.to_vec(),
            coherence: CoherenceConfig {
                segment_len: 64,
                sample_rate: 1.0,
            },
            kmeans: KMeansConfig {
                clusters: 3,
                seed: 42,
                n_init: 1,
                max_iter: 300,
                tolerance: 1e-4,
                init: CentroidInit::Reference,
            },
            ..Self::legacy()
        }
    }

    /// Load a (possibly partial) JSON config; missing fields take the
    /// legacy defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        let config: Config = serde_json::from_str(&text).map_err(|source| AnalysisError::Json {
            what: "config",
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(AnalysisError::InvalidConfig("window_size must be > 0".into()));
        }
        if self.coherence.segment_len == 0 {
            return Err(AnalysisError::InvalidConfig(
                "coherence.segment_len must be > 0".into(),
            ));
        }
        let rate = self.coherence.sample_rate;
        if rate.is_nan() || rate <= 0.0 {
            return Err(AnalysisError::InvalidConfig(
                "coherence.sample_rate must be positive".into(),
            ));
        }
        if self.kmeans.clusters == 0 {
            return Err(AnalysisError::InvalidConfig("kmeans.clusters must be > 0".into()));
        }
        if self.ingest.inverted_prefix.is_some()
            && self.ingest.sample_bound > self.ingest.inversion_constant
        {
            return Err(AnalysisError::InvalidConfig(
                "ingest.sample_bound exceeds ingest.inversion_constant".into(),
            ));
        }
        if self.kmeans.n_init == 0 {
            return Err(AnalysisError::InvalidConfig("kmeans.n_init must be > 0".into()));
        }
        Ok(())
    }
}
