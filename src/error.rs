use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop an analysis run.
///
/// Malformed instrument-dump lines are *not* errors: they are dropped by
/// [`crate::data::filter::SampleFilter`] and only counted.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A sequence that cannot be averaged, normalised or correlated.
    #[error("degenerate input ({what}): {reason}")]
    DegenerateInput { what: String, reason: String },

    /// A comparator that needs equal-length operands received unequal ones.
    #[error(
        "{comparator}: reference[{reference}] has {left_len} samples but \
         experimental[{experimental}] has {right_len}"
    )]
    ShapeMismatch {
        comparator: &'static str,
        reference: usize,
        experimental: usize,
        left_len: usize,
        right_len: usize,
    },

    /// A whole-collection comparator received profiles of differing length.
    #[error("{comparator}: profile {index} has {found} samples, expected {expected}")]
    RaggedProfiles {
        comparator: &'static str,
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Malformed content in a sanitised or reference text file.
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The input directory exists but holds no `.txt` dumps.
    #[error("no sample files found in {}", path.display())]
    NoInput { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialising {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn degenerate(what: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::DegenerateInput {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
