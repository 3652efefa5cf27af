//! Compare theoretical and experimental photometric waveforms.
//!
//! Raw instrument dumps are filtered, window-averaged and min-max
//! normalised, then paired against a reference collection with coherence,
//! cross-correlation, distance, Fourier, wavelet, k-means,
//! Kolmogorov–Smirnov, R² and Pearson measures. Each measure lands in its own
//! text file under the results directory.
//!
//! ```no_run
//! use photometric_compare::{pipeline, Config};
//!
//! let config = Config::legacy();
//! let result = pipeline::run(&config)?;
//! result.write(&config)?;
//! # Ok::<(), photometric_compare::AnalysisError>(())
//! ```

pub mod compare;
pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod pipeline;

pub use config::Config;
pub use error::{AnalysisError, Result};
pub use pipeline::RunResult;
