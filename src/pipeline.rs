use std::path::PathBuf;

use serde::Serialize;

use crate::compare::{ComparatorKind, ComparatorOutput, ComparatorSuite};
use crate::config::{Config, InputSource};
use crate::data::averaging::average_windows;
use crate::data::filter::SampleFilter;
use crate::data::loader;
use crate::data::model::{IngestReport, ProfileSet};
use crate::data::normalize::normalize_set;
use crate::error::{AnalysisError, Result};
use crate::output;

/// File name of the run manifest inside the results directory.
pub const MANIFEST_FILE: &str = "manifest.json";

// ---------------------------------------------------------------------------
// Run result
// ---------------------------------------------------------------------------

/// Everything one run computed. Nothing is on disk until [`RunResult::write`].
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Averaged, not yet normalised, experimental profiles. `None` when the
    /// run started from a sanitised file.
    pub averaged: Option<ProfileSet>,
    pub ingest: Option<IngestReport>,
    pub reference: ProfileSet,
    pub experimental: ProfileSet,
    pub outputs: Vec<ComparatorOutput>,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    file: &'a str,
    comparator: ComparatorKind,
    records: usize,
}

#[derive(Serialize)]
struct Manifest<'a> {
    config: &'a Config,
    reference: Vec<String>,
    experimental: Vec<String>,
    ingest: Option<&'a IngestReport>,
    files: Vec<ManifestEntry<'a>>,
}

impl RunResult {
    pub fn output(&self, file_name: &str) -> Option<&ComparatorOutput> {
        self.outputs.iter().find(|o| o.file_name == file_name)
    }

    /// Persist the sanitised profiles (if configured), every result file and
    /// the manifest. Returns the written paths.
    pub fn write(&self, config: &Config) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if let (Some(path), Some(averaged)) = (&config.sanitised_output, &self.averaged) {
            loader::write_sanitised(path, averaged)?;
            written.push(path.clone());
        }

        for out in &self.outputs {
            written.push(output::write_results(
                &config.results_dir,
                &out.file_name,
                &out.values,
            )?);
        }

        let manifest = Manifest {
            config,
            reference: self.reference.names(),
            experimental: self.experimental.names(),
            ingest: self.ingest.as_ref(),
            files: self
                .outputs
                .iter()
                .map(|o| ManifestEntry {
                    file: &o.file_name,
                    comparator: o.kind,
                    records: o.values.len(),
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&manifest).map_err(|source| AnalysisError::Json {
            what: "manifest",
            source,
        })?;
        let path = config.results_dir.join(MANIFEST_FILE);
        output::write_lines_atomic(&path, &[json])?;
        written.push(path);

        Ok(written)
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Experimental profiles before normalisation: averaged dumps, or the
/// contents of a sanitised file.
pub fn load_experimental(config: &Config) -> Result<(ProfileSet, Option<IngestReport>)> {
    match &config.input {
        InputSource::Samples { dir } => {
            let filter = SampleFilter::new(&config.ingest);
            let (raw, report) = loader::read_dumps(dir, &filter)?;
            let profiles = raw
                .iter()
                .map(|r| average_windows(&r.name, &r.samples, config.window_size))
                .collect::<Result<Vec<_>>>()?;
            Ok((ProfileSet::new(profiles), Some(report)))
        }
        InputSource::Sanitised { path } => {
            Ok((loader::read_sanitised(path, "experimental")?, None))
        }
    }
}

/// Normalise both collections and run every configured comparator.
pub fn compare(
    config: &Config,
    reference: &ProfileSet,
    experimental: &ProfileSet,
) -> Result<RunResult> {
    let reference = normalize_set(reference)?;
    let experimental = normalize_set(experimental)?;
    let outputs = ComparatorSuite::new(config, &reference, &experimental).run_all()?;
    Ok(RunResult {
        averaged: None,
        ingest: None,
        reference,
        experimental,
        outputs,
    })
}

/// Averaged profiles are `window_size` long, so a reference of any other
/// length cannot pass a length-sensitive comparator.
fn check_reference_len(config: &Config, reference: &ProfileSet) -> Result<()> {
    let Some(kind) = config
        .comparators
        .iter()
        .copied()
        .find(|k| k.requires_equal_lengths(config.dtw_mode))
    else {
        return Ok(());
    };
    match reference.iter().find(|p| p.len() != config.window_size) {
        Some(p) => Err(AnalysisError::InvalidConfig(format!(
            "{}: reference profile {} has {} samples but window_size is {}",
            kind.name(),
            p.name,
            p.len(),
            config.window_size
        ))),
        None => Ok(()),
    }
}

/// Full analysis, in memory. Any failure aborts before a single file is
/// written, so results from a previous run stay intact.
pub fn run(config: &Config) -> Result<RunResult> {
    config.validate()?;

    let reference = loader::load_reference(&config.reference, config.window_size)?;
    if matches!(config.input, InputSource::Samples { .. }) {
        check_reference_len(config, &reference)?;
    }
    let (experimental, ingest) = load_experimental(config)?;
    log::info!(
        "Comparing {} reference against {} experimental profiles",
        reference.len(),
        experimental.len()
    );

    let mut result = compare(config, &reference, &experimental)?;
    if ingest.is_some() {
        result.averaged = Some(experimental);
    }
    result.ingest = ingest;
    Ok(result)
}

/// [`run`], then [`RunResult::write`].
pub fn run_and_write(config: &Config) -> Result<RunResult> {
    let result = run(config)?;
    let written = result.write(config)?;
    log::info!(
        "Run complete: {} files written under {}",
        written.len(),
        config.results_dir.display()
    );
    Ok(result)
}
