use std::path::{Path, PathBuf};

use crate::config::ReferenceSource;
use crate::error::{AnalysisError, Result};
use crate::output;

use super::filter::SampleFilter;
use super::model::{IngestReport, ProfileSet, RawSamples, SequenceRepr};
use super::reference;

// ---------------------------------------------------------------------------
// Instrument dumps
// ---------------------------------------------------------------------------

/// Every `*.txt` file directly inside `dir`, sorted by file name.
///
/// The sort is the pairing contract: comparator output index `i` always
/// refers to the `i`-th file in this order.
pub fn discover_dumps(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| AnalysisError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| AnalysisError::io(dir, e))?.path();
        let is_txt = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if is_txt && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if files.is_empty() {
        return Err(AnalysisError::NoInput {
            path: dir.to_path_buf(),
        });
    }
    Ok(files)
}

/// Read and filter every dump in `dir`.
pub fn read_dumps(dir: &Path, filter: &SampleFilter) -> Result<(Vec<RawSamples>, IngestReport)> {
    let mut raw = Vec::new();
    let mut report = IngestReport::default();

    for path in discover_dumps(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Instrument dumps are not guaranteed to be UTF-8 in their header.
        let bytes = std::fs::read(&path).map_err(|e| AnalysisError::io(&path, e))?;
        let text = String::from_utf8_lossy(&bytes);

        let (samples, file_report) = filter.apply(&name, &text);
        log::debug!(
            "{name}: {} samples accepted, {} lines rejected{}",
            file_report.accepted,
            file_report.rejected,
            if file_report.inverted { " (inverted)" } else { "" }
        );
        raw.push(samples);
        report.files.push(file_report);
    }

    log::info!(
        "Ingested {} dumps from {}: {} samples, {} rejected lines",
        raw.len(),
        dir.display(),
        report.total_accepted(),
        report.total_rejected()
    );
    Ok((raw, report))
}

// ---------------------------------------------------------------------------
// Sanitised profiles: one `[a, b, c]` line per profile
// ---------------------------------------------------------------------------

/// Parse sanitised text. Blank lines are ignored; anything else that is not
/// a bracketed, comma-separated list of floats is a [`AnalysisError::Parse`].
pub fn parse_sanitised(path: &Path, text: &str, prefix: &str) -> Result<ProfileSet> {
    let mut arrays = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parse_err = |reason: String| AnalysisError::Parse {
            path: path.to_path_buf(),
            line: line_no + 1,
            reason,
        };

        let inner = line
            .strip_prefix('[')
            .and_then(|l| l.strip_suffix(']'))
            .ok_or_else(|| parse_err("expected a bracketed list".into()))?;
        if inner.trim().is_empty() {
            return Err(parse_err("empty profile".into()));
        }

        let values = inner
            .split(',')
            .enumerate()
            .map(|(j, tok)| {
                let tok = tok.trim();
                tok.parse::<f64>()
                    .map_err(|_| parse_err(format!("element {j}: '{tok}' is not a number")))
            })
            .collect::<Result<Vec<f64>>>()?;
        arrays.push(values);
    }

    Ok(ProfileSet::from_arrays(prefix, arrays))
}

pub fn read_sanitised(path: &Path, prefix: &str) -> Result<ProfileSet> {
    let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    let set = parse_sanitised(path, &text, prefix)?;
    log::info!("Read {} profiles from {}", set.len(), path.display());
    Ok(set)
}

/// Write profiles in sanitised form, replacing any previous file.
pub fn write_sanitised(path: &Path, set: &ProfileSet) -> Result<()> {
    let lines: Vec<String> = set
        .iter()
        .map(|p| SequenceRepr(&p.values).to_string())
        .collect();
    output::write_lines_atomic(path, &lines)?;
    log::info!("Wrote {} averaged profiles to {}", set.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Reference collection
// ---------------------------------------------------------------------------

/// The theoretical profiles. Builtin waveforms are sampled at `window_size`
/// points; a reference file is taken as written.
pub fn load_reference(source: &ReferenceSource, window_size: usize) -> Result<ProfileSet> {
    match source {
        ReferenceSource::Builtin => Ok(reference::builtin(window_size)),
        ReferenceSource::File { path } => read_sanitised(path, "theoretical"),
    }
}
