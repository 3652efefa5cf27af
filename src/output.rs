use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::data::model::ResultValue;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Result writer
// ---------------------------------------------------------------------------

/// Replace `path` with one line per entry.
///
/// The parent directory is created if missing. Content goes to a temp file
/// in the same directory which is then renamed over `path`, so a failed
/// write never leaves a truncated result behind.
pub fn write_lines_atomic<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| AnalysisError::io(&dir, e))?;

    let tmp = NamedTempFile::new_in(&dir).map_err(|e| AnalysisError::io(&dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        for line in lines {
            writeln!(writer, "{}", line.as_ref()).map_err(|e| AnalysisError::io(path, e))?;
        }
        writer.flush().map_err(|e| AnalysisError::io(path, e))?;
    }
    tmp.persist(path)
        .map_err(|e| AnalysisError::io(path, e.error))?;
    Ok(())
}

/// Write one comparator's results as `<results_dir>/<file_name>`.
pub fn write_results(
    results_dir: &Path,
    file_name: &str,
    values: &[ResultValue],
) -> Result<PathBuf> {
    let path = results_dir.join(file_name);
    let lines: Vec<String> = values.iter().map(ToString::to_string).collect();
    write_lines_atomic(&path, &lines)?;
    log::info!("Wrote {} results to {}", values.len(), path.display());
    Ok(path)
}
