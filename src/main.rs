use std::path::Path;

use anyhow::{Context, Result};
use photometric_compare::{pipeline, Config};

fn main() -> Result<()> {
    env_logger::init();

    // A JSON config path is the only accepted argument; without it the
    // legacy preset runs against ./SamplesOld.
    let config = match std::env::args_os().nth(1) {
        Some(path) => {
            let path = Path::new(&path);
            Config::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => Config::default(),
    };

    let result = pipeline::run_and_write(&config).context("analysis run failed")?;

    if let Some(report) = &result.ingest {
        log::info!(
            "{} dumps, {} samples kept, {} lines dropped",
            report.files.len(),
            report.total_accepted(),
            report.total_rejected()
        );
    }
    println!(
        "Compared {} reference x {} experimental profiles -> {} result files in {}",
        result.reference.len(),
        result.experimental.len(),
        result.outputs.len(),
        config.results_dir.display()
    );
    Ok(())
}
