use std::path::{Path, PathBuf};

use anyhow::bail;
use splitgrid_core::SplitConfig;
use splitgrid_partition::RuntimeLog;

/// `--runtime-log`, then `[partition].runtime_log`, then the default.
fn log_path(config_path: &Path, explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let config = SplitConfig::from_file_or_default(config_path)?;
    Ok(config.partition_options(None, 1).runtime_log_path().to_path_buf())
}

pub fn show(config_path: &Path, runtime_log: Option<&Path>) -> anyhow::Result<()> {
    let path = log_path(config_path, runtime_log)?;
    match RuntimeLog::load(&path)? {
        Some(log) => {
            for (file, seconds) in log.iter() {
                println!("{seconds:>10.3}s  {file}");
            }
            println!("{} entries in {}", log.len(), path.display());
        }
        None => println!("No runtime log at {}", path.display()),
    }
    Ok(())
}

pub fn record(
    config_path: &Path,
    file: &str,
    seconds: f64,
    runtime_log: Option<&Path>,
) -> anyhow::Result<()> {
    let path = log_path(config_path, runtime_log)?;
    let mut log = RuntimeLog::load(&path)?.unwrap_or_default();
    if !log.insert(file, seconds) {
        bail!("duration must be a non-negative number of seconds, got {seconds}");
    }
    log.save(&path)?;
    tracing::info!(file, seconds, path = %path.display(), "recorded runtime");
    Ok(())
}
