//! Per-run output directories

use crate::HarvestError;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Timestamp format used for run directory names
pub const RUN_DIR_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Directory name for a run started at `started_at`
pub fn run_dir_name(started_at: &DateTime<Local>) -> String {
    started_at.format(RUN_DIR_FORMAT).to_string()
}

/// Path of the run directory for a run started at `started_at`, without creating it
pub fn run_dir_path(root: &Path, started_at: &DateTime<Local>) -> PathBuf {
    root.join(run_dir_name(started_at))
}

/// Creates `<root>/<timestamp>` (and any missing parents)
///
/// An existing directory is reused, so two runs started within the same second
/// share one directory.
pub fn create_run_dir(root: &Path, started_at: &DateTime<Local>) -> Result<PathBuf, HarvestError> {
    let dir = run_dir_path(root, started_at);

    std::fs::create_dir_all(&dir).map_err(|source| HarvestError::OutputDir {
        path: dir.display().to_string(),
        source,
    })?;

    tracing::debug!("Output directory: {}", dir.display());
    Ok(dir)
}
