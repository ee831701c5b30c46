//! Persisting fetched content
//!
//! This module defines the trait interface for saving one fetched resource and
//! its filesystem implementation.

mod fs;

pub use fs::FsPersister;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while saving content
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PersistError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Write { path, .. } => path,
        }
    }
}

/// Result type for persistence operations
pub type PersistResult<T> = Result<T, PersistError>;

/// Saves fetched content under a target path
///
/// Implementations must be safe to call from many threads at once. Writing the
/// same target concurrently is not guarded; the batch avoids it up front.
pub trait Persister: Send + Sync {
    /// Creates or overwrites `target` with `content`, returning the bytes written
    fn save(&self, content: &[u8], target: &Path) -> PersistResult<u64>;
}
