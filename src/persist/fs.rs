use crate::persist::{PersistError, PersistResult, Persister};
use std::path::Path;

/// Writes each resource to its own file
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPersister;

impl FsPersister {
    pub fn new() -> Self {
        Self
    }
}

impl Persister for FsPersister {
    fn save(&self, content: &[u8], target: &Path) -> PersistResult<u64> {
        tracing::trace!("Saving {} bytes to {}", content.len(), target.display());

        std::fs::write(target, content).map_err(|source| PersistError::Write {
            path: target.to_path_buf(),
            source,
        })?;

        Ok(content.len() as u64)
    }
}
