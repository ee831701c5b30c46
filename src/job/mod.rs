//! Jobs and their outcomes
//!
//! A [`Job`] is one fetch-and-save unit derived from a link found on the seed
//! page. A [`JobSet`] is the whole batch: the jobs to hand to a strategy plus
//! the outcomes of candidates that were skipped before any network I/O.

mod naming;
mod outcome;

pub use naming::{file_stem_for_url, target_path_for_url, PATH_DELIMITER};
pub use outcome::{ErrorKind, Outcome, OutcomeKind, SkipReason};

use crate::extract::resolve_link;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Sequence number of a job within its batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03}", self.0)
    }
}

/// One unit of fetch-and-persist work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub source_url: String,
    pub target_path: PathBuf,
}

impl Job {
    pub fn new(id: u64, source_url: impl Into<String>, target_path: impl Into<PathBuf>) -> Self {
        Self {
            id: JobId(id),
            source_url: source_url.into(),
            target_path: target_path.into(),
        }
    }
}

/// A batch of jobs ready to run, plus candidates already resolved as skipped
#[derive(Debug, Clone, Default)]
pub struct JobSet {
    /// Jobs handed to the strategy
    pub jobs: Vec<Job>,

    /// Skipped outcomes recorded while building the batch
    pub pre_skipped: Vec<Outcome>,
}

impl JobSet {
    /// Builds a batch from extracted link candidates
    ///
    /// Candidate `i` becomes job `i`. A candidate is skipped without any I/O when
    /// it has no link, when its link does not resolve to an http(s) URL, or when
    /// its derived target file is already claimed by an earlier job in the batch.
    pub fn from_candidates(
        candidates: Vec<Option<String>>,
        base_url: &Url,
        output_dir: &Path,
        extension: &str,
    ) -> Self {
        let mut set = JobSet::default();
        let mut claimed: HashMap<PathBuf, JobId> = HashMap::new();

        for (index, candidate) in candidates.into_iter().enumerate() {
            let job_id = JobId(index as u64);

            let Some(href) = candidate else {
                tracing::debug!("Job {}: no link found", job_id);
                set.pre_skipped.push(Outcome::Skipped {
                    job_id,
                    reason: SkipReason::NoLink,
                });
                continue;
            };

            let Some(source_url) = resolve_link(&href, base_url) else {
                tracing::debug!("Job {}: unsupported link {}", job_id, href);
                set.pre_skipped.push(Outcome::Skipped {
                    job_id,
                    reason: SkipReason::Unsupported { href },
                });
                continue;
            };

            let target_path = target_path_for_url(output_dir, &source_url, extension);
            if let Some(&owner) = claimed.get(&target_path) {
                tracing::warn!(
                    "Job {}: {} collides with job {} on {}",
                    job_id,
                    source_url,
                    owner,
                    target_path.display()
                );
                set.pre_skipped.push(Outcome::Skipped {
                    job_id,
                    reason: SkipReason::Collision { with: owner },
                });
                continue;
            }

            claimed.insert(target_path.clone(), job_id);
            set.jobs.push(Job {
                id: job_id,
                source_url,
                target_path,
            });
        }

        set
    }

    /// Number of candidates in the batch, skipped ones included
    pub fn total(&self) -> usize {
        self.jobs.len() + self.pre_skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
