//! Batch orchestration
//!
//! The [`BatchRunner`] takes a batch from seed page to [`BatchResult`]:
//! 1. Fetch the seed page and extract one link candidate per content block
//! 2. Build the job set, recording pre-skips without any network I/O
//! 3. Execute the jobs under the selected strategy and time it
//! 4. Merge pre-skips with strategy outcomes and count them
//!
//! Comparing strategies means calling [`BatchRunner::run`] repeatedly with the
//! same [`JobSet`]; the runner never retries on its own.

mod output_dir;
mod phase;

pub use output_dir::{create_run_dir, run_dir_name, run_dir_path, RUN_DIR_FORMAT};
pub use phase::BatchPhase;

use phase::PhaseTracker;

use crate::config::Config;
use crate::executor::{ExecutorConfig, Strategy, Workload};
use crate::extract::{HtmlLinkExtractor, LinkExtractor};
use crate::job::JobSet;
use crate::report::BatchResult;
use crate::{ExtractionError, HarvestError};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Orchestrates extraction, execution and aggregation of one batch
///
/// All collaborators are passed in at construction; the runner holds no
/// process-wide state.
pub struct BatchRunner {
    workload: Workload,
    extractor: Arc<dyn LinkExtractor>,
    executor_config: ExecutorConfig,
    extension: String,
}

impl BatchRunner {
    /// Creates a runner from explicit collaborators
    ///
    /// # Arguments
    ///
    /// * `workload` - Fetchers and persister every job runs against
    /// * `extractor` - Turns the seed page into link candidates
    /// * `executor_config` - Strategy tuning (bounded pool size)
    /// * `extension` - File extension for saved resources
    pub fn new(
        workload: Workload,
        extractor: Arc<dyn LinkExtractor>,
        executor_config: ExecutorConfig,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            workload,
            extractor,
            executor_config,
            extension: extension.into(),
        }
    }

    /// Creates a runner with real HTTP fetchers, filesystem persistence and
    /// the configured HTML selectors
    ///
    /// Builds a blocking HTTP client, so must not be called from inside an
    /// async runtime.
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let workload = Workload::http(&config.http)?;
        let extractor = HtmlLinkExtractor::from_config(&config.extract)?;

        Ok(Self::new(
            workload,
            Arc::new(extractor),
            ExecutorConfig::new(config.batch.pool_size),
            config.output.extension.clone(),
        ))
    }

    pub fn executor_config(&self) -> &ExecutorConfig {
        &self.executor_config
    }

    /// Fetches the seed page and builds the job set (`Idle -> JobsLoaded`)
    ///
    /// `output_dir` is only used to derive target paths; nothing is written.
    ///
    /// # Returns
    ///
    /// * `Ok(JobSet)` - Jobs to run plus candidates already skipped
    /// * `Err(ExtractionError)` - The seed URL is invalid or its page could not
    ///   be fetched; no job has run
    pub fn load_jobs(&self, seed_url: &str, output_dir: &Path) -> Result<JobSet, ExtractionError> {
        self.load_tracked(&mut PhaseTracker::new(), seed_url, output_dir)
    }

    /// Runs a loaded job set under `strategy` (`JobsLoaded -> Done`)
    ///
    /// Never fails: per-job errors are counted in the result. The duration
    /// covers only the strategy's execution.
    pub fn run(&self, job_set: &JobSet, strategy: Strategy) -> BatchResult {
        self.run_tracked(&mut PhaseTracker::resume(BatchPhase::JobsLoaded), job_set, strategy)
    }

    /// Loads jobs from `seed_url` and runs them once (`Idle -> Done`)
    pub fn harvest(
        &self,
        seed_url: &str,
        output_dir: &Path,
        strategy: Strategy,
    ) -> Result<BatchResult, ExtractionError> {
        let mut phase = PhaseTracker::new();
        let job_set = self.load_tracked(&mut phase, seed_url, output_dir)?;
        Ok(self.run_tracked(&mut phase, &job_set, strategy))
    }

    fn load_tracked(
        &self,
        phase: &mut PhaseTracker,
        seed_url: &str,
        output_dir: &Path,
    ) -> Result<JobSet, ExtractionError> {
        let base_url = Url::parse(seed_url).map_err(|source| ExtractionError::InvalidSeed {
            url: seed_url.to_string(),
            source,
        })?;

        tracing::info!("Getting links from {}", seed_url);
        let page = self
            .workload
            .fetcher
            .fetch(seed_url)
            .map_err(|source| ExtractionError::SeedFetch {
                url: seed_url.to_string(),
                source,
            })?;

        let page = String::from_utf8_lossy(&page);
        let candidates = self.extractor.extract_links(&page)?;
        let job_set = JobSet::from_candidates(candidates, &base_url, output_dir, &self.extension);

        phase.advance(BatchPhase::JobsLoaded);
        tracing::info!(
            "Loaded {} jobs ({} skipped before running)",
            job_set.jobs.len(),
            job_set.pre_skipped.len()
        );

        Ok(job_set)
    }

    fn run_tracked(
        &self,
        phase: &mut PhaseTracker,
        job_set: &JobSet,
        strategy: Strategy,
    ) -> BatchResult {
        tracing::info!("Running {} jobs with {}", job_set.jobs.len(), strategy);
        phase.advance(BatchPhase::Running);
        let started = Instant::now();
        let executed = strategy.execute(&job_set.jobs, &self.workload, &self.executor_config);
        let duration = started.elapsed();

        phase.advance(BatchPhase::Aggregated);
        let mut outcomes = Vec::with_capacity(job_set.total());
        outcomes.extend(job_set.pre_skipped.iter().cloned());
        outcomes.extend(executed);
        let result = BatchResult::new(strategy, job_set.total(), outcomes, duration);

        let counts = result.counts();
        tracing::info!(
            "{} finished in {:.2}s: {} succeeded, {} skipped, {} failed",
            strategy,
            duration.as_secs_f64(),
            counts.success,
            counts.skipped,
            counts.failed
        );

        phase.advance(BatchPhase::Done);
        tracing::trace!("Batch went through {:?}", phase.visited());
        result
    }
}
