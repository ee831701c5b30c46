//! Concurrent fan-out/fan-in execution of a batch of jobs
//!
//! This module contains the one contract every strategy implements:
//! given a slice of jobs, return exactly one [`Outcome`] per job, never fail
//! past the boundary, and only return once all work has reached a terminal
//! state. No thread, pool worker or task outlives [`Strategy::execute`].
//!
//! Strategies:
//! - `sequential`: one job after another, the baseline
//! - `thread-per-job`: one OS thread per job, unbounded
//! - `bounded-pool`: `pool_size` reusable threads pulling from a queue
//! - `async-two-stage`: cooperative, all fetches then all saves
//! - `async-pipelined`: cooperative, each job saves right after its fetch

mod cooperative;
mod pipeline;
mod pool;
mod sequential;
mod threads;

pub use cooperative::{run_async as run_cooperative, Phasing};

use crate::config::{default_pool_size, HttpConfig};
use crate::fetch::{AsyncFetcher, AsyncHttpFetcher, Fetcher, HttpFetcher};
use crate::job::{Job, Outcome};
use crate::persist::{FsPersister, Persister};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Concurrency strategy for executing a batch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One job after another on the calling thread
    Sequential,

    /// One OS thread per job, spawned immediately
    ThreadPerJob,

    /// Fixed number of reusable worker threads
    BoundedPool,

    /// Single-threaded async: every fetch, then every save
    AsyncTwoStage,

    /// Single-threaded async: fetch and save per job, interleaved across jobs
    AsyncPipelined,
}

impl Strategy {
    /// Every strategy, in comparison order
    pub const ALL: [Strategy; 5] = [
        Strategy::Sequential,
        Strategy::ThreadPerJob,
        Strategy::BoundedPool,
        Strategy::AsyncTwoStage,
        Strategy::AsyncPipelined,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::ThreadPerJob => "thread-per-job",
            Self::BoundedPool => "bounded-pool",
            Self::AsyncTwoStage => "async-two-stage",
            Self::AsyncPipelined => "async-pipelined",
        }
    }

    /// Returns true for the single-threaded cooperative strategies
    pub fn is_cooperative(&self) -> bool {
        matches!(self, Self::AsyncTwoStage | Self::AsyncPipelined)
    }

    /// Runs every job under this strategy
    ///
    /// # Returns
    ///
    /// Exactly one outcome per job, in no particular order. Per-job failures
    /// are reported as [`Outcome::Failed`]; this never panics on their account.
    pub fn execute(
        &self,
        jobs: &[Job],
        workload: &Workload,
        config: &ExecutorConfig,
    ) -> Vec<Outcome> {
        tracing::debug!("Executing {} jobs with strategy {}", jobs.len(), self);

        match self {
            Self::Sequential => sequential::run(jobs, workload),
            Self::ThreadPerJob => threads::run(jobs, workload),
            Self::BoundedPool => pool::run(jobs, workload, config.pool_size),
            Self::AsyncTwoStage => cooperative::run(jobs, workload, Phasing::TwoStage),
            Self::AsyncPipelined => cooperative::run(jobs, workload, Phasing::Pipelined),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Tuning knobs for the strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Maximum number of simultaneously in-flight jobs for the bounded pool
    pub pool_size: usize,
}

impl ExecutorConfig {
    pub fn new(pool_size: usize) -> Self {
        Self { pool_size }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::new(default_pool_size())
    }
}

/// The collaborators every job is run against
///
/// Cheap to clone; all strategies of a comparison share one `Workload`.
#[derive(Clone)]
pub struct Workload {
    pub fetcher: Arc<dyn Fetcher>,
    pub async_fetcher: Arc<dyn AsyncFetcher>,
    pub persister: Arc<dyn Persister>,
}

impl Workload {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        async_fetcher: Arc<dyn AsyncFetcher>,
        persister: Arc<dyn Persister>,
    ) -> Self {
        Self {
            fetcher,
            async_fetcher,
            persister,
        }
    }

    /// Real HTTP fetchers and filesystem persistence
    ///
    /// Builds a blocking client, so must not be called from inside an async runtime.
    pub fn http(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            Arc::new(HttpFetcher::from_config(config)?),
            Arc::new(AsyncHttpFetcher::from_config(config)?),
            Arc::new(FsPersister::new()),
        ))
    }
}

impl fmt::Debug for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workload").finish_non_exhaustive()
    }
}
