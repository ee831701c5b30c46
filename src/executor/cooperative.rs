//! Single-threaded cooperative execution
//!
//! Every fetch is a future polled on one current-thread runtime, so network
//! waits for all jobs are multiplexed without extra OS threads. Saves are
//! blocking file writes and run on the runtime's blocking pool; each one is
//! awaited before the batch returns.

use crate::executor::pipeline::{fetch_async, log_finished, log_started, reconcile, save_blocking};
use crate::executor::Workload;
use crate::job::{ErrorKind, Job, Outcome};
use futures::future::join_all;
use std::thread;
use std::time::{Duration, Instant};
use tokio::runtime::{Builder, Handle};

/// How fetch and save are ordered across jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phasing {
    /// Every fetch completes before any save starts
    TwoStage,

    /// Each job saves as soon as its own fetch completes
    Pipelined,
}

pub(super) fn run(jobs: &[Job], workload: &Workload, phasing: Phasing) -> Vec<Outcome> {
    if jobs.is_empty() {
        return Vec::new();
    }

    let outcomes = if Handle::try_current().is_ok() {
        // A runtime can be neither blocked on nor dropped inside another one,
        // so ours lives entirely on a dedicated thread.
        thread::scope(|scope| {
            let spawned = thread::Builder::new()
                .name("cooperative".to_string())
                .spawn_scoped(scope, || drive(jobs, workload, phasing));

            match spawned {
                Ok(handle) => handle.join().unwrap_or_else(|_| {
                    tracing::error!("Cooperative scheduler thread panicked");
                    Vec::new()
                }),
                Err(e) => {
                    tracing::error!("Failed to spawn cooperative scheduler thread: {}", e);
                    Vec::new()
                }
            }
        })
    } else {
        drive(jobs, workload, phasing)
    };

    reconcile(jobs, outcomes)
}

/// Builds a current-thread runtime for this batch and blocks on it
fn drive(jobs: &[Job], workload: &Workload, phasing: Phasing) -> Vec<Outcome> {
    match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime.block_on(run_async(jobs, workload, phasing)),
        Err(e) => {
            tracing::error!("Failed to start cooperative runtime: {}", e);
            jobs.iter()
                .map(|job| {
                    Outcome::failed(
                        job.id,
                        ErrorKind::Worker,
                        format!("failed to start runtime: {}", e),
                        Duration::ZERO,
                    )
                })
                .collect()
        }
    }
}

/// Runs the batch on the current async context
///
/// Returns once every job's fetch and save have completed.
pub async fn run_async(jobs: &[Job], workload: &Workload, phasing: Phasing) -> Vec<Outcome> {
    match phasing {
        Phasing::TwoStage => two_stage(jobs, workload).await,
        Phasing::Pipelined => pipelined(jobs, workload).await,
    }
}

async fn two_stage(jobs: &[Job], workload: &Workload) -> Vec<Outcome> {
    let started = Instant::now();
    jobs.iter().for_each(log_started);

    let fetched = join_all(jobs.iter().map(|job| fetch_async(job, workload, started))).await;

    tracing::debug!("All {} fetches completed, starting saves", jobs.len());

    let saves = jobs.iter().zip(fetched).map(|(job, fetched)| async move {
        let outcome = match fetched {
            Ok(content) => save_blocking(job, workload, content, started).await,
            Err(outcome) => outcome,
        };
        log_finished(job, &outcome);
        outcome
    });

    join_all(saves).await
}

async fn pipelined(jobs: &[Job], workload: &Workload) -> Vec<Outcome> {
    let pipelines = jobs.iter().map(|job| async move {
        let started = Instant::now();
        log_started(job);

        let outcome = match fetch_async(job, workload, started).await {
            Ok(content) => save_blocking(job, workload, content, started).await,
            Err(outcome) => outcome,
        };

        log_finished(job, &outcome);
        outcome
    });

    join_all(pipelines).await
}
