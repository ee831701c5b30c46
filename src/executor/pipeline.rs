//! Per-job fetch-then-save pipeline shared by every strategy
//!
//! All conversions from collaborator failures to [`Outcome::Failed`] happen here,
//! so the strategies only decide *where* a job runs, never *how*.

use crate::executor::Workload;
use crate::fetch::FetchError;
use crate::job::{ErrorKind, Job, JobId, Outcome};
use crate::persist::PersistResult;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs one job on the calling thread, blocking on both fetch and save
pub(crate) fn process_job(job: &Job, workload: &Workload) -> Outcome {
    let started = Instant::now();
    log_started(job);

    let outcome = catch_unwind(AssertUnwindSafe(|| fetch_and_save(job, workload, started)))
        .unwrap_or_else(|panic| worker_died(job.id, panic.as_ref(), started.elapsed()));

    log_finished(job, &outcome);
    outcome
}

fn fetch_and_save(job: &Job, workload: &Workload, started: Instant) -> Outcome {
    let content = match workload.fetcher.fetch(&job.source_url) {
        Ok(content) => content,
        Err(e) => return fetch_failed(job, e, started.elapsed()),
    };

    save_finished(job, workload.persister.save(&content, &job.target_path), started)
}

/// Awaits the async fetch of one job, turning failures and panics into an outcome
pub(crate) async fn fetch_async(
    job: &Job,
    workload: &Workload,
    started: Instant,
) -> Result<Vec<u8>, Outcome> {
    let fetched = AssertUnwindSafe(workload.async_fetcher.fetch(&job.source_url))
        .catch_unwind()
        .await;

    match fetched {
        Ok(Ok(content)) => Ok(content),
        Ok(Err(e)) => Err(fetch_failed(job, e, started.elapsed())),
        Err(panic) => Err(worker_died(job.id, panic.as_ref(), started.elapsed())),
    }
}

/// Saves on the runtime's blocking pool and awaits the result
///
/// The save is a tracked task: the returned future completes only once the
/// file has been written or the write has failed.
pub(crate) async fn save_blocking(
    job: &Job,
    workload: &Workload,
    content: Vec<u8>,
    started: Instant,
) -> Outcome {
    let persister = Arc::clone(&workload.persister);
    let target = job.target_path.clone();

    match tokio::task::spawn_blocking(move || persister.save(&content, &target)).await {
        Ok(saved) => save_finished(job, saved, started),
        Err(e) => Outcome::failed(
            job.id,
            ErrorKind::Worker,
            format!("save task failed: {}", e),
            started.elapsed(),
        ),
    }
}

fn fetch_failed(job: &Job, error: FetchError, elapsed: Duration) -> Outcome {
    tracing::warn!("Job {}: failed to download {}: {}", job.id, job.source_url, error);
    Outcome::failed(job.id, ErrorKind::Network, error.to_string(), elapsed)
}

fn save_finished(job: &Job, saved: PersistResult<u64>, started: Instant) -> Outcome {
    match saved {
        Ok(bytes_written) => Outcome::Success {
            job_id: job.id,
            bytes_written,
            elapsed: started.elapsed(),
        },
        Err(e) => {
            tracing::warn!("Job {}: failed to save {}: {}", job.id, job.source_url, e);
            Outcome::failed(job.id, ErrorKind::Io, e.to_string(), started.elapsed())
        }
    }
}

fn worker_died(job_id: JobId, panic: &(dyn Any + Send), elapsed: Duration) -> Outcome {
    let message = panic_message(panic);
    tracing::error!("Job {}: worker panicked: {}", job_id, message);
    Outcome::failed(job_id, ErrorKind::Worker, format!("worker panicked: {}", message), elapsed)
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn current_thread_name() -> String {
    std::thread::current()
        .name()
        .unwrap_or("unnamed")
        .to_string()
}

pub(crate) fn log_started(job: &Job) {
    tracing::debug!(
        "[job {}] Start {} <{}>",
        job.id,
        job.source_url,
        current_thread_name()
    );
}

pub(crate) fn log_finished(job: &Job, outcome: &Outcome) {
    tracing::debug!(
        "[job {}] End ({:?}). Time: {:.3} seconds. <{}>",
        job.id,
        outcome.kind(),
        outcome.elapsed().as_secs_f64(),
        current_thread_name()
    );
}

/// Enforces exactly one outcome per job
///
/// Duplicates and outcomes for unknown jobs are dropped; jobs without an
/// outcome are recorded as worker failures.
pub(crate) fn reconcile(jobs: &[Job], outcomes: Vec<Outcome>) -> Vec<Outcome> {
    let expected: HashSet<JobId> = jobs.iter().map(|job| job.id).collect();
    let mut seen = HashSet::with_capacity(jobs.len());
    let mut reconciled = Vec::with_capacity(jobs.len());

    for outcome in outcomes {
        let job_id = outcome.job_id();
        if !expected.contains(&job_id) {
            tracing::error!("Dropping outcome for unknown job {}", job_id);
        } else if !seen.insert(job_id) {
            tracing::error!("Dropping duplicate outcome for job {}", job_id);
        } else {
            reconciled.push(outcome);
        }
    }

    for job in jobs.iter().filter(|job| !seen.contains(&job.id)) {
        tracing::error!("Job {} finished without an outcome", job.id);
        reconciled.push(Outcome::failed(
            job.id,
            ErrorKind::Worker,
            "worker exited without reporting an outcome",
            Duration::ZERO,
        ));
    }

    reconciled
}
