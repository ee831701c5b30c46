//! One OS thread per job
//!
//! Unbounded: every job gets its own thread immediately, so a
//! large batch means a large number of threads.

use crate::executor::pipeline::{panic_message, process_job, reconcile};
use crate::executor::Workload;
use crate::job::{ErrorKind, Job, Outcome};
use std::thread;
use std::time::Duration;

pub(super) fn run(jobs: &[Job], workload: &Workload) -> Vec<Outcome> {
    let outcomes = thread::scope(|scope| {
        let workers: Vec<_> = jobs
            .iter()
            .map(|job| {
                let spawned = thread::Builder::new()
                    .name(format!("worker-{:03}", job.id.0))
                    .spawn_scoped(scope, move || process_job(job, workload));
                (job, spawned)
            })
            .collect();

        tracing::debug!("Spawned {} workers", workers.len());

        workers
            .into_iter()
            .map(|(job, spawned)| match spawned {
                Ok(handle) => handle.join().unwrap_or_else(|panic| {
                    Outcome::failed(
                        job.id,
                        ErrorKind::Worker,
                        format!("worker panicked: {}", panic_message(panic.as_ref())),
                        Duration::ZERO,
                    )
                }),
                Err(e) => {
                    tracing::error!("Job {}: failed to spawn worker: {}", job.id, e);
                    Outcome::failed(
                        job.id,
                        ErrorKind::Worker,
                        format!("failed to spawn worker: {}", e),
                        Duration::ZERO,
                    )
                }
            })
            .collect()
    });

    reconcile(jobs, outcomes)
}
