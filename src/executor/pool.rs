//! Fixed-size pool of reusable worker threads
//!
//! Jobs go into a shared queue up front; each worker pulls the next job when
//! idle, so at most `pool_size` jobs are ever in flight. Outcomes are streamed
//! back over a channel in completion order.

use crate::executor::pipeline::{process_job, reconcile};
use crate::executor::Workload;
use crate::job::{Job, Outcome};
use crossbeam_channel::unbounded;
use std::thread;

pub(super) fn run(jobs: &[Job], workload: &Workload, pool_size: usize) -> Vec<Outcome> {
    if jobs.is_empty() {
        return Vec::new();
    }

    let worker_count = pool_size.clamp(1, jobs.len());

    let (job_tx, job_rx) = unbounded::<&Job>();
    for job in jobs {
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    let (outcome_tx, outcome_rx) = unbounded::<Outcome>();

    thread::scope(|scope| {
        for index in 0..worker_count {
            let job_rx = job_rx.clone();
            let outcome_tx = outcome_tx.clone();

            let spawned = thread::Builder::new()
                .name(format!("pool-{:02}", index))
                .spawn_scoped(scope, move || {
                    let mut processed = 0usize;
                    for job in job_rx.iter() {
                        if outcome_tx.send(process_job(job, workload)).is_err() {
                            break;
                        }
                        processed += 1;
                    }
                    tracing::trace!(
                        "Pool worker {} drained the queue after {} jobs",
                        index,
                        processed
                    );
                });

            if let Err(e) = spawned {
                tracing::error!("Failed to spawn pool worker {}: {}", index, e);
            }
        }

        tracing::debug!("Started {} pool workers for {} jobs", worker_count, jobs.len());
    });

    drop(outcome_tx);
    let outcomes: Vec<Outcome> = outcome_rx.iter().collect();

    reconcile(jobs, outcomes)
}
