//! Baseline: one job after another on the calling thread

use crate::executor::pipeline::process_job;
use crate::executor::Workload;
use crate::job::{Job, Outcome};

pub(super) fn run(jobs: &[Job], workload: &Workload) -> Vec<Outcome> {
    jobs.iter().map(|job| process_job(job, workload)).collect()
}
