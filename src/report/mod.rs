//! Batch results and their presentation
//!
//! This module handles:
//! - The read-only [`BatchResult`] produced once per run
//! - Counting outcomes by kind
//! - Printing human-readable summaries and JSON export

pub mod stats;

pub use stats::{failures_by_kind, print_summary, summary_line, OutcomeCounts};

use crate::executor::Strategy;
use crate::job::Outcome;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Result of running one batch under one strategy
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// Strategy the batch ran under
    pub strategy: Strategy,

    /// Number of candidates in the batch, pre-skipped ones included
    pub total_jobs: usize,

    /// Counts by outcome kind
    pub counts: OutcomeCounts,

    /// One outcome per candidate, in no particular order
    pub outcomes: Vec<Outcome>,

    /// Wall-clock time of the running phase only
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
}

impl BatchResult {
    pub fn new(
        strategy: Strategy,
        total_jobs: usize,
        outcomes: Vec<Outcome>,
        duration: Duration,
    ) -> Self {
        let counts = OutcomeCounts::from_outcomes(&outcomes);
        Self {
            strategy,
            total_jobs,
            counts,
            outcomes,
            duration,
        }
    }

    pub fn counts(&self) -> OutcomeCounts {
        self.counts
    }

    /// Total bytes persisted by successful jobs
    pub fn bytes_written(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                Outcome::Success { bytes_written, .. } => *bytes_written,
                _ => 0,
            })
            .sum()
    }

    /// Pretty-printed JSON representation
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Pretty-printed JSON array of every run in a comparison
pub fn results_to_json(results: &[BatchResult]) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
