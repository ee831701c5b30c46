//! Outcome counting and summary printing

use crate::job::{ErrorKind, Outcome, OutcomeKind};
use crate::report::BatchResult;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl OutcomeCounts {
    /// Counts a sequence of outcomes
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Self {
        let mut counts = Self::default();
        for outcome in outcomes {
            match outcome.kind() {
                OutcomeKind::Success => counts.success += 1,
                OutcomeKind::Skipped => counts.skipped += 1,
                OutcomeKind::Failed => counts.failed += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// Failed outcomes grouped by error kind
pub fn failures_by_kind(outcomes: &[Outcome]) -> HashMap<ErrorKind, usize> {
    let mut by_kind = HashMap::new();
    for outcome in outcomes {
        if let Outcome::Failed { error_kind, .. } = outcome {
            *by_kind.entry(*error_kind).or_insert(0) += 1;
        }
    }
    by_kind
}

/// One-line summary of a run, as printed by the comparison loop
pub fn summary_line(result: &BatchResult) -> String {
    let counts = result.counts();
    format!(
        "{} took {:.2} seconds ({} jobs: {} succeeded, {} skipped, {} failed)",
        result.strategy,
        result.duration.as_secs_f64(),
        result.total_jobs,
        counts.success,
        counts.skipped,
        counts.failed
    )
}

/// Prints a detailed summary of a run to stdout
pub fn print_summary(result: &BatchResult) {
    let counts = result.counts();

    println!("=== {} ===", result.strategy);
    println!("  Jobs: {}", result.total_jobs);
    println!("  Wall clock: {:.2} seconds", result.duration.as_secs_f64());

    for (label, count) in [
        ("Succeeded", counts.success),
        ("Skipped", counts.skipped),
        ("Failed", counts.failed),
    ] {
        let percentage = if result.total_jobs > 0 {
            (count as f64 / result.total_jobs as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }

    println!("  Bytes written: {}", result.bytes_written());

    let by_kind = failures_by_kind(&result.outcomes);
    if !by_kind.is_empty() {
        let mut kinds: Vec<_> = by_kind.into_iter().collect();
        kinds.sort_by(|a, b| b.1.cmp(&a.1));

        println!("  Failures by kind:");
        for (kind, count) in kinds {
            println!("    {}: {}", kind, count);
        }
    }
    println!();
}
