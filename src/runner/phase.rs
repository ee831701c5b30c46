/// Batch phase definitions for tracking one runner invocation
///
/// A batch moves strictly forward through these phases, reaching `Done`
/// exactly once.
use std::fmt;

/// Represents the current phase of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BatchPhase {
    /// Nothing extracted yet
    Idle,

    /// Jobs built from the seed page, pre-skips recorded
    JobsLoaded,

    /// A strategy is executing the jobs
    Running,

    /// Outcomes merged and counted, duration recorded
    Aggregated,

    /// Result handed to the caller
    Done,
}

impl BatchPhase {
    /// The only phase this one may advance to
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::JobsLoaded),
            Self::JobsLoaded => Some(Self::Running),
            Self::Running => Some(Self::Aggregated),
            Self::Aggregated => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns true if moving to `to` is a legal transition
    pub fn can_transition_to(&self, to: Self) -> bool {
        self.next() == Some(to)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Moves to `to`, logging the transition
    ///
    /// Illegal transitions are a programming error in the runner.
    #[must_use = "the returned phase replaces the current one"]
    pub(crate) fn advance(self, to: Self) -> Self {
        debug_assert!(
            self.can_transition_to(to),
            "invalid batch transition {} -> {}",
            self,
            to
        );
        tracing::trace!("Batch phase {} -> {}", self, to);
        to
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::JobsLoaded => "jobs_loaded",
            Self::Running => "running",
            Self::Aggregated => "aggregated",
            Self::Done => "done",
        }
    }
}

/// Phase of one runner invocation and every phase it has passed through
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PhaseTracker {
    current: BatchPhase,
    visited: Vec<BatchPhase>,
}

impl PhaseTracker {
    /// Tracker for an invocation that starts from the seed page
    pub(crate) fn new() -> Self {
        Self::resume(BatchPhase::Idle)
    }

    /// Tracker for an invocation that picks up an already loaded batch
    pub(crate) fn resume(phase: BatchPhase) -> Self {
        Self {
            current: phase,
            visited: vec![phase],
        }
    }

    pub(crate) fn current(&self) -> BatchPhase {
        self.current
    }

    pub(crate) fn advance(&mut self, to: BatchPhase) {
        self.current = self.current.advance(to);
        self.visited.push(self.current);
    }

    pub(crate) fn visited(&self) -> &[BatchPhase] {
        &self.visited
    }
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
