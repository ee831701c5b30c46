//! Terminal results of processing a job

use crate::job::JobId;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Category of a per-job failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Transport failure or non-2xx response
    Network,

    /// Writing the fetched content failed
    Io,

    /// The worker or task running the job died before reporting
    Worker,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Io => "io",
            Self::Worker => "worker",
        };
        write!(f, "{}", name)
    }
}

/// Why a job never reached the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkipReason {
    /// The content block carried no link
    NoLink,

    /// The href is not an http(s) resource (mailto:, javascript:, fragment, ...)
    Unsupported { href: String },

    /// Another job in the batch already derives the same target file
    Collision { with: JobId },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLink => write!(f, "no link found"),
            Self::Unsupported { href } => write!(f, "unsupported link '{}'", href),
            Self::Collision { with } => write!(f, "target collides with job {}", with),
        }
    }
}

/// Outcome kind without payload, used for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    Skipped,
    Failed,
}

/// Terminal result of one job
///
/// Every strategy produces exactly one `Outcome` per job it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        job_id: JobId,
        bytes_written: u64,
        #[serde(serialize_with = "serialize_secs")]
        elapsed: Duration,
    },

    Skipped {
        job_id: JobId,
        reason: SkipReason,
    },

    Failed {
        job_id: JobId,
        error_kind: ErrorKind,
        message: String,
        #[serde(serialize_with = "serialize_secs")]
        elapsed: Duration,
    },
}

impl Outcome {
    /// Builds a failure outcome
    pub fn failed(
        job_id: JobId,
        error_kind: ErrorKind,
        message: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self::Failed {
            job_id,
            error_kind,
            message: message.into(),
            elapsed,
        }
    }

    /// The job this outcome belongs to
    pub fn job_id(&self) -> JobId {
        match self {
            Self::Success { job_id, .. }
            | Self::Skipped { job_id, .. }
            | Self::Failed { job_id, .. } => *job_id,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success { .. } => OutcomeKind::Success,
            Self::Skipped { .. } => OutcomeKind::Skipped,
            Self::Failed { .. } => OutcomeKind::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Time spent processing the job; zero for skips
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Success { elapsed, .. } | Self::Failed { elapsed, .. } => *elapsed,
            Self::Skipped { .. } => Duration::ZERO,
        }
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
