//! link-harvest: one batch of fetch-and-save jobs, several concurrency strategies
//!
//! This crate fetches a seed page, extracts one link per marked content block,
//! and downloads every linked resource into a per-run output directory. The same
//! batch can be executed sequentially, with one thread per job, on a bounded
//! worker pool, or on a single-threaded cooperative scheduler, so the strategies
//! can be compared on identical input.

pub mod config;
pub mod executor;
pub mod extract;
pub mod fetch;
pub mod job;
pub mod persist;
pub mod report;
pub mod runner;

use thiserror::Error;

/// Main error type for link-harvest operations
///
/// Per-job failures never surface here; they are recorded as
/// [`job::Outcome::Failed`] instead.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Errors that abort a batch before any job runs
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to fetch seed page {url}: {source}")]
    SeedFetch {
        url: String,
        source: fetch::FetchError,
    },

    #[error("Invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Result type alias for link-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use executor::{ExecutorConfig, Strategy, Workload};
pub use job::{ErrorKind, Job, JobId, JobSet, Outcome};
pub use report::{BatchResult, OutcomeCounts};
pub use runner::{BatchPhase, BatchRunner};
