//! Configuration module for link-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every value has a default, so running without a file is valid.
//!
//! # Example
//!
//! ```no_run
//! use link_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Bounded pool will use {} workers", config.batch.pool_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{default_pool_size, BatchConfig, Config, ExtractConfig, HttpConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_POOL_SIZE};
