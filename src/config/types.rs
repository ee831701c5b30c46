use crate::executor::Strategy;
use serde::Deserialize;

/// Main configuration structure for link-harvest
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub batch: BatchConfig,
    pub http: HttpConfig,
    pub extract: ExtractConfig,
    pub output: OutputConfig,
}

/// Batch execution configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Concurrency strategy used when the CLI does not pick one
    pub strategy: Strategy,

    /// Maximum number of in-flight jobs for the bounded pool
    #[serde(rename = "pool-size")]
    pub pool_size: usize,

    /// How many rounds of the comparison loop to run
    pub repeat: u32,

    /// Pause between two consecutive runs (milliseconds)
    #[serde(rename = "pause-between-runs-ms")]
    pub pause_between_runs_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::BoundedPool,
            pool_size: default_pool_size(),
            repeat: 1,
            pause_between_runs_ms: 0,
        }
    }
}

/// Default pool size: one worker per core plus a few for I/O waits, capped at 32
pub fn default_pool_size() -> usize {
    (num_cpus::get() + 4).min(32)
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("link-harvest/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Link extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// CSS selector for the marked content blocks
    #[serde(rename = "block-selector")]
    pub block_selector: String,

    /// CSS selector applied inside each block; the first match carries the href
    #[serde(rename = "link-selector")]
    pub link_selector: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            block_selector: "span.commtext".to_string(),
            link_selector: "a".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory under which per-run directories are created
    pub root: String,

    /// File extension appended to derived filenames
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: "output".to_string(),
            extension: "html".to_string(),
        }
    }
}
