//! Fetching a single URL
//!
//! Two contracts share one error type: [`Fetcher`] blocks the calling thread and
//! is used by the thread-based strategies and for the seed page, [`AsyncFetcher`]
//! yields at the I/O wait point and is used by the cooperative strategies.
//! Neither retries or caches; one call is one request.

mod http;

pub use http::{build_async_client, build_blocking_client, AsyncHttpFetcher, HttpFetcher};

use async_trait::async_trait;
use thiserror::Error;

/// Failure to obtain the content of a URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    /// The URL the failed request was sent to
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Transport { url, .. } => url,
        }
    }

    /// Classifies a reqwest error the way the batch reports it
    pub fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        let url = url.to_string();
        if let Some(status) = error.status() {
            Self::Status {
                url,
                status: status.as_u16(),
            }
        } else if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Blocking fetch of one URL
pub trait Fetcher: Send + Sync {
    /// Returns the response body, or fails on transport error or non-2xx status
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Non-blocking fetch of one URL
#[async_trait]
pub trait AsyncFetcher: Send + Sync {
    /// Returns the response body, or fails on transport error or non-2xx status
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
