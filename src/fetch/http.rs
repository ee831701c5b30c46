//! reqwest-backed fetchers

use crate::config::HttpConfig;
use crate::fetch::{AsyncFetcher, FetchError, Fetcher};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Builds the blocking HTTP client used by the thread-based strategies
///
/// Must not be called (or the client dropped) from inside an async runtime.
///
/// # Example
///
/// ```no_run
/// use link_harvest::config::HttpConfig;
/// use link_harvest::fetch::build_blocking_client;
///
/// let client = build_blocking_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_blocking_client(
    config: &HttpConfig,
) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the async HTTP client used by the cooperative strategies
///
/// Each cooperative batch runs on its own runtime, so idle connections are not
/// pooled across calls.
pub fn build_async_client(config: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_max_idle_per_host(0)
        .gzip(true)
        .brotli(true)
        .build()
}

fn check_status(url: &str, status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// Blocking fetcher over `reqwest::blocking`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_blocking_client(config)?))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::trace!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::from_reqwest(url, &e))?;
        check_status(url, response.status())?;

        let body = response
            .bytes()
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        tracing::trace!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

/// Async fetcher over `reqwest`
#[derive(Debug, Clone)]
pub struct AsyncHttpFetcher {
    client: reqwest::Client,
}

impl AsyncHttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_async_client(config)?))
    }
}

#[async_trait]
impl AsyncFetcher for AsyncHttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::trace!("GET {} (async)", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;
        check_status(url, response.status())?;

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        tracing::trace!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
