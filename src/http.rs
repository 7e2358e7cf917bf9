//! HTTP fetching for the inkcrate pipeline
//!
//! Every network access in the pipeline goes through the [`Fetcher`] trait so
//! that the listing, gathering and packaging stages can be driven against an
//! in-memory source in tests. [`HttpFetcher`] is the `reqwest` implementation
//! used by the CLI.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client as ReqwestClient;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::error::Error as CrateError;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Error type for fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} returned status {status_code}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status_code: u16,
    },
}

impl From<FetchError> for CrateError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Http(e) => CrateError::Http(e),
            _ => CrateError::Fetch(err.to_string()),
        }
    }
}

/// Future returned by [`Fetcher::fetch`]
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, FetchError>> + Send + 'a>>;

/// Resolves a URL to the bytes behind it
pub trait Fetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a>;
}

/// `reqwest` backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: ReqwestClient,
}

impl HttpFetcher {
    /// Create a fetcher sending the given user agent
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    #[instrument(skip(self), level = "debug")]
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("Sending GET request to {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("Request to {} failed with status {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
        Box::pin(self.get(url))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Fetcher answering from a fixed URL → body table
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        responses: HashMap<String, Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.to_string(), body.into());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Fetcher for StaticFetcher {
        fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
            self.requests.lock().unwrap().push(url.to_string());
            let response = self.responses.get(url).cloned();
            Box::pin(async move {
                response.ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status_code: 404,
                })
            })
        }
    }
}
