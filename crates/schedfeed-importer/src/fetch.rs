//! HTTP retrieval of raw schedule bytes.
//!
//! The fetch step is deliberately dumb: one GET, success status or error,
//! raw bytes back. Format selection and parsing happen elsewhere, and no
//! retry or caching policy lives here.

use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{ImportError, ImportResult};

/// Configuration for the schedule HTTP client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout covering connect and body download.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Whether to verify TLS certificates.
    pub verify_tls: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("schedfeed/", env!("CARGO_PKG_VERSION")).to_string(),
            verify_tls: true,
        }
    }
}

impl FetchConfig {
    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP client for fetching published schedules.
pub struct ScheduleClient {
    /// The underlying HTTP client.
    client: reqwest::Client,
    config: FetchConfig,
}

impl ScheduleClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: FetchConfig) -> ImportResult<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ImportError::transport("failed to create HTTP client").with_source(e)
            })?;

        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    pub fn with_defaults() -> ImportResult<Self> {
        Self::new(FetchConfig::default())
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches the raw schedule bytes behind `url`.
    ///
    /// # Errors
    ///
    /// Returns a `Transport` error for network failures and for any
    /// non-success HTTP status. The response body is returned untouched;
    /// interpreting it is the caller's job.
    pub async fn fetch(&self, url: &str) -> ImportResult<Vec<u8>> {
        trace!(url = %url, "fetching schedule");

        let response = self.client.get(url).send().await.map_err(|e| {
            ImportError::transport("request failed")
                .with_url(url)
                .with_source(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(
                ImportError::transport(format!("unexpected HTTP status {}", status))
                    .with_url(url),
            );
        }

        let body = response.bytes().await.map_err(|e| {
            ImportError::transport("failed to read response body")
                .with_url(url)
                .with_source(e)
        })?;

        debug!(url = %url, bytes = body.len(), "fetched schedule");
        Ok(body.to_vec())
    }
}
