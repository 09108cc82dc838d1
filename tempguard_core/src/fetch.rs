//! Source fetchers
//!
//! A fetcher turns a URL into a response body. Failures are typed so the
//! refresh controller can log them, but they never escape a refresh cycle.

use crate::constants;
use crate::error::SourceError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Retrieves raw list payloads
#[async_trait]
pub trait ListFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

/// HTTP GET fetcher with a per-request timeout
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(constants::USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ListFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| SourceError::Request {
            url: url.to_string(),
            source,
        })
    }
}

/// In-memory fetcher serving fixed bodies.
///
/// Unknown URLs answer like a 404. Every call is counted, which makes it
/// usable for offline runs and for asserting that no fetch happened.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`
    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }

    /// Wait this long before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.bodies.get(url).cloned().ok_or_else(|| SourceError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}
