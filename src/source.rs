use crate::models::{AnalyticsResponse, ShortCode};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no analytics found")]
    NotFound,
    #[error("analytics backend unreachable: {0}")]
    Transport(String),
    #[error("analytics backend answered with status {0}")]
    Status(u16),
    #[error("analytics response is malformed: {0}")]
    Malformed(String),
    #[error("failed to read analytics: {0}")]
    Io(String),
}

/// Anything that can produce the analytics aggregate for a short code.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn fetch(&self, code: &ShortCode) -> Result<AnalyticsResponse, FetchError>;
}

/// Fetches `GET {base}/analytics/{code}` over HTTP. One request per call, no retry.
#[derive(Debug, Clone)]
pub struct HttpAnalyticsSource {
    client: Client,
    base_url: Url,
}

impl HttpAnalyticsSource {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn analytics_url(&self, code: &ShortCode) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .push("analytics")
            .push(code.as_str());
        Ok(url)
    }
}

#[async_trait]
impl AnalyticsSource for HttpAnalyticsSource {
    async fn fetch(&self, code: &ShortCode) -> Result<AnalyticsResponse, FetchError> {
        let url = self.analytics_url(code)?;
        debug!(%url, "fetching analytics");

        let response = self.client.get(url).send().await.map_err(|err| {
            warn!("analytics request failed: {err}");
            FetchError::Transport(err.to_string())
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(FetchError::NotFound),
            status if !status.is_success() => return Err(FetchError::Status(status.as_u16())),
            _ => {}
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| FetchError::Malformed(err.to_string()))
    }
}
