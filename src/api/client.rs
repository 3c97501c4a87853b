use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{FetchError, Gateway};
use crate::types::{AnalyticsRequest, AnalyticsResult};

/// Source of aggregate analytics for a repository.
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Fetch the aggregate payload for `repository` (an `owner/name` id).
    async fn fetch(&self, repository: &str) -> Result<AnalyticsResult, FetchError>;
}

/// Fetches analytics over HTTP through the gateway.
#[derive(Clone)]
pub struct HttpAnalyticsBackend {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpAnalyticsBackend {
    /// Resolve `endpoint` through `gateway` and build a client with the given
    /// transport timeout.
    pub fn new(gateway: &Gateway, endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let endpoint = gateway.route(endpoint)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AnalyticsBackend for HttpAnalyticsBackend {
    async fn fetch(&self, repository: &str) -> Result<AnalyticsResult, FetchError> {
        let body = AnalyticsRequest {
            repository: repository.to_string(),
        };

        debug!(endpoint = %self.endpoint, repository, "posting analytics request");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        // Decode separately so a bad body is reported as a decode error rather
        // than a transport error.
        let bytes = response.bytes().await?;
        let result = serde_json::from_slice(&bytes)?;
        debug!(repository, bytes = bytes.len(), "analytics payload decoded");
        Ok(result)
    }
}
