//! reqwest-backed asset fetcher

use async_trait::async_trait;
use tracing::debug;

use super::traits::AssetFetcher;
use crate::config::FetchConfig;
use crate::error::{Error, FetchError, FetchFailure, Result};

/// Fetches assets over HTTP(S) with a shared connection pool
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher from the HTTP client settings
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let client = builder.build().map_err(Error::Network)?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(url, FetchFailure::Status(status.as_u16())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::new(url, FetchFailure::Body(e.to_string())))?;

        debug!(url, bytes = body.len(), "asset fetched");
        Ok(body.to_vec())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
