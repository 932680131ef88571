//! Trait for retrieving media bytes

use async_trait::async_trait;

use crate::error::FetchError;

/// Retrieves the full binary payload of one media item
///
/// Implementations must not retry and must not panic: every failure is
/// returned as a [`FetchError`] carrying the requested URL, and the caller
/// decides whether it is fatal.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the bytes behind an already resolved URL
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
