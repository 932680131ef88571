//! Export orchestration split into focused submodules.
//!
//! The `MediaExporter` struct and its methods are organized by concern:
//! - [`album`] - Album export state machine (fetch loop, compression, delivery)
//! - [`single`] - Single-asset download
//! - [`guard`] - Single-flight guard shared by both paths
//! - [`save`] - Staging and saving delivered bytes to the output directory

mod album;
mod guard;
mod save;
mod single;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use guard::{FlightGuard, SingleFlight};
pub use save::TransientFile;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{AssetFetcher, HttpFetcher};
use crate::progress::ProgressTracker;
use crate::resolver::UrlResolver;
use crate::types::{Event, JobId};

/// Main exporter instance (cloneable - all shared state is Arc-wrapped)
///
/// Clones share the same single-flight guard, so at most one export runs per
/// exporter no matter how many handles to it exist.
#[derive(Clone)]
pub struct MediaExporter {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Forced-attachment URL rewriting
    pub(crate) resolver: UrlResolver,
    /// Source of media bytes (trait object for pluggable implementations)
    pub(crate) fetcher: Arc<dyn AssetFetcher>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Per-item progress accounting
    pub(crate) progress: ProgressTracker,
    /// Busy flag preventing overlapping exports
    pub(crate) flight: SingleFlight,
    /// Next job ID
    pub(crate) next_job_id: Arc<AtomicU64>,
}

impl MediaExporter {
    /// Create an exporter that fetches assets over HTTP
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Create an exporter with a custom asset source
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn AssetFetcher>) -> Result<Self> {
        config.validate()?;

        let (event_tx, _rx) = broadcast::channel(config.event_buffer);
        tracing::debug!(
            fetcher = fetcher.name(),
            cdn_host = %config.cdn.cdn_host,
            output_dir = %config.output.output_dir.display(),
            "exporter created"
        );

        Ok(Self {
            resolver: UrlResolver::new(config.cdn.cdn_host.clone()),
            progress: ProgressTracker::new(event_tx.clone()),
            config: Arc::new(config),
            fetcher,
            event_tx,
            flight: SingleFlight::new(),
            next_job_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Subscribe to export events
    ///
    /// Events are broadcast; each subscriber gets its own copy. A subscriber
    /// that falls more than `event_buffer` events behind misses the oldest ones.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Whether an export or single download is currently running
    pub fn is_busy(&self) -> bool {
        self.flight.is_busy()
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolver used for every fetched URL
    pub fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    pub(crate) fn allocate_job_id(&self) -> JobId {
        JobId(self.next_job_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn emit(&self, event: Event) {
        // No subscribers is fine
        self.event_tx.send(event).ok();
    }
}
