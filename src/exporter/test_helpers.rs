//! Shared test helpers for creating MediaExporter instances in tests.

use crate::config::Config;
use crate::error::{FetchError, FetchFailure};
use crate::exporter::MediaExporter;
use crate::fetcher::AssetFetcher;
use crate::types::{Event, Media};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tokio::sync::{Semaphore, broadcast};

/// CDN host used by every test exporter
pub(crate) const TEST_CDN_HOST: &str = "cdn.example.com";

/// In-memory fetcher with scripted failures
///
/// Every URL succeeds with a body derived from the URL itself, except URLs
/// registered with [`fail_url`](Self::fail_url). An optional gate holds each
/// fetch until a permit is added, which lets tests observe a job mid-flight.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    failing: Mutex<HashSet<String>>,
    requested: Mutex<Vec<String>>,
    gate: Option<Semaphore>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A fetcher whose fetches block until permits are added to its gate
    pub(crate) fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub(crate) fn fail_url(&self, url: impl Into<String>) {
        self.failing.lock().unwrap().insert(url.into());
    }

    /// Let `n` gated fetches through
    pub(crate) fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Resolved URLs in the order they were requested
    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Body served for `url`
    pub(crate) fn body_for(url: &str) -> Vec<u8> {
        format!("bytes of {url}").into_bytes()
    }
}

#[async_trait]
impl AssetFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        // Give an overlapping fetch a chance to show up
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().contains(url) {
            return Err(FetchError::new(url, FetchFailure::Status(404)));
        }
        Ok(Self::body_for(url))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Config pointing at a fresh temp dir, with disk space checks off
pub(crate) fn test_config(temp_dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.cdn.cdn_host = TEST_CDN_HOST.to_string();
    config.output.output_dir = temp_dir.path().join("exports");
    config.output.disk_space.enabled = false;
    config
}

/// Helper to create a test MediaExporter backed by `fetcher`.
/// Returns the exporter and the tempdir (which must be kept alive).
pub(crate) fn create_test_exporter(
    fetcher: Arc<ScriptedFetcher>,
) -> (MediaExporter, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let config = test_config(&temp_dir);
    let exporter = MediaExporter::with_fetcher(config, fetcher).unwrap();
    (exporter, temp_dir)
}

/// A CDN URL for `id` before attachment rewriting
pub(crate) fn cdn_url(id: &str) -> String {
    format!("https://{TEST_CDN_HOST}/demo/image/upload/v1/{id}.jpg")
}

/// The same URL after attachment rewriting
pub(crate) fn attachment_url(id: &str) -> String {
    format!("https://{TEST_CDN_HOST}/demo/image/upload/fl_attachment/v1/{id}.jpg")
}

/// Photos with ids `p1..=pN`
pub(crate) fn photos(n: usize) -> Vec<Media> {
    (1..=n)
        .map(|i| {
            let id = format!("p{i}");
            Media::photo(id.clone(), cdn_url(&id))
        })
        .collect()
}

/// Every event currently buffered on `rx`
pub(crate) fn drain_events(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Files in `dir`, sorted by name
pub(crate) fn files_in(dir: &std::path::Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Entry names of a ZIP archive on disk
pub(crate) fn zip_entry_names(path: &std::path::Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}
