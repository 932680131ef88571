//! # wedding-export
//!
//! Bulk export of CDN-hosted wedding media into downloadable archives.
//!
//! ## Design Philosophy
//!
//! wedding-export is designed to be:
//! - **Forgiving** - One broken asset never sinks an album; it is skipped and reported
//! - **Sequential** - Items are fetched one at a time, in album order
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use wedding_export::{Album, Config, Media, MediaExporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.output.output_dir = "./exports".into();
//!
//!     let exporter = MediaExporter::new(config)?;
//!
//!     // Subscribe to events
//!     let mut events = exporter.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let album = Album::new(
//!         "Sangeet Night",
//!         vec![Media::photo(
//!             "a1",
//!             "https://res.cloudinary.com/demo/image/upload/v1/a1.jpg",
//!         )],
//!     );
//!
//!     if let Some(report) = exporter.export_album(&album).await?.finished() {
//!         println!("saved {}", report.archive.path.display());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// In-memory ZIP assembly
pub mod archive;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Export orchestration (decomposed into focused submodules)
pub mod exporter;
/// Asset retrieval
pub mod fetcher;
/// Export job bookkeeping and state machine
pub mod job;
/// Fetch-phase progress accounting
pub mod progress;
/// Forced-attachment URL rewriting
pub mod resolver;
/// Core types and events
pub mod types;
/// Naming rules and filesystem helpers
pub mod utils;

// Re-export commonly used types
pub use archive::{ArchiveBuilder, ArchiveHandle};
pub use config::{CompressionMode, Config, FileCollisionAction};
pub use error::{ArchiveError, Error, FetchError, FetchFailure, Result};
pub use exporter::{MediaExporter, TransientFile};
pub use fetcher::{AssetFetcher, HttpFetcher};
pub use job::ExportJob;
pub use progress::ProgressTracker;
pub use resolver::UrlResolver;
pub use types::{
    Album, Event, ExportOutcome, ExportReport, FailedItem, JobId, JobState, Media, MediaKind,
    SavedFile,
};
