//! Core types for wedding-export

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of media asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image, delivered as JPEG
    Photo,
    /// Video clip, delivered as MP4
    Video,
}

impl MediaKind {
    /// File extension used when the asset is written out
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Photo => "jpg",
            MediaKind::Video => "mp4",
        }
    }
}

/// A remotely hosted media item, as supplied by the content store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Identifier assigned by the content store
    pub id: String,
    /// Access URL on the hosting CDN
    pub url: String,
    /// Photo or video
    pub kind: MediaKind,
}

impl Media {
    /// Create a photo record
    pub fn photo(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            kind: MediaKind::Photo,
        }
    }

    /// Create a video record
    pub fn video(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            kind: MediaKind::Video,
        }
    }
}

/// A named, ordered collection of media exported together
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Album name; drives the archive folder and file names
    pub name: String,
    /// Items in export order
    #[serde(default)]
    pub items: Vec<Media>,
}

impl Album {
    /// Create an album from a name and its items
    pub fn new(name: impl Into<String>, items: Vec<Media>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// Unique identifier for an export job within one process
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    /// Get the inner value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Export job state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Not started
    #[default]
    Idle,
    /// Job accepted, archive being opened
    Preparing,
    /// Items being retrieved one by one
    Fetching,
    /// All items processed, archive being compressed and saved
    Compressing,
    /// Archive delivered
    Complete,
    /// Archive could not be assembled or delivered
    Failed,
}

impl JobState {
    /// Whether the job can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Complete | JobState::Failed)
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Idle, JobState::Preparing)
                | (JobState::Preparing, JobState::Fetching)
                | (JobState::Fetching, JobState::Compressing)
                | (JobState::Compressing, JobState::Complete)
                | (JobState::Compressing, JobState::Failed)
        )
    }

    /// Lowercase name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Idle => "idle",
            JobState::Preparing => "preparing",
            JobState::Fetching => "fetching",
            JobState::Compressing => "compressing",
            JobState::Complete => "complete",
            JobState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media item that could not be fetched during an export
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    /// Media ID
    pub id: String,
    /// The resolved URL that was requested
    pub url: String,
    /// Human-readable failure reason
    pub reason: String,
}

/// A file written to the output directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFile {
    /// Final location on disk
    pub path: PathBuf,
    /// Number of bytes written
    pub size_bytes: u64,
}

/// Summary of a completed album export
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportReport {
    /// Job ID
    pub job_id: JobId,
    /// Folder name used inside the archive
    pub folder: String,
    /// The delivered archive
    pub archive: SavedFile,
    /// Number of items in the album
    pub total: usize,
    /// Number of items added to the archive
    pub succeeded: usize,
    /// Items that were skipped because their fetch failed
    pub failed_items: Vec<FailedItem>,
    /// When the job was accepted
    pub started_at: DateTime<Utc>,
    /// When the archive was delivered
    pub finished_at: DateTime<Utc>,
}

impl ExportReport {
    /// Whether any item was skipped
    pub fn is_partial(&self) -> bool {
        !self.failed_items.is_empty()
    }
}

/// Result of asking the exporter to start work
#[must_use]
#[derive(Clone, Debug)]
pub enum ExportOutcome<T> {
    /// The work ran to completion
    Finished(T),
    /// Another export was already in flight; the request was ignored
    Busy,
}

impl<T> ExportOutcome<T> {
    /// The finished value, if the request was not ignored
    pub fn finished(self) -> Option<T> {
        match self {
            ExportOutcome::Finished(value) => Some(value),
            ExportOutcome::Busy => None,
        }
    }

    /// Whether the request was ignored because the exporter was busy
    pub fn is_busy(&self) -> bool {
        matches!(self, ExportOutcome::Busy)
    }
}

/// Event emitted during export
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Album export accepted
    ExportStarted {
        /// Job ID
        job_id: JobId,
        /// Archive folder name
        folder: String,
        /// Number of items to process
        total: usize,
    },

    /// Job moved to a new state
    StateChanged {
        /// Job ID
        job_id: JobId,
        /// New state
        state: JobState,
    },

    /// One item finished its fetch attempt
    Progress {
        /// Job ID
        job_id: JobId,
        /// Completion percentage of the fetch phase (0 to 100)
        percent: u8,
        /// Items processed so far
        processed: usize,
        /// Items added to the archive so far
        succeeded: usize,
        /// Items skipped so far
        failed: usize,
        /// Items in the album
        total: usize,
    },

    /// An item could not be fetched and was skipped
    ItemFailed {
        /// Job ID
        job_id: JobId,
        /// Media ID
        media_id: String,
        /// The resolved URL
        url: String,
        /// Error message
        error: String,
    },

    /// Archive delivered
    ExportComplete {
        /// Job ID
        job_id: JobId,
        /// Where the archive was written
        path: PathBuf,
        /// Entries in the archive
        succeeded: usize,
        /// Items skipped
        failed: usize,
    },

    /// Archive could not be assembled or delivered
    ExportFailed {
        /// Job ID
        job_id: JobId,
        /// Error message
        error: String,
    },

    /// Single asset delivered
    SingleDownloadComplete {
        /// Media ID
        media_id: String,
        /// Where the asset was written
        path: PathBuf,
    },

    /// Single asset could not be delivered
    SingleDownloadFailed {
        /// Media ID
        media_id: String,
        /// Error message
        error: String,
    },
}
