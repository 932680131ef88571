//! Error types for wedding-export
//!
//! The export engine distinguishes between failures that only affect a single
//! media item and failures that end a whole job:
//! - [`FetchError`] - one item could not be retrieved; recorded and skipped
//! - [`ArchiveError`] - the archive could not be assembled; the job fails
//! - [`Error::SingleDownload`] - a single-asset download failed
//!
//! Everything else (configuration, local I/O, disk space) is carried by
//! [`Error`].

use std::path::PathBuf;
use thiserror::Error;

use crate::types::JobState;

/// Result type alias for wedding-export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wedding-export
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "cdn_host")
        key: Option<String>,
    },

    /// A media item could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The archive could not be finalized; nothing was delivered
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// A single-asset download failed
    #[error("download of media {media_id} failed: {source}")]
    SingleDownload {
        /// The media item that was requested
        media_id: String,
        /// What went wrong
        #[source]
        source: Box<Error>,
    },

    /// Export job was asked to move between states that are not connected
    #[error("export job {job_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The job being driven
        job_id: u64,
        /// The state the job was in
        from: JobState,
        /// The state that was requested
        to: JobState,
    },

    /// File collision at destination
    #[error("file collision at {path}: {reason}")]
    FileCollision {
        /// The path where the collision occurred
        path: PathBuf,
        /// The reason for the collision (e.g., "file already exists")
        reason: String,
    },

    /// Invalid output path
    #[error("invalid path {path}: {reason}")]
    InvalidPath {
        /// The path that could not be used
        path: PathBuf,
        /// Why it could not be used
        reason: String,
    },

    /// Insufficient disk space
    #[error("insufficient disk space: need {required} bytes, have {available} bytes")]
    InsufficientSpace {
        /// Number of bytes required for the operation
        required: u64,
        /// Number of bytes currently available on disk
        available: u64,
    },

    /// Failed to check disk space
    #[error("failed to check disk space: {0}")]
    DiskSpaceCheckFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be constructed or used
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Blocking task panicked or was aborted
    #[error("background task failed: {0}")]
    Task(String),
}

impl Error {
    /// Machine-readable error code, suitable for driving a failure notification
    pub fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Fetch(_) => "fetch_failed",
            Error::Archive(e) => match e {
                ArchiveError::NoEntries { .. } => "archive_empty",
                ArchiveError::Zip(_) => "archive_write_failed",
                ArchiveError::Io(_) => "archive_write_failed",
            },
            Error::SingleDownload { .. } => "single_download_failed",
            Error::InvalidTransition { .. } => "invalid_transition",
            Error::FileCollision { .. } => "file_collision",
            Error::InvalidPath { .. } => "invalid_path",
            Error::InsufficientSpace { .. } => "insufficient_space",
            Error::DiskSpaceCheckFailed(_) => "disk_space_check_failed",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::Task(_) => "task_failed",
        }
    }
}

/// Failure to retrieve one media item
///
/// Carries the offending (already resolved) URL so the caller can record it
/// against the job without keeping extra context around.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to fetch {url}: {cause}")]
pub struct FetchError {
    /// The URL that was requested
    pub url: String,
    /// Why the request failed
    pub cause: FetchFailure,
}

impl FetchError {
    /// Create a new fetch error for `url`
    pub fn new(url: impl Into<String>, cause: FetchFailure) -> Self {
        Self {
            url: url.into(),
            cause,
        }
    }

    /// Build a fetch error from a reqwest transport error
    pub(crate) fn from_reqwest(url: &str, e: &reqwest::Error) -> Self {
        let cause = if e.is_timeout() {
            FetchFailure::Timeout
        } else if e.is_connect() {
            FetchFailure::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            FetchFailure::Status(status.as_u16())
        } else if e.is_body() || e.is_decode() {
            FetchFailure::Body(e.to_string())
        } else {
            FetchFailure::Request(e.to_string())
        };
        Self::new(url, cause)
    }
}

/// Reason a fetch failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    /// Request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Could not connect to the host
    #[error("connection failed: {0}")]
    Connect(String),

    /// Host answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other request error (invalid URL, redirect loop, ...)
    #[error("request failed: {0}")]
    Request(String),
}

/// Archive assembly errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Every item of a non-empty album failed, so there is nothing to deliver
    #[error("no entries could be added to archive folder {folder}")]
    NoEntries {
        /// The folder the entries would have been placed in
        folder: String,
    },

    /// ZIP writer rejected an entry or could not finish
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writing entry data failed
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}
