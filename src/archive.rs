//! In-memory ZIP archive assembly
//!
//! Entries are collected as they arrive and compressed in a single pass when
//! the handle is finalized. Every entry lives under one top-level folder.

use std::io::{Cursor, Write};
use tracing::debug;

use crate::config::CompressionMode;
use crate::error::ArchiveError;

/// Entry point for building an archive
pub struct ArchiveBuilder;

impl ArchiveBuilder {
    /// Open an archive whose entries are placed under `folder`
    pub fn begin(folder: impl Into<String>) -> ArchiveHandle {
        ArchiveHandle {
            folder: folder.into(),
            entries: Vec::new(),
            compression: CompressionMode::default(),
            allow_empty: false,
        }
    }
}

/// An archive being assembled
///
/// Finalizing consumes the handle, so each archive is compressed exactly once.
#[must_use]
#[derive(Debug)]
pub struct ArchiveHandle {
    folder: String,
    entries: Vec<(String, Vec<u8>)>,
    compression: CompressionMode,
    allow_empty: bool,
}

impl ArchiveHandle {
    /// Set the compression used for file entries
    pub fn compression(mut self, mode: CompressionMode) -> Self {
        self.compression = mode;
        self
    }

    /// Allow finalizing an archive with no file entries
    ///
    /// Without this, finalizing an empty archive fails with
    /// [`ArchiveError::NoEntries`].
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Top-level folder name
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Number of file entries added so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no file entries have been added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue `bytes` to be stored as `{folder}/{file_name}`
    pub fn add_entry(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.push((file_name.into(), bytes));
    }

    /// Compress all queued entries into a single ZIP blob
    ///
    /// This is CPU-bound; async callers should run it on a blocking thread.
    pub fn finalize(self) -> Result<Vec<u8>, ArchiveError> {
        if self.entries.is_empty() && !self.allow_empty {
            return Err(ArchiveError::NoEntries {
                folder: self.folder,
            });
        }

        let payload: usize = self.entries.iter().map(|(_, bytes)| bytes.len()).sum();
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::with_capacity(payload)));
        let dir_options = zip::write::FileOptions::default();
        let file_options = zip::write::FileOptions::default()
            .compression_method(self.compression.into())
            .large_file(payload > u32::MAX as usize);

        writer.add_directory(format!("{}/", self.folder), dir_options)?;
        for (name, bytes) in &self.entries {
            writer.start_file(format!("{}/{}", self.folder, name), file_options)?;
            writer.write_all(bytes)?;
        }

        let blob = writer.finish()?.into_inner();
        debug!(
            folder = %self.folder,
            entries = self.entries.len(),
            payload_bytes = payload,
            archive_bytes = blob.len(),
            "archive finalized"
        );
        Ok(blob)
    }
}
