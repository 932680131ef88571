//! Local delivery of archives and single assets.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use super::MediaExporter;
use crate::config::FileCollisionAction;
use crate::error::{Error, Result};
use crate::types::SavedFile;
use crate::utils::{get_available_space, get_unique_path, sanitize_file_name};

const STAGING_PREFIX: &str = ".wedding-export-";
const STAGING_SUFFIX: &str = ".part";

/// Bytes staged on disk, waiting to be moved to their final name
///
/// The staging file lives next to its destination so the final move is a
/// rename. Dropping the handle without persisting it deletes the staging
/// file, so every exit path releases it.
#[derive(Debug)]
pub struct TransientFile {
    inner: NamedTempFile,
}

impl TransientFile {
    /// Write `bytes` to a fresh staging file inside `dir`
    pub fn stage(dir: &Path, bytes: &[u8]) -> std::io::Result<Self> {
        let mut inner = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(dir)?;
        inner.write_all(bytes)?;
        inner.as_file().sync_all()?;
        trace!(path = %inner.path().display(), bytes = bytes.len(), "staged transient file");
        Ok(Self { inner })
    }

    /// Current location of the staging file
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Move the staged bytes to `dest`
    ///
    /// With `overwrite` unset, an existing file at `dest` is left alone and
    /// the call fails with [`Error::FileCollision`]; the staging file is
    /// removed either way.
    pub fn persist(self, dest: &Path, overwrite: bool) -> Result<PathBuf> {
        let result = if overwrite {
            self.inner.persist(dest)
        } else {
            self.inner.persist_noclobber(dest)
        };

        match result {
            Ok(_file) => Ok(dest.to_path_buf()),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(Error::FileCollision {
                    path: dest.to_path_buf(),
                    reason: "file appeared while saving".to_string(),
                })
            }
            Err(e) => Err(Error::Io(std::io::Error::new(
                e.error.kind(),
                format!("Failed to move file to '{}': {}", dest.display(), e.error),
            ))),
        }
    }
}

impl MediaExporter {
    /// Save `bytes` as `file_name` in the output directory
    ///
    /// The bytes are staged in a transient file first and moved into place
    /// once fully written, so a partially written file never carries the
    /// final name.
    pub(crate) async fn deliver(&self, file_name: &str, bytes: Vec<u8>) -> Result<SavedFile> {
        let output_dir = self.config.output.output_dir.clone();
        tokio::fs::create_dir_all(&output_dir).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create output directory '{}': {}",
                    output_dir.display(),
                    e
                ),
            ))
        })?;

        let size_bytes = bytes.len() as u64;
        self.check_disk_space(size_bytes)?;

        let target = output_dir.join(sanitize_file_name(file_name));
        let collision = self.config.output.file_collision;

        let path = tokio::task::spawn_blocking(move || -> Result<PathBuf> {
            let staged = TransientFile::stage(&output_dir, &bytes)?;
            let dest = get_unique_path(&target, collision)?;
            staged.persist(&dest, collision == FileCollisionAction::Overwrite)
        })
        .await
        .map_err(|e| Error::Task(format!("save task failed: {}", e)))??;

        debug!(path = %path.display(), size_bytes, "file delivered");
        Ok(SavedFile { path, size_bytes })
    }

    /// Check there is room for `size_bytes` plus the configured headroom
    pub(crate) fn check_disk_space(&self, size_bytes: u64) -> Result<()> {
        let disk = &self.config.output.disk_space;
        if !disk.enabled {
            return Ok(());
        }

        let required =
            ((size_bytes as f64 * disk.size_multiplier) as u64).saturating_add(disk.min_free_space);

        let check_path = &self.config.output.output_dir;
        let available = get_available_space(check_path).map_err(|e| {
            Error::DiskSpaceCheckFailed(format!(
                "Failed to check disk space for '{}': {}",
                check_path.display(),
                e
            ))
        })?;

        if available < required {
            return Err(Error::InsufficientSpace {
                required,
                available,
            });
        }

        Ok(())
    }
}
