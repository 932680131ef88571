//! Naming rules and filesystem helpers for delivered files

use crate::config::FileCollisionAction;
use crate::error::{Error, Result};
use crate::types::Media;
use std::path::{Path, PathBuf};

/// Maximum number of rename attempts when resolving file collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Prefix used for single-asset downloads
const SINGLE_FILE_PREFIX: &str = "wedding";

/// Suffix appended to album archive names
const ARCHIVE_SUFFIX: &str = "_Collection.zip";

/// Folder name for an album, falling back to `default` when the name is blank
///
/// The name is sanitized like a file name so archive entries cannot point
/// outside their folder.
pub fn folder_name(album_name: &str, default: &str) -> String {
    let trimmed = album_name.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        sanitize_file_name(trimmed)
    }
}

/// Name of an archive entry: `{folder-lowercased}-{index}-{id}.{ext}`
///
/// `index` is the 1-based position of the item in the album, counted over all
/// items (failed ones included), so names stay stable when items are skipped.
/// The result is sanitized, so an id holding path separators still yields a
/// single entry directly under the album folder.
///
/// # Examples
///
/// ```
/// use wedding_export::types::Media;
/// use wedding_export::utils::entry_file_name;
///
/// let media = Media::photo("a1", "https://cdn.example.com/upload/a1.jpg");
/// assert_eq!(entry_file_name("Sangeet Night", 1, &media), "sangeet night-1-a1.jpg");
/// ```
pub fn entry_file_name(folder: &str, index: usize, media: &Media) -> String {
    sanitize_file_name(&format!(
        "{}-{}-{}.{}",
        folder.to_lowercase(),
        index,
        media.id,
        media.kind.extension()
    ))
}

/// Name of the delivered album archive: spaces become underscores
///
/// # Examples
///
/// ```
/// use wedding_export::utils::archive_file_name;
///
/// assert_eq!(archive_file_name("Sangeet Night"), "Sangeet_Night_Collection.zip");
/// ```
pub fn archive_file_name(folder: &str) -> String {
    format!("{}{}", folder.replace(' ', "_"), ARCHIVE_SUFFIX)
}

/// Name of a single delivered asset: `wedding-{id}.{ext}`
pub fn single_file_name(media: &Media) -> String {
    format!(
        "{}-{}.{}",
        SINGLE_FILE_PREFIX,
        media.id,
        media.kind.extension()
    )
}

/// Make a name safe to use as one path component
///
/// Path separators and control characters become `_`, and names made only of
/// dots are prefixed so they cannot refer to the current or parent directory.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        format!("_{}", cleaned)
    } else {
        cleaned
    }
}

/// Get a unique path for a file, handling collisions according to `action`
///
/// For Rename, `name.zip` becomes `name (1).zip`, then `name (2).zip`, and so on.
/// For Skip, an existing file is an error. For Overwrite, the path is returned unchanged.
///
/// # Examples
///
/// ```
/// use wedding_export::utils::get_unique_path;
/// use wedding_export::config::FileCollisionAction;
/// use std::path::Path;
///
/// let path = Path::new("/tmp/Haldi_Collection.zip");
/// let unique = get_unique_path(path, FileCollisionAction::Rename).unwrap();
/// // If /tmp/Haldi_Collection.zip exists, returns /tmp/Haldi_Collection (1).zip
/// ```
pub fn get_unique_path(path: &Path, action: FileCollisionAction) -> Result<PathBuf> {
    match action {
        FileCollisionAction::Overwrite => Ok(path.to_path_buf()),
        FileCollisionAction::Skip => {
            if path.exists() {
                return Err(Error::FileCollision {
                    path: path.to_path_buf(),
                    reason: "File already exists and collision action is Skip".to_string(),
                });
            }
            Ok(path.to_path_buf())
        }
        FileCollisionAction::Rename => {
            if !path.exists() {
                return Ok(path.to_path_buf());
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
                Error::InvalidPath {
                    path: path.to_path_buf(),
                    reason: "Cannot extract file stem".to_string(),
                }
            })?;
            let extension = path.extension().and_then(|e| e.to_str());
            let parent = path.parent().ok_or_else(|| Error::InvalidPath {
                path: path.to_path_buf(),
                reason: "Cannot extract parent directory".to_string(),
            })?;

            for i in 1..=MAX_RENAME_ATTEMPTS {
                let new_name = match extension {
                    Some(ext) => format!("{} ({}).{}", stem, i, ext),
                    None => format!("{} ({})", stem, i),
                };
                let new_path = parent.join(new_name);
                if !new_path.exists() {
                    return Ok(new_path);
                }
            }

            Err(Error::FileCollision {
                path: path.to_path_buf(),
                reason: format!(
                    "Could not find unique filename after {} attempts",
                    MAX_RENAME_ATTEMPTS
                ),
            })
        }
    }
}

/// Get available disk space for a given path, in bytes
///
/// Uses statvfs on Unix and GetDiskFreeSpaceExW on Windows.
pub fn get_available_space(path: &Path) -> std::io::Result<u64> {
    available_space_impl(path)
}

#[cfg(unix)]
fn available_space_impl(path: &Path) -> std::io::Result<u64> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    // SAFETY: c_path is a valid NUL-terminated string, stat is zero-initialized
    // and only read after statvfs reports success.
    unsafe {
        let mut stat: libc::statvfs = std::mem::zeroed();
        if libc::statvfs(c_path.as_ptr(), &mut stat) != 0 {
            return Err(std::io::Error::last_os_error());
        }
        // f_bavail counts blocks available to unprivileged users
        #[allow(clippy::unnecessary_cast)]
        Ok((stat.f_bavail as u64).saturating_mul(stat.f_frsize as u64))
    }
}

#[cfg(windows)]
fn available_space_impl(path: &Path) -> std::io::Result<u64> {
    use std::os::windows::ffi::OsStrExt;
    use winapi::um::fileapi::GetDiskFreeSpaceExW;

    let wide_path: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: wide_path is NUL-terminated and every out-pointer refers to a
    // live, aligned u64 that is only read after a successful call.
    unsafe {
        let mut free_bytes_available: u64 = 0;
        let mut total_bytes: u64 = 0;
        let mut total_free_bytes: u64 = 0;

        if GetDiskFreeSpaceExW(
            wide_path.as_ptr(),
            &mut free_bytes_available as *mut u64 as *mut _,
            &mut total_bytes as *mut u64 as *mut _,
            &mut total_free_bytes as *mut u64 as *mut _,
        ) == 0
        {
            return Err(std::io::Error::last_os_error());
        }

        Ok(free_bytes_available)
    }
}

#[cfg(not(any(unix, windows)))]
fn available_space_impl(_path: &Path) -> std::io::Result<u64> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "Disk space checking is not supported on this platform",
    ))
}
