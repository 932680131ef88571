//! Configuration types for wedding-export

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// CDN settings used by the URL resolver
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CdnConfig {
    /// Host whose URLs get rewritten to force an attachment response
    /// (default: "res.cloudinary.com")
    #[serde(default = "default_cdn_host")]
    pub cdn_host: String,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            cdn_host: default_cdn_host(),
        }
    }
}

/// HTTP client settings for asset retrieval
///
/// No timeouts are applied unless configured: a slow asset keeps the job
/// waiting rather than being dropped from the archive.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout (default: none)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// Connection establishment timeout (default: none)
    #[serde(default, with = "optional_duration_serde")]
    pub connect_timeout: Option<Duration>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            connect_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Compression applied to archive entries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMode {
    /// Deflate every entry (default)
    #[default]
    Deflated,
    /// Store entries as-is; JPEG and MP4 barely shrink, so this trades size for speed
    Stored,
}

impl From<CompressionMode> for zip::CompressionMethod {
    fn from(mode: CompressionMode) -> Self {
        match mode {
            CompressionMode::Deflated => zip::CompressionMethod::Deflated,
            CompressionMode::Stored => zip::CompressionMethod::Stored,
        }
    }
}

/// Archive layout settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Folder name used when an album has no name (default: "Wedding")
    #[serde(default = "default_folder_name")]
    pub default_folder_name: String,

    /// Entry compression (default: deflated)
    #[serde(default)]
    pub compression: CompressionMode,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            default_folder_name: default_folder_name(),
            compression: CompressionMode::default(),
        }
    }
}

/// File collision handling strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Append (1), (2), etc. to filename (default)
    #[default]
    Rename,
    /// Overwrite existing file
    Overwrite,
    /// Refuse to save, keep existing
    Skip,
}

/// Disk space checking configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiskSpaceConfig {
    /// Enable disk space checking (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum free space to leave behind after saving (default: 100 MB)
    #[serde(default = "default_min_free_space")]
    pub min_free_space: u64,

    /// Multiplier applied to the file size, covering the staging copy (default: 1.0)
    #[serde(default = "default_size_multiplier")]
    pub size_multiplier: f64,
}

impl Default for DiskSpaceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_free_space: default_min_free_space(),
            size_multiplier: default_size_multiplier(),
        }
    }
}

/// Local delivery settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory where archives and single assets are written (default: "./downloads")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// What to do when the target file already exists
    #[serde(default)]
    pub file_collision: FileCollisionAction,

    /// Free space requirements checked before writing
    #[serde(default)]
    pub disk_space: DiskSpaceConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_collision: FileCollisionAction::default(),
            disk_space: DiskSpaceConfig::default(),
        }
    }
}

/// Main configuration for MediaExporter
///
/// Fields are organized into logical sub-configs:
/// - [`cdn`](CdnConfig) - which host gets forced-attachment URLs
/// - [`fetch`](FetchConfig) - HTTP client behaviour
/// - [`archive`](ArchiveConfig) - folder naming and compression
/// - [`output`](OutputConfig) - where and how files are saved
///
/// Sub-configs are flattened, so the serialized form is a single flat object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// CDN rewrite settings
    #[serde(flatten)]
    pub cdn: CdnConfig,

    /// HTTP client settings
    #[serde(flatten)]
    pub fetch: FetchConfig,

    /// Archive layout settings
    #[serde(flatten)]
    pub archive: ArchiveConfig,

    /// Local delivery settings
    #[serde(flatten)]
    pub output: OutputConfig,

    /// Capacity of the event broadcast channel (default: 1000)
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cdn: CdnConfig::default(),
            fetch: FetchConfig::default(),
            archive: ArchiveConfig::default(),
            output: OutputConfig::default(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl Config {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_json_str(&contents)
    }

    /// Check settings that serde cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.cdn.cdn_host.trim().is_empty() {
            return Err(Error::Config {
                message: "CDN host must not be empty".to_string(),
                key: Some("cdn_host".to_string()),
            });
        }
        if self.archive.default_folder_name.trim().is_empty() {
            return Err(Error::Config {
                message: "default folder name must not be empty".to_string(),
                key: Some("default_folder_name".to_string()),
            });
        }
        if self.event_buffer == 0 {
            return Err(Error::Config {
                message: "event buffer must hold at least one event".to_string(),
                key: Some("event_buffer".to_string()),
            });
        }
        let multiplier = self.output.disk_space.size_multiplier;
        if multiplier.is_nan() || multiplier <= 0.0 {
            return Err(Error::Config {
                message: "size multiplier must be positive".to_string(),
                key: Some("size_multiplier".to_string()),
            });
        }
        Ok(())
    }

    /// Output directory
    pub fn output_dir(&self) -> &PathBuf {
        &self.output.output_dir
    }
}

fn default_cdn_host() -> String {
    "res.cloudinary.com".to_string()
}

fn default_user_agent() -> String {
    concat!("wedding-export/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_folder_name() -> String {
    "Wedding".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_true() -> bool {
    true
}

fn default_min_free_space() -> u64 {
    100 * 1024 * 1024
}

fn default_size_multiplier() -> f64 {
    1.0
}

fn default_event_buffer() -> usize {
    1000
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
