//! Test configuration helpers for creating exporters against a mock CDN

use std::time::Duration;
use tempfile::TempDir;
use wedding_export::{Config, MediaExporter};

/// Host wiremock binds to; used as the CDN host so resolution applies
pub const MOCK_CDN_HOST: &str = "127.0.0.1";

/// Create a config that writes into `temp_dir/exports` and treats the
/// wiremock server as the CDN
pub fn create_test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.cdn.cdn_host = MOCK_CDN_HOST.to_string();
    config.fetch.request_timeout = Some(Duration::from_secs(5));
    config.output.output_dir = temp_dir.path().join("exports");
    // Free space on CI runners varies too much to assert on
    config.output.disk_space.enabled = false;
    config
}

/// Create an HTTP-backed exporter with an isolated output directory
///
/// Returns the exporter and the temp dir (which must be kept alive).
pub fn create_test_exporter() -> (MediaExporter, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&temp_dir);
    let exporter = MediaExporter::new(config).expect("Failed to create exporter");
    (exporter, temp_dir)
}
