//! Custom test assertions for integration tests

use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tokio::sync::broadcast;
use wedding_export::Event;

/// Entry names of a ZIP archive on disk, in archive order
pub fn zip_entry_names(archive_path: &Path) -> Vec<String> {
    let file = std::fs::File::open(archive_path).expect("Failed to open archive");
    let mut archive = zip::ZipArchive::new(file).expect("Not a valid ZIP archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("Bad entry").name().to_string())
        .collect()
}

/// Contents of one entry of a ZIP archive on disk
pub fn read_zip_entry(archive_path: &Path, name: &str) -> Vec<u8> {
    let file = std::fs::File::open(archive_path).expect("Failed to open archive");
    let mut archive = zip::ZipArchive::new(file).expect("Not a valid ZIP archive");
    let mut entry = archive
        .by_name(name)
        .unwrap_or_else(|e| panic!("Entry {name} missing: {e}"));
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).expect("Failed to read entry");
    bytes
}

/// Assert that no staging files were left in `dir`
pub fn assert_no_staging_files(dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let leftovers: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".part"))
        .collect();
    assert!(leftovers.is_empty(), "Staging files left behind: {leftovers:?}");
}

/// Collect events until the first terminal export event, or until `timeout`
pub async fn collect_until_terminal(
    rx: &mut broadcast::Receiver<Event>,
    timeout: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    let _ = tokio::time::timeout(timeout, async {
        while let Ok(event) = rx.recv().await {
            let terminal = matches!(
                event,
                Event::ExportComplete { .. } | Event::ExportFailed { .. }
            );
            events.push(event);
            if terminal {
                break;
            }
        }
    })
    .await;
    events
}

/// Percentages carried by `Progress` events, in order
pub fn progress_percents(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect()
}

/// Assert that progress never goes backwards and ends at 100
pub fn assert_progress_monotonic(events: &[Event]) {
    let percents = progress_percents(events);
    assert!(!percents.is_empty(), "No progress events were emitted");
    for pair in percents.windows(2) {
        assert!(pair[0] <= pair[1], "Progress went backwards: {percents:?}");
    }
    assert_eq!(percents.last(), Some(&100), "Progress did not reach 100");
}
