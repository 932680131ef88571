//! The export job entity and its state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{FailedItem, JobId, JobState};

/// Mutable bookkeeping for one album export
///
/// Owned by the exporter for the duration of the job. Counters only move
/// forward: `processed <= total` and `succeeded + failed_items.len() == processed`
/// whenever the job is observed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportJob {
    /// Job ID
    pub id: JobId,
    /// Folder name inside the archive
    pub folder: String,
    /// Current state
    pub state: JobState,
    /// Number of items in the album
    pub total: usize,
    /// Items whose fetch attempt has resolved
    pub processed: usize,
    /// Items added to the archive
    pub succeeded: usize,
    /// Items skipped because their fetch failed
    pub failed_items: Vec<FailedItem>,
    /// Fetch-phase completion, 0 to 100
    pub progress_percent: u8,
    /// When the job was created
    pub started_at: DateTime<Utc>,
}

impl ExportJob {
    /// Create an idle job
    pub fn new(id: JobId, folder: impl Into<String>) -> Self {
        Self {
            id,
            folder: folder.into(),
            state: JobState::Idle,
            total: 0,
            processed: 0,
            succeeded: 0,
            failed_items: Vec::new(),
            progress_percent: 0,
            started_at: Utc::now(),
        }
    }

    /// Move to `next`, rejecting transitions the state machine does not allow
    pub fn transition(&mut self, next: JobState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                job_id: self.id.get(),
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Record that the current item was added to the archive
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record that the current item was skipped
    pub fn record_failure(&mut self, item: FailedItem) {
        self.failed_items.push(item);
    }

    /// Number of skipped items
    pub fn failed(&self) -> usize {
        self.failed_items.len()
    }

    /// Items not yet processed
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.processed)
    }
}
