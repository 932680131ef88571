//! Fetch-phase progress accounting

use tokio::sync::broadcast;
use tracing::trace;

use crate::job::ExportJob;
use crate::types::Event;

/// Percentage of `processed` out of `total`, rounded half up
///
/// An empty job counts as fully done.
pub fn percent_complete(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let processed = processed.min(total) as u128;
    let total = total as u128;
    ((processed * 100 + total / 2) / total) as u8
}

/// Advances a job's progress after each item and publishes it
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    event_tx: broadcast::Sender<Event>,
}

impl ProgressTracker {
    /// Create a tracker that publishes on `event_tx`
    pub fn new(event_tx: broadcast::Sender<Event>) -> Self {
        Self { event_tx }
    }

    /// Count one more processed item and emit [`Event::Progress`]
    ///
    /// Call exactly once per item, after its success or failure has been
    /// recorded on the job.
    pub fn on_item_processed(&self, job: &mut ExportJob) {
        job.processed = (job.processed + 1).min(job.total);
        let percent = percent_complete(job.processed, job.total);
        job.progress_percent = job.progress_percent.max(percent);

        trace!(
            job_id = %job.id,
            processed = job.processed,
            total = job.total,
            percent = job.progress_percent,
            "item processed"
        );
        self.publish(job);
    }

    /// Mark an empty job as done without processing any item
    ///
    /// Publishes a single 100% event so observers see the job finish its
    /// fetch phase. Jobs with items are left untouched.
    pub fn complete_empty(&self, job: &mut ExportJob) {
        if job.total != 0 {
            return;
        }
        job.progress_percent = 100;
        self.publish(job);
    }

    fn publish(&self, job: &ExportJob) {
        // No subscribers is fine
        self.event_tx
            .send(Event::Progress {
                job_id: job.id,
                percent: job.progress_percent,
                processed: job.processed,
                succeeded: job.succeeded,
                failed: job.failed(),
                total: job.total,
            })
            .ok();
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FailedItem, JobId};

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 67);
        assert_eq!(percent_complete(1, 8), 13);
        assert_eq!(percent_complete(1, 200), 1);
        assert_eq!(percent_complete(0, 5), 0);
        assert_eq!(percent_complete(5, 5), 100);
    }

    #[test]
    fn empty_job_is_complete() {
        assert_eq!(percent_complete(0, 0), 100);
    }

    #[test]
    fn percent_is_capped_at_100() {
        assert_eq!(percent_complete(9, 5), 100);
    }

    #[test]
    fn percent_is_monotonic_for_every_prefix() {
        for total in 1..=150 {
            let mut last = 0;
            for processed in 0..=total {
                let p = percent_complete(processed, total);
                assert!(p >= last, "{processed}/{total} went from {last} to {p}");
                last = p;
            }
            assert_eq!(last, 100);
        }
    }

    #[test]
    fn publishes_one_event_per_item_with_consistent_counts() {
        let (tx, mut rx) = broadcast::channel(16);
        let tracker = ProgressTracker::new(tx);
        let mut job = ExportJob::new(JobId(9), "Haldi");
        job.total = 3;

        job.record_success();
        tracker.on_item_processed(&mut job);
        job.record_failure(FailedItem {
            id: "b".into(),
            url: "https://x/b.jpg".into(),
            reason: "boom".into(),
        });
        tracker.on_item_processed(&mut job);
        job.record_success();
        tracker.on_item_processed(&mut job);

        let mut seen = Vec::new();
        while let Ok(Event::Progress {
            percent,
            processed,
            succeeded,
            failed,
            total,
            ..
        }) = rx.try_recv()
        {
            assert_eq!(succeeded + failed, processed);
            assert!(processed <= total);
            seen.push(percent);
        }

        assert_eq!(seen, vec![33, 67, 100]);
        assert_eq!(job.processed, 3);
        assert_eq!(job.progress_percent, 100);
    }

    #[test]
    fn processed_never_exceeds_total() {
        let (tx, _rx) = broadcast::channel(4);
        let tracker = ProgressTracker::new(tx);
        let mut job = ExportJob::new(JobId(1), "Haldi");
        job.total = 1;

        tracker.on_item_processed(&mut job);
        tracker.on_item_processed(&mut job);

        assert_eq!(job.processed, 1);
        assert_eq!(job.progress_percent, 100);
    }

    #[test]
    fn works_without_subscribers() {
        let (tx, rx) = broadcast::channel(4);
        drop(rx);
        let tracker = ProgressTracker::new(tx);
        let mut job = ExportJob::new(JobId(1), "Haldi");
        job.total = 2;

        tracker.on_item_processed(&mut job);

        assert_eq!(job.progress_percent, 50);
    }

    #[test]
    fn complete_empty_sets_100_only_for_empty_jobs() {
        let (tx, mut rx) = broadcast::channel(4);
        let tracker = ProgressTracker::new(tx);

        let mut empty = ExportJob::new(JobId(1), "Haldi");
        tracker.complete_empty(&mut empty);
        assert_eq!(empty.progress_percent, 100);
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::Progress { percent: 100, processed: 0, total: 0, .. })
        ));

        let mut pending = ExportJob::new(JobId(2), "Haldi");
        pending.total = 4;
        tracker.complete_empty(&mut pending);
        assert_eq!(pending.progress_percent, 0);
        assert!(rx.try_recv().is_err());
    }
}
