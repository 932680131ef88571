//! Album export: the fetch loop, compression and delivery

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::MediaExporter;
use crate::archive::{ArchiveBuilder, ArchiveHandle};
use crate::error::{Error, Result};
use crate::job::ExportJob;
use crate::types::{Album, Event, ExportOutcome, ExportReport, FailedItem, JobState, SavedFile};
use crate::utils::{archive_file_name, entry_file_name, folder_name};

impl MediaExporter {
    /// Export every item of `album` into a single ZIP archive
    ///
    /// Items are fetched one at a time in album order. An item whose fetch
    /// fails is skipped and reported through [`Event::ItemFailed`]; the
    /// export still completes with the remaining items. The call fails only
    /// when the archive cannot be assembled or saved.
    ///
    /// Returns [`ExportOutcome::Busy`] without doing anything if another
    /// export or single download is running.
    pub async fn export_album(&self, album: &Album) -> Result<ExportOutcome<ExportReport>> {
        let Some(_guard) = self.flight.try_acquire() else {
            debug!(album = %album.name, "export already in progress, ignoring request");
            return Ok(ExportOutcome::Busy);
        };

        let folder = folder_name(&album.name, &self.config.archive.default_folder_name);
        let mut job = ExportJob::new(self.allocate_job_id(), folder.clone());
        job.total = album.items.len();

        self.advance(&mut job, JobState::Preparing)?;
        self.emit(Event::ExportStarted {
            job_id: job.id,
            folder: folder.clone(),
            total: job.total,
        });
        info!(job_id = %job.id, folder = %folder, total = job.total, "export started");

        let mut archive = ArchiveBuilder::begin(folder.clone())
            .compression(self.config.archive.compression)
            .allow_empty(album.items.is_empty());

        self.advance(&mut job, JobState::Fetching)?;
        self.fetch_items(&mut job, album, &mut archive).await;
        self.progress.complete_empty(&mut job);

        self.advance(&mut job, JobState::Compressing)?;
        match self.compress_and_deliver(archive, &folder).await {
            Ok(saved) => {
                self.advance(&mut job, JobState::Complete)?;
                self.emit(Event::ExportComplete {
                    job_id: job.id,
                    path: saved.path.clone(),
                    succeeded: job.succeeded,
                    failed: job.failed(),
                });
                info!(
                    job_id = %job.id,
                    path = %saved.path.display(),
                    succeeded = job.succeeded,
                    failed = job.failed(),
                    "export complete"
                );

                Ok(ExportOutcome::Finished(ExportReport {
                    job_id: job.id,
                    folder,
                    archive: saved,
                    total: job.total,
                    succeeded: job.succeeded,
                    failed_items: job.failed_items,
                    started_at: job.started_at,
                    finished_at: Utc::now(),
                }))
            }
            Err(e) => {
                self.advance(&mut job, JobState::Failed)?;
                self.emit(Event::ExportFailed {
                    job_id: job.id,
                    error: e.to_string(),
                });
                error!(job_id = %job.id, error = %e, "export failed");
                Err(e)
            }
        }
    }

    async fn fetch_items(&self, job: &mut ExportJob, album: &Album, archive: &mut ArchiveHandle) {
        for (position, media) in album.items.iter().enumerate() {
            let url = self.resolver.resolve(&media.url);

            match self.fetcher.fetch(&url).await {
                Ok(bytes) => {
                    archive.add_entry(entry_file_name(&job.folder, position + 1, media), bytes);
                    job.record_success();
                    self.progress.on_item_processed(job);
                }
                Err(e) => {
                    warn!(
                        job_id = %job.id,
                        media_id = %media.id,
                        url = %url,
                        error = %e,
                        "skipping item"
                    );
                    let reason = e.cause.to_string();
                    job.record_failure(FailedItem {
                        id: media.id.clone(),
                        url: url.clone(),
                        reason: reason.clone(),
                    });
                    self.emit(Event::ItemFailed {
                        job_id: job.id,
                        media_id: media.id.clone(),
                        url,
                        error: reason,
                    });
                    self.progress.on_item_processed(job);
                }
            }
        }
    }

    async fn compress_and_deliver(
        &self,
        archive: ArchiveHandle,
        folder: &str,
    ) -> Result<SavedFile> {
        let blob = tokio::task::spawn_blocking(move || archive.finalize())
            .await
            .map_err(|e| Error::Task(format!("compression task failed: {}", e)))??;

        self.deliver(&archive_file_name(folder), blob).await
    }

    /// Move `job` to `next` and announce it
    fn advance(&self, job: &mut ExportJob, next: JobState) -> Result<()> {
        job.transition(next)?;
        self.emit(Event::StateChanged {
            job_id: job.id,
            state: next,
        });
        Ok(())
    }
}
