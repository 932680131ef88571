//! Single-asset download

use tracing::{debug, error, info};

use super::MediaExporter;
use crate::error::{Error, Result};
use crate::types::{Event, ExportOutcome, Media, SavedFile};
use crate::utils::single_file_name;

impl MediaExporter {
    /// Fetch one asset and save it as `wedding-{id}.{ext}`
    ///
    /// Shares the busy flag with [`export_album`](Self::export_album):
    /// returns [`ExportOutcome::Busy`] if anything else is running.
    pub async fn download_single(&self, media: &Media) -> Result<ExportOutcome<SavedFile>> {
        let Some(_guard) = self.flight.try_acquire() else {
            debug!(media_id = %media.id, "export already in progress, ignoring download");
            return Ok(ExportOutcome::Busy);
        };

        match self.fetch_and_save(media).await {
            Ok(saved) => {
                info!(
                    media_id = %media.id,
                    path = %saved.path.display(),
                    size_bytes = saved.size_bytes,
                    "single download complete"
                );
                self.emit(Event::SingleDownloadComplete {
                    media_id: media.id.clone(),
                    path: saved.path.clone(),
                });
                Ok(ExportOutcome::Finished(saved))
            }
            Err(e) => {
                error!(media_id = %media.id, error = %e, "single download failed");
                self.emit(Event::SingleDownloadFailed {
                    media_id: media.id.clone(),
                    error: e.to_string(),
                });
                Err(Error::SingleDownload {
                    media_id: media.id.clone(),
                    source: Box::new(e),
                })
            }
        }
    }

    async fn fetch_and_save(&self, media: &Media) -> Result<SavedFile> {
        let url = self.resolver.resolve(&media.url);
        let bytes = self.fetcher.fetch(&url).await?;
        self.deliver(&single_file_name(media), bytes).await
    }
}
