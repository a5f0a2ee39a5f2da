//! Snapshot-related API endpoints (restic backup service)

use crate::EngineClient;
use crate::error::Result;
use flowdeck_core::dto::snapshot::{RestoreRequest, SnapshotItem, SnapshotMeta};
use tracing::debug;

impl EngineClient {
    // =============================================================================
    // Snapshot Browsing
    // =============================================================================

    /// List metadata for every stored snapshot
    ///
    /// Polled periodically by the snapshot dashboard.
    pub async fn get_all_snapshots(&self) -> Result<Vec<SnapshotMeta>> {
        let url = format!("{}/restic/get-all-snapshots", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }

    /// List the entries of one snapshot, filtered server-side
    ///
    /// # Arguments
    /// * `snapshot` - The snapshot to browse
    /// * `filter` - Path/name filter applied by the engine; empty matches all
    pub async fn get_snapshot_items(
        &self,
        snapshot: &SnapshotMeta,
        filter: &str,
    ) -> Result<Vec<SnapshotItem>> {
        let url = format!("{}/restic/get-snapshot-items", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("filter", filter)])
            .json(snapshot)
            .send()
            .await?;

        self.handle_envelope(response).await
    }

    // =============================================================================
    // Restore / Download
    // =============================================================================

    /// Submit an asynchronous restore job for a selection of entries
    ///
    /// # Returns
    /// The job id to poll with [`EngineClient::get_download_result`]
    pub async fn submit_download_job(&self, req: &RestoreRequest) -> Result<String> {
        let url = format!("{}/restic/submit-download-job", self.base_url);
        debug!(
            "Submitting download job for snapshot {}",
            req.snapshot_meta_entity.snapshot_id
        );
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_envelope(response).await
    }

    /// Fetch the result of a completed restore job as raw bytes
    ///
    /// # Arguments
    /// * `job_id` - Id returned by [`EngineClient::submit_download_job`]
    /// * `is_preview` - True for an inline preview, false for an archive download
    pub async fn get_download_result(&self, job_id: &str, is_preview: bool) -> Result<Vec<u8>> {
        let url = format!("{}/restic/get-download-result", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[
                ("jobId", job_id.to_string()),
                ("isPreview", is_preview.to_string()),
            ])
            .send()
            .await?;

        self.handle_blob(response).await
    }
}
