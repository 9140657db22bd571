//! Applies reconciled changes to the local mirror
//!
//! Added files are downloaded and written under the destination root,
//! removed files are deleted if present. Nothing here propagates an error:
//! every failure is logged and recorded in the [`ApplyReport`].

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use camsync_core::domain::{Changes, RemoteFile};
use camsync_core::ports::{DeviceError, IDeviceClient, ILocalFileSystem};
use tracing::{debug, info, warn};

/// Outcome of one [`Applier::apply`] call
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    /// Added files now present locally
    pub downloaded: Vec<RemoteFile>,
    /// Added files that are not present locally
    pub failed: Vec<RemoteFile>,
    /// Removed files whose local copy was deleted
    pub deleted: Vec<RemoteFile>,
    /// One message per failed download, write or delete
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

impl ApplyReport {
    /// True if nothing failed
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.errors.is_empty()
    }
}

/// Writes added photos and deletes removed ones
pub struct Applier {
    client: Arc<dyn IDeviceClient>,
    filesystem: Arc<dyn ILocalFileSystem>,
    destination: PathBuf,
}

impl Applier {
    pub fn new(
        client: Arc<dyn IDeviceClient>,
        filesystem: Arc<dyn ILocalFileSystem>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            filesystem,
            destination: destination.into(),
        }
    }

    /// Local root photos are mirrored into
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Downloads `changes.added`, then deletes `changes.removed`
    ///
    /// Once the device stops answering, the rest of the downloads are
    /// skipped and reported as failed. Deletions still run.
    pub async fn apply(&self, changes: &Changes) -> ApplyReport {
        let started = Instant::now();
        let mut report = ApplyReport::default();

        let mut pending = changes.added.iter();
        for file in pending.by_ref() {
            if self.download(file, &mut report).await.is_break() {
                break;
            }
        }
        let skipped: Vec<RemoteFile> = pending.cloned().collect();
        if !skipped.is_empty() {
            warn!(count = skipped.len(), "Device unreachable, skipping remaining downloads");
            report.failed.extend(skipped);
        }

        for file in &changes.removed {
            self.remove(file, &mut report).await;
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            downloaded = report.downloaded.len(),
            failed = report.failed.len(),
            deleted = report.deleted.len(),
            duration_ms = report.duration_ms,
            "Applied changes"
        );
        report
    }

    async fn download(&self, file: &RemoteFile, report: &mut ApplyReport) -> ControlFlow<()> {
        let dest = file.local_path(&self.destination);

        let bytes = match self.client.download_file(file).await {
            Ok(bytes) => bytes,
            Err(DeviceError::Unreachable(reason)) => {
                warn!(file = %file.remote_path(), %reason, "Failed to download image");
                report
                    .errors
                    .push(format!("{}: device unreachable: {reason}", file.remote_path()));
                report.failed.push(file.clone());
                return ControlFlow::Break(());
            }
            Err(e) => {
                warn!(file = %file.remote_path(), error = %e, "Failed to download image");
                report.errors.push(format!("{}: {e}", file.remote_path()));
                report.failed.push(file.clone());
                return ControlFlow::Continue(());
            }
        };

        match self.filesystem.write_file(&dest, &bytes).await {
            Ok(()) => {
                info!(file = %file.remote_path(), dest = %dest.display(), "Saved image");
                report.downloaded.push(file.clone());
            }
            Err(e) => {
                warn!(file = %file.remote_path(), dest = %dest.display(), error = %format!("{e:#}"), "Failed to save image");
                report.errors.push(format!("{}: {e:#}", dest.display()));
                report.failed.push(file.clone());
            }
        }
        ControlFlow::Continue(())
    }

    async fn remove(&self, file: &RemoteFile, report: &mut ApplyReport) {
        let dest = file.local_path(&self.destination);

        let state = match self.filesystem.get_state(&dest).await {
            Ok(state) => state,
            Err(e) => {
                warn!(dest = %dest.display(), error = %format!("{e:#}"), "Failed to inspect local copy");
                report.errors.push(format!("{}: {e:#}", dest.display()));
                return;
            }
        };
        if !state.exists {
            debug!(dest = %dest.display(), "Local copy already absent");
            return;
        }
        if !state.is_regular_file() {
            warn!(dest = %dest.display(), "Local path is not a file, leaving it");
            return;
        }

        match self.filesystem.delete_file(&dest).await {
            Ok(()) => {
                info!(file = %file.remote_path(), dest = %dest.display(), "Removed image");
                report.deleted.push(file.clone());
            }
            Err(e) => {
                warn!(dest = %dest.display(), error = %format!("{e:#}"), "Failed to remove image");
                report.errors.push(format!("{}: {e:#}", dest.display()));
            }
        }
    }
}
