//! Sync loop
//!
//! The [`SyncEngine`] owns the in-memory baseline (the last known remote
//! file set) and drives one cycle per [`tick`](SyncEngine::tick):
//!
//! 1. **Connectivity**: skip the cycle unless on the adapter's network
//! 2. **Crawl**: list every file on the device
//! 3. **Cold start**: the first successful crawl becomes the baseline as-is
//! 4. **Sync**: reconcile against the baseline, apply, replace the baseline
//!
//! A failed crawl never touches the baseline. Added files that could not be
//! saved are left out of the new baseline so the next cycle retries them.

use std::collections::HashSet;
use std::time::Duration;

use camsync_core::config::Config;
use camsync_core::domain::{FileSet, RemoteFile};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::applier::{Applier, ApplyReport};
use crate::lister::RemoteLister;
use crate::network::ConnectivityOracle;
use crate::CrawlError;

/// Where the loop stands after its latest tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Not on the adapter's network
    Disconnected,
    /// On the network, no baseline established yet
    Uninitialized,
    /// Baseline established; ticks reconcile and apply
    Syncing,
}

/// Summary of one reconcile + apply cycle
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Number of files in `current − baseline`
    pub added: usize,
    /// Number of files in `baseline − current`
    pub removed: usize,
    pub apply: ApplyReport,
    /// Removed files whose local copy has the same name as a file still on
    /// the device, so deleting it also deletes that file's copy
    pub shared_removals: usize,
    /// Size of the baseline after the cycle
    pub baseline_len: usize,
}

/// What a single tick did
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// Not on the device network; nothing was requested
    Disconnected,
    /// Cold start: the crawl was adopted as baseline without applying
    Initialized { files: usize },
    /// Changes were reconciled and applied
    Synced(SyncReport),
    /// The crawl failed; the baseline is unchanged
    CrawlFailed(CrawlError),
    /// A non-empty baseline met an empty crawl and the cycle was skipped
    EmptyCrawlIgnored,
}

/// Polling sync loop holding the baseline
pub struct SyncEngine {
    oracle: ConnectivityOracle,
    lister: RemoteLister,
    applier: Applier,
    baseline: Option<FileSet>,
    state: SyncState,
    ignore_empty_crawl: bool,
}

impl SyncEngine {
    /// Creates an engine with no baseline
    ///
    /// # Arguments
    /// * `ignore_empty_crawl` - Skip cycles where a non-empty baseline meets
    ///   an empty crawl instead of deleting the whole local mirror
    pub fn new(
        oracle: ConnectivityOracle,
        lister: RemoteLister,
        applier: Applier,
        ignore_empty_crawl: bool,
    ) -> Self {
        Self {
            oracle,
            lister,
            applier,
            baseline: None,
            state: SyncState::Uninitialized,
            ignore_empty_crawl,
        }
    }

    /// Creates an engine with `ignore_empty_crawl` taken from `config`
    pub fn from_config(
        oracle: ConnectivityOracle,
        lister: RemoteLister,
        applier: Applier,
        config: &Config,
    ) -> Self {
        Self::new(oracle, lister, applier, config.sync.ignore_empty_crawl)
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// The last known remote file set, if one has been established
    pub fn baseline(&self) -> Option<&FileSet> {
        self.baseline.as_ref()
    }

    /// Runs one cycle
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.oracle.is_device_network_reachable().await {
            info!("Not connected to device network");
            self.state = SyncState::Disconnected;
            return TickOutcome::Disconnected;
        }

        let Some(baseline) = self.baseline.as_ref() else {
            self.state = SyncState::Uninitialized;
            info!("Initializing file list");
            return match self.lister.crawl().await {
                Ok(current) => {
                    let files = current.len();
                    info!(files, "Baseline established");
                    self.baseline = Some(current);
                    self.state = SyncState::Syncing;
                    TickOutcome::Initialized { files }
                }
                Err(e) => self.crawl_failed(e).await,
            };
        };

        info!("Looking for file changes");
        self.state = SyncState::Syncing;
        let current = match self.lister.crawl().await {
            Ok(current) => current,
            Err(e) => return self.crawl_failed(e).await,
        };

        if self.ignore_empty_crawl && current.is_empty() && !baseline.is_empty() {
            warn!(
                baseline = baseline.len(),
                "Device listed no files, keeping previous file list"
            );
            return TickOutcome::EmptyCrawlIgnored;
        }

        let changes = FileSet::reconcile(baseline, &current);
        let (added, removed) = (changes.added.len(), changes.removed.len());
        info!(added, removed, "{added} files added, {removed} files removed");

        let shared = shared_local_copies(&changes.removed, &current);
        for file in &shared {
            warn!(
                file = %file.remote_path(),
                name = %file.file_name(),
                "Removed file shares its local copy with a file still on the device"
            );
        }
        let shared_removals = shared.len();

        let apply = if changes.is_empty() {
            ApplyReport::default()
        } else {
            self.applier.apply(&changes).await
        };

        let next = next_baseline(current, &apply);
        let baseline_len = next.len();
        self.baseline = Some(next);

        TickOutcome::Synced(SyncReport {
            added,
            removed,
            apply,
            shared_removals,
            baseline_len,
        })
    }

    async fn crawl_failed(&self, err: CrawlError) -> TickOutcome {
        let reason = self.oracle.explain_crawl_failure().await;
        warn!(error = %err, "{reason}");
        TickOutcome::CrawlFailed(err)
    }

    /// Ticks every `poll_interval` until `shutdown` is cancelled
    ///
    /// The interval is a fixed sleep after each tick, whatever its outcome.
    pub async fn run(&mut self, poll_interval: Duration, shutdown: CancellationToken) {
        info!(
            poll_interval_secs = poll_interval.as_secs_f64(),
            destination = %self.applier.destination().display(),
            "Starting sync loop"
        );

        while !shutdown.is_cancelled() {
            tokio::select! {
                outcome = self.tick() => debug!(?outcome, "Tick finished"),
                _ = shutdown.cancelled() => {
                    info!("Shutdown signal received during sync cycle");
                    break;
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => {}
                _ = shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("Sync loop stopped");
    }
}

/// Removed files whose flattened local path is also claimed by a file in
/// `current`
fn shared_local_copies<'a>(removed: &'a FileSet, current: &FileSet) -> Vec<&'a RemoteFile> {
    let names: HashSet<&str> = current.iter().map(RemoteFile::file_name).collect();
    removed
        .iter()
        .filter(|file| names.contains(file.file_name()))
        .collect()
}

/// The crawl minus every added file that did not make it to disk
fn next_baseline(mut current: FileSet, apply: &ApplyReport) -> FileSet {
    for file in &apply.failed {
        current.remove(file);
    }
    current
}
