//! Local filesystem adapter (secondary/driven adapter)
//!
//! Implements [`ILocalFileSystem`] using `tokio::fs`.
//!
//! ## Design Decisions
//!
//! - **Atomic writes**: a photo is written to a sibling `.part` file and
//!   renamed into place, so an interrupted download never leaves a truncated
//!   photo under its final name.
//! - **Files only**: the mirror is flat, so `delete_file` refuses to remove
//!   directories.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use camsync_core::ports::{FileSystemState, ILocalFileSystem};
use tracing::{debug, instrument};

/// Suffix of in-flight downloads
const PARTIAL_SUFFIX: &str = ".part";

/// Adapter that bridges the [`ILocalFileSystem`] port to the real filesystem.
///
/// Zero-sized: every operation takes a full path. The destination root is
/// resolved by the applier.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystemAdapter;

impl LocalFileSystemAdapter {
    /// Create a new `LocalFileSystemAdapter`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn partial_path(target: &Path) -> PathBuf {
    let mut p = target.as_os_str().to_owned();
    p.push(PARTIAL_SUFFIX);
    PathBuf::from(p)
}

#[async_trait::async_trait]
impl ILocalFileSystem for LocalFileSystemAdapter {
    #[instrument(skip(self, data), fields(path = %path.display(), bytes = data.len()))]
    async fn write_file(&self, path: &Path, data: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = partial_path(path);
        debug!(?tmp_path, "writing to temporary file");
        if let Err(e) = tokio::fs::write(&tmp_path, data).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to write {}", tmp_path.display()));
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to move into {}", path.display()));
        }

        debug!("write complete");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn delete_file(&self, path: &Path) -> anyhow::Result<()> {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        if metadata.is_dir() {
            bail!("Refusing to delete directory {}", path.display());
        }

        tokio::fs::remove_file(path)
            .await
            .with_context(|| format!("Failed to delete {}", path.display()))?;
        debug!("delete complete");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn get_state(&self, path: &Path) -> anyhow::Result<FileSystemState> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("path not found");
                return Ok(FileSystemState::not_found());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(FileSystemState {
            exists: true,
            is_file: metadata.is_file(),
        })
    }
}
