//! Local filesystem port (driven/secondary port)
//!
//! This module defines the interface for writing downloaded photos into
//! the local mirror directory and removing ones deleted on the device.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because filesystem errors are adapter-specific.
//! - Paths are plain `Path`s under the configured destination root; the
//!   domain guarantees file names cannot escape that root.

use std::path::Path;

// ============================================================================
// FileSystemState struct
// ============================================================================

/// Snapshot of a path's state on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSystemState {
    /// Whether the file/directory exists on disk
    pub exists: bool,
    /// Whether this is a regular file (false for directories and other types)
    pub is_file: bool,
}

impl FileSystemState {
    /// Returns a state representing a non-existent path
    pub fn not_found() -> Self {
        Self {
            exists: false,
            is_file: false,
        }
    }

    /// Returns true if the file exists and is a regular file
    pub fn is_regular_file(&self) -> bool {
        self.exists && self.is_file
    }
}

// ============================================================================
// ILocalFileSystem trait
// ============================================================================

/// Port trait for local filesystem operations
#[async_trait::async_trait]
pub trait ILocalFileSystem: Send + Sync {
    /// Writes data to a file, creating it (and its parent directory) if
    /// necessary
    ///
    /// If the file already exists, its contents are replaced.
    async fn write_file(&self, path: &Path, data: &[u8]) -> anyhow::Result<()>;

    /// Deletes a file from the filesystem
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be deleted
    async fn delete_file(&self, path: &Path) -> anyhow::Result<()>;

    /// Gets the current state of a path
    ///
    /// Returns `FileSystemState::not_found()` if the path doesn't exist
    /// (does not return an error for missing paths).
    async fn get_state(&self, path: &Path) -> anyhow::Result<FileSystemState>;
}
