//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! mostly validation failures for names reported by the device.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Album name is empty or contains path separators
    #[error("Invalid album name: {0}")]
    InvalidAlbumName(String),

    /// File name is empty or would escape the destination directory
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    /// Storage root name is empty or contains path separators
    #[error("Invalid storage root: {0}")]
    InvalidStorageRoot(String),
}
