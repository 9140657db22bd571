//! Device client port (driven/secondary port)
//!
//! This module defines the interface for talking to the camera storage
//! adapter over its HTTP file-listing API. The only implementation in this
//! workspace is `camsync-device::DeviceClient`; tests substitute fakes.
//!
//! ## Design Notes
//!
//! - Unlike the filesystem and network ports, this port returns a typed
//!   [`DeviceError`]: the lister must tell "no card in this slot" (404)
//!   apart from "device unreachable" to decide between skipping a slot and
//!   abandoning the crawl.
//! - Each method issues exactly one HTTP request; pagination and the slot
//!   loop live in the lister, not in adapters.

use thiserror::Error;

use crate::domain::{Album, RemoteFile, Slot};

/// Errors reported by a device client
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The device answered 404 for this resource
    #[error("Not found")]
    NotFound,

    /// The request timed out or the connection could not be established
    #[error("Device unreachable: {0}")]
    Unreachable(String),

    /// The device answered with a non-success status other than 404
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// Any other transport-level failure (e.g. body could not be read)
    #[error("Transport error: {0}")]
    Transport(String),
}

impl DeviceError {
    /// Returns true for the 404 case
    pub fn is_not_found(&self) -> bool {
        matches!(self, DeviceError::NotFound)
    }
}

/// Port trait for the camera adapter's HTTP API
#[async_trait::async_trait]
pub trait IDeviceClient: Send + Sync {
    /// Lists album names on the card in `slot`
    ///
    /// Maps to `GET {host}/{storage}/?slot={n}&quick=1`.
    ///
    /// # Errors
    /// [`DeviceError::NotFound`] when the slot has no card inserted
    async fn list_albums(&self, slot: Slot) -> Result<Vec<String>, DeviceError>;

    /// Lists one page of file names in `album`
    ///
    /// Maps to `GET {host}/{storage}/{album}/?image=1&limit={L}&start={S}&slot={n}`.
    ///
    /// # Arguments
    /// * `album` - Album to list
    /// * `limit` - Maximum number of names in the page
    /// * `start` - Offset of the first name in the page
    async fn list_files(
        &self,
        album: &Album,
        limit: u32,
        start: u32,
    ) -> Result<Vec<String>, DeviceError>;

    /// Downloads the raw bytes of `file`
    ///
    /// Maps to `GET {host}/{storage}/{album}/{file}?slot={n}`.
    async fn download_file(&self, file: &RemoteFile) -> Result<Vec<u8>, DeviceError>;
}
