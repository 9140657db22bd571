//! camsync Sync - the polling loop that mirrors camera photos locally
//!
//! Provides:
//! - A full crawl of every slot, album and page on the adapter
//! - Detection of the adapter's Wi-Fi network
//! - Application of added/removed sets to the local mirror
//! - The tick-driven sync loop holding the in-memory baseline
//!
//! ## Modules
//!
//! - [`lister`] - Remote lister: slots, albums and paginated file listings
//! - [`network`] - Connectivity oracle and the system Wi-Fi monitor
//! - [`applier`] - Downloads added photos, deletes removed ones
//! - [`filesystem`] - Local filesystem adapter (atomic writes)
//! - [`engine`] - Sync loop state machine

pub mod applier;
pub mod engine;
pub mod filesystem;
pub mod lister;
pub mod network;

#[cfg(test)]
pub(crate) mod testing;

use camsync_core::ports::DeviceError;
use thiserror::Error;

/// Errors that abort a crawl
///
/// Either one aborts the whole crawl; the loop keeps its previous baseline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrawlError {
    /// A request timed out, the connection failed, or the adapter answered
    /// with an unexpected status
    #[error("Device unreachable: {0}")]
    DeviceUnreachable(String),

    /// Every configured slot answered "not found"
    #[error("No memory card found in any slot")]
    NoDeviceFound,
}

impl From<DeviceError> for CrawlError {
    fn from(err: DeviceError) -> Self {
        CrawlError::DeviceUnreachable(err.to_string())
    }
}
