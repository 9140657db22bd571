//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IDeviceClient`] - The camera adapter's HTTP listing/download API
//! - [`ILocalFileSystem`] - Writes and deletes in the local mirror directory
//! - [`INetworkMonitor`] - Current wireless network association

pub mod device_client;
pub mod local_filesystem;
pub mod network;

pub use device_client::{DeviceError, IDeviceClient};
pub use local_filesystem::{FileSystemState, ILocalFileSystem};
pub use network::INetworkMonitor;
