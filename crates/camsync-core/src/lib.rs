//! camsync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Album`, `RemoteFile`, `FileSet`, `Changes`
//! - **Reconciliation** - pure set difference between a baseline and a fresh crawl
//! - **Port definitions** - Traits for adapters: `IDeviceClient`, `ILocalFileSystem`, `INetworkMonitor`
//! - **Configuration** - YAML-backed settings for the device, sync loop and logging
//!
//! # Architecture
//!
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement
//! (`camsync-device` for HTTP, `camsync-sync` for the filesystem and Wi-Fi).

pub mod config;
pub mod domain;
pub mod ports;
