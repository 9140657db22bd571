//! camsync Device - HTTP client for the camera storage adapter
//!
//! The adapter is a small Wi-Fi bridge plugged into a camera. It exposes the
//! memory cards in its storage slots over a plain-text HTTP API:
//!
//! - `GET /{storage}/?slot={n}&quick=1` lists album names, one per line
//! - `GET /{storage}/{album}/?image=1&limit={L}&start={S}&slot={n}` lists one
//!   page of file names
//! - `GET /{storage}/{album}/{file}?slot={n}` returns the file bytes
//!
//! ## Modules
//!
//! - [`client`] - [`DeviceClient`], the `reqwest`-backed
//!   [`IDeviceClient`](camsync_core::ports::IDeviceClient) implementation

pub mod client;

pub use client::DeviceClient;
