//! Camera adapter HTTP client
//!
//! Wraps a `reqwest::Client` configured with a per-request timeout and
//! builds the adapter's listing and download URLs from a base host.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use camsync_core::domain::Slot;
//! use camsync_core::ports::IDeviceClient;
//! use camsync_device::client::DeviceClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DeviceClient::new("http://10.98.32.1:8080", "DCIM", Duration::from_secs(1))?;
//! let albums = client.list_albums(Slot::new(0)).await?;
//! println!("{} albums on slot 0", albums.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use camsync_core::{
    config::DeviceConfig,
    domain::{Album, RemoteFile, Slot},
    ports::{DeviceError, IDeviceClient},
};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

// ============================================================================
// DeviceClient
// ============================================================================

/// HTTP client for the camera adapter's file-listing API
///
/// Every request carries the timeout given at construction. Timeouts and
/// refused connections surface as [`DeviceError::Unreachable`], a 404 as
/// [`DeviceError::NotFound`].
#[derive(Debug, Clone)]
pub struct DeviceClient {
    /// The underlying HTTP client
    client: Client,
    /// Adapter base URL, e.g. `http://10.98.32.1:8080`
    base_url: Url,
    /// Root folder albums live under, e.g. `DCIM`
    storage: String,
}

impl DeviceClient {
    /// Creates a client for the adapter at `host`
    ///
    /// # Arguments
    /// * `host` - Base URL of the adapter (`http` or `https`)
    /// * `storage` - Root folder exposed by the adapter
    /// * `timeout` - Timeout applied to every request, body included
    ///
    /// # Errors
    /// Returns an error if `host` is not an http(s) URL or the HTTP client
    /// cannot be built.
    pub fn new(host: &str, storage: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut base_url =
            Url::parse(host).with_context(|| format!("Invalid device host URL: {host}"))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            bail!("Device host must be an http(s) URL, got {host}");
        }
        base_url.set_query(None);
        base_url.set_fragment(None);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            storage: storage.into(),
        })
    }

    /// Creates a client from the `device` configuration section
    pub fn from_config(config: &DeviceConfig) -> Result<Self> {
        Self::new(
            &config.host,
            config.storage_root.clone(),
            config.request_timeout(),
        )
    }

    /// Returns the adapter base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the storage root folder
    pub fn storage(&self) -> &str {
        &self.storage
    }

    /// URL of the album listing for `slot`
    pub fn albums_url(&self, slot: Slot) -> Url {
        self.endpoint(
            &[&self.storage, ""],
            &[("slot", slot.to_string()), ("quick", "1".to_string())],
        )
    }

    /// URL of one page of the file listing of `album`
    pub fn files_url(&self, album: &Album, limit: u32, start: u32) -> Url {
        self.endpoint(
            &[album.storage(), album.name(), ""],
            &[
                ("image", "1".to_string()),
                ("limit", limit.to_string()),
                ("start", start.to_string()),
                ("slot", album.slot().to_string()),
            ],
        )
    }

    /// URL of the raw bytes of `file`
    pub fn file_url(&self, file: &RemoteFile) -> Url {
        let album = file.album();
        self.endpoint(
            &[album.storage(), album.name(), file.file_name()],
            &[("slot", album.slot().to_string())],
        )
    }

    /// Appends path segments and query pairs to the base URL
    ///
    /// A trailing empty segment produces a trailing slash, which the adapter
    /// requires on listing endpoints.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        // The constructor rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        url
    }

    /// Sends a GET and maps the status line to a [`DeviceError`]
    async fn get(&self, url: Url) -> Result<Response, DeviceError> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await.map_err(map_transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DeviceError::NotFound);
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %response.url(), "Unexpected device status");
            return Err(DeviceError::Status(status.as_u16()));
        }
        Ok(response)
    }

    /// GETs a newline-separated listing
    async fn get_listing(&self, url: Url) -> Result<Vec<String>, DeviceError> {
        let body = self.get(url).await?.text().await.map_err(map_transport)?;
        Ok(parse_listing(&body))
    }
}

/// Maps a `reqwest` error to the device error taxonomy
fn map_transport(err: reqwest::Error) -> DeviceError {
    if err.is_timeout() || err.is_connect() {
        DeviceError::Unreachable(err.to_string())
    } else {
        DeviceError::Transport(err.to_string())
    }
}

/// Splits a listing body into names
///
/// Names are separated by `\n`; a trailing `\r` is tolerated and empty
/// tokens are discarded.
pub fn parse_listing(body: &str) -> Vec<String> {
    body.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// IDeviceClient implementation
// ============================================================================

#[async_trait::async_trait]
impl IDeviceClient for DeviceClient {
    #[tracing::instrument(skip(self), fields(slot = %slot))]
    async fn list_albums(&self, slot: Slot) -> Result<Vec<String>, DeviceError> {
        let names = self.get_listing(self.albums_url(slot)).await?;
        debug!(count = names.len(), "Listed albums");
        Ok(names)
    }

    #[tracing::instrument(skip(self, album), fields(album = %album.name(), slot = %album.slot()))]
    async fn list_files(
        &self,
        album: &Album,
        limit: u32,
        start: u32,
    ) -> Result<Vec<String>, DeviceError> {
        let names = self
            .get_listing(self.files_url(album, limit, start))
            .await?;
        debug!(count = names.len(), "Listed file page");
        Ok(names)
    }

    #[tracing::instrument(skip(self, file), fields(file = %file.remote_path()))]
    async fn download_file(&self, file: &RemoteFile) -> Result<Vec<u8>, DeviceError> {
        let bytes = self
            .get(self.file_url(file))
            .await?
            .bytes()
            .await
            .map_err(map_transport)?;
        debug!(size = bytes.len(), "Downloaded file");
        Ok(bytes.to_vec())
    }
}
