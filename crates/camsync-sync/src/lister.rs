//! Remote lister
//!
//! Walks the adapter's slots, albums and file pages through an
//! [`IDeviceClient`] and turns the result into a [`FileSet`].
//!
//! ## Crawl Rules
//!
//! - A slot whose album listing answers 404 holds no card and is skipped.
//!   If every slot is skipped the crawl fails with
//!   [`CrawlError::NoDeviceFound`].
//! - File listings are paged: a page exactly `page_size` long means more may
//!   follow; a shorter page (including an empty one) ends the album.
//! - A 404 on a file page is logged and treated as an empty page.
//! - Any other device error aborts the whole crawl as
//!   [`CrawlError::DeviceUnreachable`].

use std::sync::Arc;
use std::time::Instant;

use camsync_core::config::DeviceConfig;
use camsync_core::domain::{Album, FileSet, RemoteFile, Slot};
use camsync_core::ports::{DeviceError, IDeviceClient};
use tracing::{debug, info, warn};

use crate::CrawlError;

/// One album and, when requested, the names of every file in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumListing {
    pub album: Album,
    /// `Some` iff files were requested
    pub files: Option<Vec<String>>,
}

/// Crawls the adapter's storage
pub struct RemoteLister {
    client: Arc<dyn IDeviceClient>,
    storage: String,
    slots: Vec<Slot>,
    page_size: u32,
}

impl RemoteLister {
    /// Creates a lister over `slots` of the `storage` root
    ///
    /// A `page_size` of zero is raised to one so pagination always advances.
    pub fn new(
        client: Arc<dyn IDeviceClient>,
        storage: impl Into<String>,
        slots: Vec<Slot>,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            storage: storage.into(),
            slots,
            page_size: page_size.max(1),
        }
    }

    /// Creates a lister from the `device` configuration section
    pub fn from_config(client: Arc<dyn IDeviceClient>, config: &DeviceConfig) -> Self {
        Self::new(
            client,
            config.storage_root.clone(),
            config.slots.clone(),
            config.page_size,
        )
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Lists every album on every slot that holds a card
    ///
    /// # Errors
    /// [`CrawlError::NoDeviceFound`] if no slot holds a card,
    /// [`CrawlError::DeviceUnreachable`] on any other device failure.
    pub async fn list_albums(&self, include_files: bool) -> Result<Vec<AlbumListing>, CrawlError> {
        let mut listings = Vec::new();
        let mut card_found = false;

        for &slot in &self.slots {
            let names = match self.client.list_albums(slot).await {
                Ok(names) => names,
                Err(DeviceError::NotFound) => {
                    debug!(%slot, "No card in slot");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            card_found = true;

            for name in names {
                let album = match Album::new(self.storage.as_str(), name, slot) {
                    Ok(album) => album,
                    Err(e) => {
                        warn!(%slot, error = %e, "Skipping album with unusable name");
                        continue;
                    }
                };
                let files = if include_files {
                    Some(self.list_files(&album).await?)
                } else {
                    None
                };
                listings.push(AlbumListing { album, files });
            }
        }

        if !card_found {
            return Err(CrawlError::NoDeviceFound);
        }
        Ok(listings)
    }

    /// Lists every file name in `album`, following pagination
    pub async fn list_files(&self, album: &Album) -> Result<Vec<String>, CrawlError> {
        let mut files = Vec::new();
        let mut start: u32 = 0;

        loop {
            let page = match self.client.list_files(album, self.page_size, start).await {
                Ok(page) => page,
                Err(DeviceError::NotFound) => {
                    warn!(
                        album = %album.name(),
                        slot = %album.slot(),
                        start,
                        "File page unavailable, is the adapter connected to the camera?"
                    );
                    Vec::new()
                }
                Err(e) => return Err(e.into()),
            };

            let more = page.len() == self.page_size as usize;
            files.extend(page);
            match start.checked_add(self.page_size) {
                Some(next) if more => start = next,
                _ => break,
            }
        }

        info!(album = %album.name(), slot = %album.slot(), total = files.len(), "Listed album");
        Ok(files)
    }

    /// Lists every file on the device
    ///
    /// File names that cannot be mirrored locally are skipped with a warning.
    pub async fn crawl(&self) -> Result<FileSet, CrawlError> {
        let started = Instant::now();
        let listings = self.list_albums(true).await?;

        let mut current = FileSet::new();
        for AlbumListing { album, files } in listings {
            for name in files.unwrap_or_default() {
                match RemoteFile::new(album.clone(), name) {
                    Ok(file) => {
                        current.insert(file);
                    }
                    Err(e) => warn!(album = %album.name(), error = %e, "Skipping file with unusable name"),
                }
            }
        }

        info!(
            files = current.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Crawl complete"
        );
        Ok(current)
    }
}
