//! In-memory port fakes shared by the unit tests of this crate
//!
//! Each fake records the calls it receives so tests can assert on request
//! sequences as well as on results.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::bail;
use camsync_core::domain::{Album, RemoteFile, Slot};
use camsync_core::ports::{
    DeviceError, FileSystemState, IDeviceClient, ILocalFileSystem, INetworkMonitor,
};

pub const STORAGE: &str = "DCIM";

pub fn album(name: &str, slot: u8) -> Album {
    Album::new(STORAGE, name, Slot::new(slot)).unwrap()
}

pub fn file(album_name: &str, slot: u8, name: &str) -> RemoteFile {
    RemoteFile::new(album(album_name, slot), name).unwrap()
}

// ============================================================================
// FakeDeviceClient
// ============================================================================

type SlotContents = Result<BTreeMap<String, Vec<String>>, DeviceError>;

#[derive(Default)]
struct DeviceState {
    /// Slots absent from the map answer 404
    slots: BTreeMap<u8, SlotContents>,
    page_errors: HashMap<(u8, String), DeviceError>,
    download_errors: HashMap<String, DeviceError>,
}

/// Camera adapter fake serving album and file listings from memory
///
/// Downloads return the file name as the body.
#[derive(Default)]
pub struct FakeDeviceClient {
    state: Mutex<DeviceState>,
    pub album_calls: Mutex<Vec<Slot>>,
    /// `(album name, limit, start)` per page request
    pub page_calls: Mutex<Vec<(String, u32, u32)>>,
    /// Remote paths of download requests
    pub download_calls: Mutex<Vec<String>>,
}

impl FakeDeviceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `files` into `album` on `slot`, creating both as needed.
    pub fn set_album(&self, slot: u8, album: &str, files: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let contents = state.slots.entry(slot).or_insert_with(|| Ok(BTreeMap::new()));
        if let Ok(albums) = contents {
            albums.insert(
                album.to_string(),
                files.iter().map(|f| f.to_string()).collect(),
            );
        }
    }

    /// Inserts an empty card into `slot`.
    pub fn insert_card(&self, slot: u8) {
        let mut state = self.state.lock().unwrap();
        state.slots.entry(slot).or_insert_with(|| Ok(BTreeMap::new()));
    }

    /// Removes the card from `slot` so its listing answers 404.
    pub fn eject(&self, slot: u8) {
        self.state.lock().unwrap().slots.remove(&slot);
    }

    pub fn fail_slot(&self, slot: u8, err: DeviceError) {
        self.state.lock().unwrap().slots.insert(slot, Err(err));
    }

    pub fn fail_pages(&self, slot: u8, album: &str, err: DeviceError) {
        self.state
            .lock()
            .unwrap()
            .page_errors
            .insert((slot, album.to_string()), err);
    }

    pub fn fail_download(&self, file_name: &str, err: DeviceError) {
        self.state
            .lock()
            .unwrap()
            .download_errors
            .insert(file_name.to_string(), err);
    }

    pub fn heal_downloads(&self) {
        self.state.lock().unwrap().download_errors.clear();
    }

    pub fn page_starts(&self) -> Vec<u32> {
        self.page_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, start)| *start)
            .collect()
    }

    pub fn download_count(&self) -> usize {
        self.download_calls.lock().unwrap().len()
    }

    pub fn request_count(&self) -> usize {
        self.album_calls.lock().unwrap().len()
            + self.page_calls.lock().unwrap().len()
            + self.download_count()
    }
}

#[async_trait::async_trait]
impl IDeviceClient for FakeDeviceClient {
    async fn list_albums(&self, slot: Slot) -> Result<Vec<String>, DeviceError> {
        self.album_calls.lock().unwrap().push(slot);
        match self.state.lock().unwrap().slots.get(&slot.index()) {
            None => Err(DeviceError::NotFound),
            Some(Err(e)) => Err(e.clone()),
            Some(Ok(albums)) => Ok(albums.keys().cloned().collect()),
        }
    }

    async fn list_files(
        &self,
        album: &Album,
        limit: u32,
        start: u32,
    ) -> Result<Vec<String>, DeviceError> {
        self.page_calls
            .lock()
            .unwrap()
            .push((album.name().to_string(), limit, start));

        let state = self.state.lock().unwrap();
        let key = (album.slot().index(), album.name().to_string());
        if let Some(err) = state.page_errors.get(&key) {
            return Err(err.clone());
        }
        let files = match state.slots.get(&key.0) {
            Some(Ok(albums)) => albums.get(&key.1).ok_or(DeviceError::NotFound)?,
            _ => return Err(DeviceError::NotFound),
        };
        let start = (start as usize).min(files.len());
        let end = start.saturating_add(limit as usize).min(files.len());
        Ok(files[start..end].to_vec())
    }

    async fn download_file(&self, file: &RemoteFile) -> Result<Vec<u8>, DeviceError> {
        self.download_calls
            .lock()
            .unwrap()
            .push(file.remote_path().to_string());
        match self.state.lock().unwrap().download_errors.get(file.file_name()) {
            Some(err) => Err(err.clone()),
            None => Ok(file.file_name().as_bytes().to_vec()),
        }
    }
}

// ============================================================================
// FakeFileSystem
// ============================================================================

/// In-memory filesystem recording writes and deletes
#[derive(Default)]
pub struct FakeFileSystem {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    fail_writes: Mutex<bool>,
    pub writes: Mutex<Vec<PathBuf>>,
    pub deletes: Mutex<Vec<PathBuf>>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: impl Into<PathBuf>, data: &[u8]) {
        self.files.lock().unwrap().insert(path.into(), data.to_vec());
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn mutation_count(&self) -> usize {
        self.writes.lock().unwrap().len() + self.deletes.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ILocalFileSystem for FakeFileSystem {
    async fn write_file(&self, path: &Path, data: &[u8]) -> anyhow::Result<()> {
        self.writes.lock().unwrap().push(path.to_path_buf());
        if *self.fail_writes.lock().unwrap() {
            bail!("disk full");
        }
        self.put(path, data);
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> anyhow::Result<()> {
        self.deletes.lock().unwrap().push(path.to_path_buf());
        match self.files.lock().unwrap().remove(path) {
            Some(_) => Ok(()),
            None => bail!("no such file: {}", path.display()),
        }
    }

    async fn get_state(&self, path: &Path) -> anyhow::Result<FileSystemState> {
        Ok(if self.files.lock().unwrap().contains_key(path) {
            FileSystemState {
                exists: true,
                is_file: true,
            }
        } else {
            FileSystemState::not_found()
        })
    }
}

// ============================================================================
// FakeNetworkMonitor
// ============================================================================

/// Network monitor reporting a settable SSID
pub struct FakeNetworkMonitor {
    current: Mutex<Result<Option<String>, String>>,
}

impl FakeNetworkMonitor {
    pub fn on(ssid: &str) -> Self {
        Self {
            current: Mutex::new(Ok(Some(ssid.to_string()))),
        }
    }

    pub fn offline() -> Self {
        Self {
            current: Mutex::new(Ok(None)),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            current: Mutex::new(Err(message.to_string())),
        }
    }

    pub fn join(&self, ssid: &str) {
        *self.current.lock().unwrap() = Ok(Some(ssid.to_string()));
    }

    pub fn disconnect(&self) {
        *self.current.lock().unwrap() = Ok(None);
    }
}

#[async_trait::async_trait]
impl INetworkMonitor for FakeNetworkMonitor {
    async fn current_network_name(&self) -> anyhow::Result<Option<String>> {
        match &*self.current.lock().unwrap() {
            Ok(name) => Ok(name.clone()),
            Err(message) => bail!("{message}"),
        }
    }
}
