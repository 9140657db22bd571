//! Albums and remote files
//!
//! Both types are immutable value records identified by a derived path
//! string. Equality and hashing look only at that key, never at the
//! structural layout, so the storage slot is folded into identity through
//! the path rather than compared on its own.

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use super::errors::DomainError;
use super::newtypes::Slot;

/// Rejects empty names, the `.` and `..` components, and anything holding a
/// path separator. Dots inside a name (`IMG..0001.JPG`) are fine.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

// ============================================================================
// Album
// ============================================================================

/// A directory-like grouping of files on one storage slot
///
/// Typically a camera DCIM subfolder such as `101CANON`. Two albums are
/// equal iff storage root, name and slot all match.
#[derive(Debug, Clone)]
pub struct Album {
    storage: String,
    name: String,
    slot: Slot,
    key: String,
}

impl Album {
    /// Create a new Album
    ///
    /// # Errors
    /// Returns error if the storage root or album name is empty or contains
    /// path separators or traversal sequences
    pub fn new(
        storage: impl Into<String>,
        name: impl Into<String>,
        slot: Slot,
    ) -> Result<Self, DomainError> {
        let storage = storage.into();
        let name = name.into();

        if !is_plain_name(&storage) {
            return Err(DomainError::InvalidStorageRoot(storage));
        }
        if !is_plain_name(&name) {
            return Err(DomainError::InvalidAlbumName(name));
        }

        let key = format!("/{storage}/{name}?slot={slot}");
        Ok(Self {
            storage,
            name,
            slot,
            key,
        })
    }

    /// Album name as reported by the device
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage root the album lives under (e.g. `DCIM`)
    #[must_use]
    pub fn storage(&self) -> &str {
        &self.storage
    }

    /// Slot holding the card this album was listed from
    #[must_use]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Device-relative path of the album, e.g. `/DCIM/101CANON`
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}/{}", self.storage, self.name)
    }
}

impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Album {}

impl Hash for Album {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Display for Album {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Album({} slot {})", self.name, self.slot)
    }
}

// ============================================================================
// RemoteFile
// ============================================================================

/// A single file inside an album on the device
///
/// The canonical remote path (`/{storage}/{album}/{file}?slot={n}`) is the
/// identity key. The local destination flattens the album structure: every
/// file lands directly under the destination root by its file name.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    album: Album,
    file_name: String,
    remote_path: String,
}

impl RemoteFile {
    /// Create a new RemoteFile
    ///
    /// # Errors
    /// Returns error if the file name is empty or could escape the
    /// destination directory once flattened
    pub fn new(album: Album, file_name: impl Into<String>) -> Result<Self, DomainError> {
        let file_name = file_name.into();
        if !is_plain_name(&file_name) {
            return Err(DomainError::InvalidFileName(file_name));
        }

        let remote_path = format!("{}/{}?slot={}", album.path(), file_name, album.slot());
        Ok(Self {
            album,
            file_name,
            remote_path,
        })
    }

    /// The album this file was listed from
    #[must_use]
    pub fn album(&self) -> &Album {
        &self.album
    }

    /// File name as reported by the device
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Canonical remote path, used as the identity key
    #[must_use]
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    /// Destination of this file under the local mirror root
    #[must_use]
    pub fn local_path(&self, root: &Path) -> PathBuf {
        root.join(&self.file_name)
    }
}

impl PartialEq for RemoteFile {
    fn eq(&self, other: &Self) -> bool {
        self.remote_path == other.remote_path
    }
}

impl Eq for RemoteFile {}

impl Hash for RemoteFile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.remote_path.hash(state);
    }
}

impl Display for RemoteFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "File({})", self.remote_path)
    }
}
