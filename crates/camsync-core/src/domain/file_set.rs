//! File sets and reconciliation
//!
//! A [`FileSet`] is the unit of reconciliation: the loop keeps one as its
//! baseline and compares each fresh crawl against it. Reconciliation is a
//! pure set difference in both directions; iteration order over the results
//! is unspecified.

use std::collections::hash_set::{IntoIter, Iter};
use std::collections::HashSet;

use super::remote::RemoteFile;

/// Unordered set of remote files, deduplicated by path-derived identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet(HashSet<RemoteFile>);

impl FileSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    /// Number of files in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the set contains a file with the same identity
    #[must_use]
    pub fn contains(&self, file: &RemoteFile) -> bool {
        self.0.contains(file)
    }

    /// Insert a file, returning false if an equal file was already present
    pub fn insert(&mut self, file: RemoteFile) -> bool {
        self.0.insert(file)
    }

    /// Remove a file, returning whether it was present
    pub fn remove(&mut self, file: &RemoteFile) -> bool {
        self.0.remove(file)
    }

    /// Iterate over the files in unspecified order
    pub fn iter(&self) -> Iter<'_, RemoteFile> {
        self.0.iter()
    }

    /// Files present in `self` but not in `other`
    #[must_use]
    pub fn difference(&self, other: &FileSet) -> FileSet {
        self.0.difference(&other.0).cloned().collect()
    }

    /// Compares a baseline against the current remote state
    ///
    /// `added = current − baseline` and `removed = baseline − current`,
    /// both by [`RemoteFile`] identity.
    #[must_use]
    pub fn reconcile(baseline: &FileSet, current: &FileSet) -> Changes {
        Changes {
            added: current.difference(baseline),
            removed: baseline.difference(current),
        }
    }
}

impl FromIterator<RemoteFile> for FileSet {
    fn from_iter<T: IntoIterator<Item = RemoteFile>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<RemoteFile> for FileSet {
    fn extend<T: IntoIterator<Item = RemoteFile>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for FileSet {
    type Item = RemoteFile;
    type IntoIter = IntoIter<RemoteFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a RemoteFile;
    type IntoIter = Iter<'a, RemoteFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of reconciling a baseline against a fresh crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes {
    /// Files present remotely that the baseline did not know about
    pub added: FileSet,
    /// Files the baseline knew about that are gone remotely
    pub removed: FileSet,
}

impl Changes {
    /// Returns true if there is nothing to apply
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Total number of files touched by these changes
    #[must_use]
    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}
