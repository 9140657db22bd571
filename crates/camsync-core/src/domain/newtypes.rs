//! Domain newtypes
//!
//! Strongly-typed wrappers for small domain values.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Index of one storage bay on the camera adapter
///
/// The adapter exposes a small, fixed number of slots (typically two), each
/// of which may or may not hold a memory card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(u8);

impl Slot {
    /// Create a slot from its index
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the raw slot index
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// The slots a stock adapter exposes: `{0, 1}`
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self(0), Self(1)]
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Slot {
    fn from(index: u8) -> Self {
        Self(index)
    }
}
