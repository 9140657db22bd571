//! Domain entities and business logic
//!
//! This module contains the core domain types for camsync:
//! - Newtypes for validated values (storage slots)
//! - Albums and remote files with path-derived identity
//! - File sets and the reconciliation between two of them
//! - Domain-specific error types

pub mod errors;
pub mod file_set;
pub mod newtypes;
pub mod remote;

// Re-export commonly used types
pub use errors::DomainError;
pub use file_set::{Changes, FileSet};
pub use newtypes::Slot;
pub use remote::{Album, RemoteFile};
