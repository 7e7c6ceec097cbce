//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! snapshot backends to be used interchangeably by the domain layer.

use shared::AppSnapshot;
use thiserror::Error;

/// Errors surfaced by snapshot storage backends.
///
/// These never abort a mutation: the app store logs save failures and the
/// session continues in memory-only mode.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Trait defining the interface for snapshot storage operations
///
/// This trait abstracts away the specific storage implementation details,
/// allowing the domain layer to persist the full application snapshot
/// without knowing where it lands (JSON file, in-memory fake, etc.).
pub trait SnapshotStorage: Send + Sync {
    /// Persist the complete snapshot under the backend's fixed key.
    /// Invoked write-through after every mutation.
    fn save(&self, snapshot: &AppSnapshot) -> Result<(), PersistenceError>;

    /// Load the stored snapshot, if any.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet. Backends also
    /// map malformed stored data to `Ok(None)`, treating it as absent rather
    /// than fatal to startup.
    fn load(&self) -> Result<Option<AppSnapshot>, PersistenceError>;
}

/// Trait defining the interface for storage connections
///
/// Abstracts the connection type and provides a factory for the snapshot
/// repository, so the initialization path works with any backend.
pub trait Connection: Send + Sync + Clone {
    /// The type of SnapshotStorage this connection creates
    type SnapshotRepository: SnapshotStorage;

    /// Create a new snapshot repository for this connection
    fn create_snapshot_repository(&self) -> Self::SnapshotRepository;
}
