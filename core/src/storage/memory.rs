//! In-memory snapshot storage.
//!
//! Used by tests and by hosts that want an ephemeral, non-durable session.

use shared::AppSnapshot;
use std::sync::Mutex;

use crate::storage::traits::{PersistenceError, SnapshotStorage};

/// In-memory implementation of [`SnapshotStorage`]
#[derive(Default)]
pub struct MemorySnapshotStorage {
    snapshot: Mutex<Option<AppSnapshot>>,
    save_count: Mutex<usize>,
}

impl MemorySnapshotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pre-populated, as if a previous session had persisted `snapshot`
    pub fn with_snapshot(snapshot: AppSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            save_count: Mutex::new(0),
        }
    }

    /// The most recently saved snapshot
    pub fn latest(&self) -> Option<AppSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    /// Number of saves observed, for write-through assertions
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }
}

impl SnapshotStorage for MemorySnapshotStorage {
    fn save(&self, snapshot: &AppSnapshot) -> Result<(), PersistenceError> {
        *self.snapshot.lock().unwrap() = Some(snapshot.clone());
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<AppSnapshot>, PersistenceError> {
        Ok(self.snapshot.lock().unwrap().clone())
    }
}
