use log::{debug, warn};
use shared::AppSnapshot;
use std::fs;

use super::connection::JsonConnection;
use crate::storage::traits::{PersistenceError, SnapshotStorage};

/// JSON-file-backed snapshot repository.
///
/// The whole application snapshot is read and written as one document under
/// the connection's fixed file name. Writes go through a temporary file and
/// a rename so a crash mid-write never leaves a truncated snapshot behind.
#[derive(Clone)]
pub struct SnapshotRepository {
    connection: JsonConnection,
}

impl SnapshotRepository {
    /// Create a new repository over the given connection
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    /// Serialize the snapshot and replace the previous file atomically
    fn write_snapshot_to_file(&self, snapshot: &AppSnapshot) -> Result<(), PersistenceError> {
        self.connection.ensure_data_directory_exists()?;

        let file_path = self.connection.snapshot_file_path();
        let json = serde_json::to_string(snapshot)?;

        // Create a temporary file for atomic write
        let temp_path = file_path.with_extension("tmp");
        fs::write(&temp_path, json)?;

        // Atomic move from temp to final file
        fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl SnapshotStorage for SnapshotRepository {
    fn save(&self, snapshot: &AppSnapshot) -> Result<(), PersistenceError> {
        self.write_snapshot_to_file(snapshot)?;
        debug!(
            "Saved snapshot to {}",
            self.connection.snapshot_file_path().display()
        );
        Ok(())
    }

    fn load(&self) -> Result<Option<AppSnapshot>, PersistenceError> {
        let file_path = self.connection.snapshot_file_path();

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path)?;
        match serde_json::from_str(&contents) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                // Malformed data is treated as absent, not fatal
                warn!(
                    "Ignoring malformed snapshot at {}: {}",
                    file_path.display(),
                    e
                );
                Ok(None)
            }
        }
    }
}
