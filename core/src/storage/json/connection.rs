use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::storage::traits::Connection;

/// The fixed namespaced key the snapshot is stored under.
/// The `v1` suffix is the schema namespace; the snapshot itself is unversioned.
pub const SNAPSHOT_FILE_NAME: &str = "finance-app-state-v1.json";

/// JsonConnection manages the data directory and the snapshot file path
#[derive(Clone)]
pub struct JsonConnection {
    base_directory: Arc<Mutex<PathBuf>>,
}

impl JsonConnection {
    /// Create a new JSON connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: Arc::new(Mutex::new(base_path)),
        })
    }

    /// Create a new JSON connection in the default data directory
    /// (the platform Documents folder, falling back to the home directory)
    pub fn new_default() -> Result<Self> {
        let base_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;

        let data_dir = base_dir.join("Bill Tracker");
        info!("Using data directory: {}", data_dir.display());

        Self::new(data_dir)
    }

    /// Get the path of the snapshot file
    pub fn snapshot_file_path(&self) -> PathBuf {
        let base_dir = self.base_directory.lock().unwrap();
        base_dir.join(SNAPSHOT_FILE_NAME)
    }

    /// Ensure the data directory exists before a write
    pub fn ensure_data_directory_exists(&self) -> Result<(), std::io::Error> {
        let base_dir = self.base_directory.lock().unwrap();
        if !base_dir.exists() {
            fs::create_dir_all(&*base_dir)?;
        }
        Ok(())
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> PathBuf {
        let base_dir = self.base_directory.lock().unwrap();
        base_dir.clone()
    }

    /// Clean up the data directory (useful for tests)
    #[cfg(test)]
    pub fn cleanup(&self) -> Result<()> {
        let base_dir = self.base_directory.lock().unwrap();
        if base_dir.exists() {
            fs::remove_dir_all(&*base_dir)?;
        }
        Ok(())
    }
}

impl Connection for JsonConnection {
    type SnapshotRepository = super::snapshot_repository::SnapshotRepository;

    fn create_snapshot_repository(&self) -> Self::SnapshotRepository {
        super::snapshot_repository::SnapshotRepository::new(self.clone())
    }
}
