//! Snapshot exchange: JSON export for backup and import to restore.
//!
//! Export serializes the full application snapshot pretty-printed; import
//! parses the whole document before touching state, so a malformed file
//! changes nothing. Writing to disk reports failures in the response rather
//! than as errors, since a bad path is a user-input problem.

use anyhow::{Context, Result};
use log::{error, info};
use shared::{AppSnapshot, ExportToPathResponse, ExportedSnapshot, ImportSummary};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::app_store::AppStore;

/// Why an import was rejected
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read snapshot file: {0}")]
    Io(#[from] std::io::Error),
}

/// Service responsible for snapshot export and import
#[derive(Clone)]
pub struct ExportService {
    store: Arc<AppStore>,
}

impl ExportService {
    pub fn new(store: Arc<AppStore>) -> Self {
        Self { store }
    }

    /// Serialize the current snapshot for download. The suggested filename
    /// carries today's date, e.g. `bills-2024-03-16.json`.
    pub fn export_snapshot(&self) -> Result<ExportedSnapshot> {
        let snapshot = self.store.snapshot();
        let bill_count = snapshot.bills.as_ref().map(|b| b.len()).unwrap_or(0);
        let content = serde_json::to_string_pretty(&snapshot)
            .context("Failed to serialize snapshot for export")?;
        let filename = format!("bills-{}.json", chrono::Local::now().format("%Y-%m-%d"));

        info!(
            "📄 EXPORT: Generated snapshot with {} bills ({} bytes) as {}",
            bill_count,
            content.len(),
            filename
        );

        Ok(ExportedSnapshot {
            content,
            filename,
            bill_count,
        })
    }

    /// Write the export to a directory on disk.
    ///
    /// A custom path is sanitized first (quotes, tilde, trailing slashes);
    /// without one the file goes to Documents, falling back to the home
    /// directory.
    pub fn export_to_path(&self, custom_path: Option<String>) -> Result<ExportToPathResponse> {
        info!("📁 EXPORT: Exporting to path - custom_path: {:?}", custom_path);

        let export = self.export_snapshot()?;

        let export_dir = match custom_path {
            Some(path) if !path.trim().is_empty() => PathBuf::from(self.sanitize_path(&path)),
            _ => match dirs::document_dir().or_else(dirs::home_dir) {
                Some(dir) => dir,
                None => {
                    error!("❌ EXPORT: Could not determine default export directory");
                    return Ok(ExportToPathResponse {
                        success: false,
                        message: "Failed to determine export directory".to_string(),
                        file_path: String::new(),
                        bill_count: 0,
                    });
                }
            },
        };

        if let Err(e) = fs::create_dir_all(&export_dir) {
            error!("❌ EXPORT: Failed to create export directory {:?}: {}", export_dir, e);
            return Ok(ExportToPathResponse {
                success: false,
                message: format!("Failed to create export directory: {}", e),
                file_path: export_dir.to_string_lossy().to_string(),
                bill_count: 0,
            });
        }

        let file_path = export_dir.join(&export.filename);
        match fs::write(&file_path, &export.content) {
            Ok(_) => {
                let file_path_str = file_path.to_string_lossy().to_string();
                info!(
                    "✅ EXPORT: Successfully exported {} bills to: {}",
                    export.bill_count, file_path_str
                );
                Ok(ExportToPathResponse {
                    success: true,
                    message: format!("File exported successfully to: {}", file_path_str),
                    file_path: file_path_str,
                    bill_count: export.bill_count,
                })
            }
            Err(e) => {
                error!("❌ EXPORT: Failed to write export file to {:?}: {}", file_path, e);
                Ok(ExportToPathResponse {
                    success: false,
                    message: format!("Failed to write export file: {}", e),
                    file_path: file_path.to_string_lossy().to_string(),
                    bill_count: 0,
                })
            }
        }
    }

    /// Parse an exported snapshot and merge it into the store.
    ///
    /// Only the fields present in the document are replaced; absent fields
    /// keep their current values. The merged result persists immediately.
    pub fn import_snapshot(&self, content: &str) -> Result<ImportSummary, ImportError> {
        let snapshot: AppSnapshot = serde_json::from_str(content)?;
        let bill_count = snapshot.bills.as_ref().map(|b| b.len()).unwrap_or(0);

        self.store.merge_snapshot(snapshot);
        info!("✅ IMPORT: Merged snapshot with {} bills", bill_count);

        Ok(ImportSummary {
            success_message: format!("Imported {} bills", bill_count),
            bill_count,
        })
    }

    /// Read a snapshot file from disk and import it
    pub fn import_from_path<P: AsRef<Path>>(&self, path: P) -> Result<ImportSummary, ImportError> {
        info!("📁 IMPORT: Reading snapshot from {}", path.as_ref().display());
        let content = fs::read_to_string(path)?;
        self.import_snapshot(&content)
    }

    /// Basic path sanitization to handle common user input issues
    fn sanitize_path(&self, path: &str) -> String {
        let mut cleaned = path.trim().to_string();

        // Remove surrounding quotes (single or double)
        if (cleaned.starts_with('"') && cleaned.ends_with('"'))
            || (cleaned.starts_with('\'') && cleaned.ends_with('\''))
        {
            cleaned = cleaned[1..cleaned.len() - 1].to_string();
        }

        cleaned = cleaned.trim().to_string();

        // Handle escaped spaces (common on some systems)
        cleaned = cleaned.replace("\\ ", " ");

        while cleaned.ends_with('/') || cleaned.ends_with('\\') {
            cleaned.pop();
        }

        // Tilde expansion for home directory
        if cleaned.starts_with('~') {
            if let Some(home) = dirs::home_dir() {
                if cleaned == "~" {
                    cleaned = home.to_string_lossy().to_string();
                } else if cleaned.starts_with("~/") || cleaned.starts_with("~\\") {
                    cleaned = home.join(&cleaned[2..]).to_string_lossy().to_string();
                }
            }
        }

        cleaned
    }
}
