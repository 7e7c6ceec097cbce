//! # Bill Tracker Core
//!
//! Contains all non-UI logic for the bill tracker application.
//!
//! This crate serves as the orchestration layer that brings together:
//! - **Domain**: Business logic and rules for bill and household management
//! - **Storage**: Snapshot persistence on the local file system
//!
//! The core is designed to be UI-agnostic, meaning it could support
//! different frontend frameworks or even CLI interfaces without
//! modification.
//!
//! ## Architecture
//!
//! The crate follows a layered architecture:
//! ```text
//! UI Layer (any frontend)
//!     ↓
//! Domain Layer (Business logic, services)
//!     ↓
//! Storage Layer (JSON snapshot, persistence)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Rehydrate the stored snapshot on startup
//! - Coordinate between domain logic and data persistence

pub mod domain;
pub mod storage;

use anyhow::Result;
use log::info;
use std::path::Path;
use std::sync::Arc;

pub use domain::*;
pub use storage::*;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub bill_service: BillService,
    pub calendar_service: CalendarService,
    pub report_service: ReportService,
    pub settings_service: SettingsService,
    pub export_service: ExportService,
}

/// Initialize the application with all required services, storing data in
/// the default platform directory
pub fn initialize_app() -> Result<AppState> {
    info!("Setting up storage");
    let connection = JsonConnection::new_default()?;
    let repository = connection.create_snapshot_repository();
    Ok(initialize_app_with_storage(Arc::new(repository)))
}

/// Initialize the application with data stored under the given directory
pub fn initialize_app_at<P: AsRef<Path>>(base_directory: P) -> Result<AppState> {
    info!(
        "Setting up storage at {}",
        base_directory.as_ref().display()
    );
    let connection = JsonConnection::new(base_directory)?;
    let repository = connection.create_snapshot_repository();
    Ok(initialize_app_with_storage(Arc::new(repository)))
}

/// Initialize the application on top of an arbitrary snapshot storage
pub fn initialize_app_with_storage(storage: Arc<dyn SnapshotStorage>) -> AppState {
    info!("Setting up domain model");
    let store = Arc::new(AppStore::new(storage));

    let bill_service = BillService::new(store.clone());
    let calendar_service = CalendarService::new();
    let report_service = ReportService::new();
    let settings_service = SettingsService::new(store.clone());
    let export_service = ExportService::new(store);

    info!("Setting up application state");
    AppState {
        bill_service,
        calendar_service,
        report_service,
        settings_service,
        export_service,
    }
}
