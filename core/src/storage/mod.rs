//! # Storage Module
//!
//! Handles all data persistence for the bill tracker.
//!
//! The unit of persistence is the complete application snapshot (members,
//! categories, defaults, bills). Backends implement a small trait so the
//! mechanism can be swapped without touching the domain layer.
//!
//! ## Key Responsibilities
//!
//! - **Write-through persistence**: the domain saves the full snapshot after
//!   every mutation
//! - **Tolerant rehydration**: missing or malformed stored data loads as
//!   absent, never as a startup failure
//! - **Storage abstraction**: JSON file backend for real use, in-memory
//!   backend for tests and ephemeral sessions
//!
//! ## Design Principles
//!
//! - **Repository pattern**: the domain depends on the [`traits::SnapshotStorage`]
//!   abstraction, not on a concrete backend
//! - **Atomic writes**: the file backend replaces the snapshot via temp file
//!   and rename so readers never observe a partial write

pub mod json;
pub mod memory;
pub mod traits;

// Re-export the main types that other modules need
pub use json::{JsonConnection, SnapshotRepository};
pub use memory::MemorySnapshotStorage;
pub use traits::{Connection, PersistenceError, SnapshotStorage};
