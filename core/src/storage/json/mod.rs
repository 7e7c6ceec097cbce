//! # JSON File Storage
//!
//! Stores the complete application snapshot as a single JSON document in the
//! data directory, under the fixed `finance-app-state-v1.json` key. The file
//! is rewritten in full on every save (the snapshot is small), atomically via
//! a temp file and rename.

pub mod connection;
pub mod snapshot_repository;

pub use connection::JsonConnection;
pub use snapshot_repository::SnapshotRepository;
