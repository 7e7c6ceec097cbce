//! # Domain Module
//!
//! Contains all business logic for the bill tracker application.
//!
//! This module encapsulates the core business rules, entities, and services
//! that define how bills are modeled, projected onto the calendar, and
//! managed. It operates independently of any specific UI framework or
//! storage mechanism.
//!
//! ## Module Organization
//!
//! - **app_store**: In-memory application state with write-through persistence
//! - **bill_service**: Bill CRUD operations, paid toggling and form validation
//! - **calendar**: Month grid generation and date-based bill organization
//! - **report_service**: Search, due-status partitioning and monthly totals
//! - **settings_service**: Household members, categories and reminder defaults
//! - **export_service**: Snapshot export and import
//!
//! ## Key Responsibilities
//!
//! - **Bill Management**: Creating, validating, and updating household bills
//! - **Calendar Projection**: Bucketing bills onto a six-week month grid
//! - **Derived Views**: Computing search results, totals and due-status splits
//! - **Data Validation**: Validating input data before any mutation
//! - **Persistence Orchestration**: Saving every accepted mutation immediately
//!
//! ## Design Principles
//!
//! - **Single Responsibility**: Each service has a focused purpose
//! - **Testability**: Pure projections and clear interfaces for easy testing
//! - **Storage Agnostic**: Works with any snapshot storage implementation
//! - **UI Agnostic**: Business logic separate from presentation concerns

pub mod app_store;
pub mod bill_service;
pub mod calendar;
pub mod export_service;
pub mod report_service;
pub mod settings_service;

pub use app_store::*;
pub use bill_service::*;
pub use calendar::*;
pub use export_service::*;
pub use report_service::*;
pub use settings_service::*;
