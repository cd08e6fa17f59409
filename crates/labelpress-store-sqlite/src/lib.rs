// crates/labelpress-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Durable RecordStore backend using SQLite WAL.
// Purpose: Provide production persistence for Labelpress label records.
// Dependencies: labelpress-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`labelpress_core::RecordStore`]
//! implementation persisting label records with ordered JSON list columns.
//! All statements bind parameters; no SQL is built from record values.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::JsonRow;
pub use store::SqliteRecordStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
