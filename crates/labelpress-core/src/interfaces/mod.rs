// crates/labelpress-core/src/interfaces/mod.rs
// ============================================================================
// Module: Labelpress Interfaces
// Description: Backend-agnostic storage contract for label records.
// Purpose: Define the record store surface used by Labelpress hosts.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Labelpress integrates with persistence backends
//! without embedding backend-specific details. Implementations must keep
//! inserts atomic per record and never retry internally; retry policy belongs
//! to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::LogisticsRecord;
use crate::core::RecordId;
use crate::core::RmaRecord;

// ============================================================================
// SECTION: Record Store
// ============================================================================

/// Default number of records returned by recent queries.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Record store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the call timed out.
    #[error("record store connection failed: {0}")]
    ConnectionFailed(String),
    /// A storage constraint rejected the record.
    #[error("record store constraint violation: {0}")]
    ConstraintViolation(String),
    /// The store reported an unclassified error.
    #[error("record store error: {0}")]
    Unknown(String),
}

/// Record store for label event persistence.
///
/// # Invariants
/// - Inserts are atomic per record: the row and its serialized lists commit
///   together or not at all.
/// - Recent queries return at most `limit` records ordered by creation time
///   descending, ties broken by identifier descending.
pub trait RecordStore {
    /// Inserts a logistics record and returns the assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    fn insert_logistics(&self, record: &LogisticsRecord) -> Result<RecordId, StoreError>;

    /// Inserts an RMA record and returns the assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    fn insert_rma(&self, record: &RmaRecord) -> Result<RecordId, StoreError>;

    /// Lists the most recent logistics records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn recent_logistics(&self, limit: usize) -> Result<Vec<LogisticsRecord>, StoreError>;

    /// Lists the most recent RMA records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn recent_rma(&self, limit: usize) -> Result<Vec<RmaRecord>, StoreError>;
}
