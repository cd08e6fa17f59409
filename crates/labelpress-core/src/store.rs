// crates/labelpress-core/src/store.rs
// ============================================================================
// Module: Labelpress In-Memory Store
// Description: Simple in-memory record store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of [`RecordStore`]
//! for tests and local demos. It mirrors the ordering and atomicity contract
//! of the durable backends but is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use crate::core::LogisticsRecord;
use crate::core::RecordId;
use crate::core::RmaRecord;
use crate::interfaces::RecordStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Mutable table state for one record kind.
#[derive(Debug)]
struct Table<T> {
    /// Rows in insertion order.
    rows: Vec<T>,
    /// Last assigned identifier value.
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            last_id: 0,
        }
    }
}

/// In-memory record store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    /// Logistics rows protected by a mutex.
    logistics: Arc<Mutex<Table<LogisticsRecord>>>,
    /// RMA rows protected by a mutex.
    rmas: Arc<Mutex<Table<RmaRecord>>>,
}

impl InMemoryRecordStore {
    /// Creates a new in-memory record store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Assigns the next identifier for a table.
fn next_id(last_id: &mut i64) -> Result<RecordId, StoreError> {
    let next = last_id
        .checked_add(1)
        .ok_or_else(|| StoreError::Unknown("record id overflow".to_string()))?;
    *last_id = next;
    RecordId::from_raw(next).ok_or_else(|| StoreError::Unknown("record id underflow".to_string()))
}

/// Sorts and truncates rows per the recent-query contract.
fn recent_rows<T, K>(rows: &[T], limit: usize, key: K) -> Vec<T>
where
    T: Clone,
    K: Fn(&T) -> (i64, i64),
{
    let mut sorted: Vec<T> = rows.to_vec();
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted.truncate(limit);
    sorted
}

impl RecordStore for InMemoryRecordStore {
    fn insert_logistics(&self, record: &LogisticsRecord) -> Result<RecordId, StoreError> {
        record.validate().map_err(|err| StoreError::ConstraintViolation(err.to_string()))?;
        let mut guard = self
            .logistics
            .lock()
            .map_err(|_| StoreError::Unknown("record store mutex poisoned".to_string()))?;
        let id = next_id(&mut guard.last_id)?;
        let mut row = record.clone();
        row.id = Some(id);
        guard.rows.push(row);
        drop(guard);
        Ok(id)
    }

    fn insert_rma(&self, record: &RmaRecord) -> Result<RecordId, StoreError> {
        record.validate().map_err(|err| StoreError::ConstraintViolation(err.to_string()))?;
        let mut guard = self
            .rmas
            .lock()
            .map_err(|_| StoreError::Unknown("record store mutex poisoned".to_string()))?;
        let id = next_id(&mut guard.last_id)?;
        let mut row = record.clone();
        row.id = Some(id);
        guard.rows.push(row);
        drop(guard);
        Ok(id)
    }

    fn recent_logistics(&self, limit: usize) -> Result<Vec<LogisticsRecord>, StoreError> {
        let guard = self
            .logistics
            .lock()
            .map_err(|_| StoreError::Unknown("record store mutex poisoned".to_string()))?;
        Ok(recent_rows(&guard.rows, limit, |row| {
            (row.created_at.as_unix_millis(), row.id.map_or(0, RecordId::get))
        }))
    }

    fn recent_rma(&self, limit: usize) -> Result<Vec<RmaRecord>, StoreError> {
        let guard = self
            .rmas
            .lock()
            .map_err(|_| StoreError::Unknown("record store mutex poisoned".to_string()))?;
        Ok(recent_rows(&guard.rows, limit, |row| {
            (row.created_at.as_unix_millis(), row.id.map_or(0, RecordId::get))
        }))
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared record store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedRecordStore {
    /// Inner store implementation.
    inner: Arc<dyn RecordStore + Send + Sync>,
}

impl SharedRecordStore {
    /// Wraps a record store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl RecordStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn RecordStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl RecordStore for SharedRecordStore {
    fn insert_logistics(&self, record: &LogisticsRecord) -> Result<RecordId, StoreError> {
        self.inner.insert_logistics(record)
    }

    fn insert_rma(&self, record: &RmaRecord) -> Result<RecordId, StoreError> {
        self.inner.insert_rma(record)
    }

    fn recent_logistics(&self, limit: usize) -> Result<Vec<LogisticsRecord>, StoreError> {
        self.inner.recent_logistics(limit)
    }

    fn recent_rma(&self, limit: usize) -> Result<Vec<RmaRecord>, StoreError> {
        self.inner.recent_rma(limit)
    }
}
