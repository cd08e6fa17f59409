// crates/labelpress-core/src/core/identifiers.rs
// ============================================================================
// Module: Labelpress Identifiers
// Description: Canonical identifiers for persisted label records.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the record identifier used throughout Labelpress.
//! Identifiers are assigned by the backing store's auto-increment column and
//! serialize as plain numbers on the wire. The non-zero, 1-based invariant is
//! enforced at construction boundaries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroI64;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Identifier of a persisted label record.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based, store-assigned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(NonZeroI64);

impl RecordId {
    /// Creates a new record identifier from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroI64) -> Self {
        Self(id)
    }

    /// Creates a record identifier from a raw value (returns `None` if zero or negative).
    #[must_use]
    pub fn from_raw(raw: i64) -> Option<Self> {
        if raw < 1 {
            return None;
        }
        NonZeroI64::new(raw).map(Self)
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0.get()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}
