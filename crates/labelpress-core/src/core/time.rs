// crates/labelpress-core/src/core/time.rs
// ============================================================================
// Module: Labelpress Time Model
// Description: Canonical timestamp representation for label records.
// Purpose: Provide deterministic, replayable time values across Labelpress records.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Labelpress uses explicit time values embedded in records and payloads to
//! keep encoding deterministic. The core never reads wall-clock time; hosts
//! (the HTTP server, the CLI) capture the current instant at the boundary and
//! pass it in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in Labelpress records and payloads.
///
/// # Invariants
/// - Values are unix epoch milliseconds, explicitly provided by callers.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }
}
