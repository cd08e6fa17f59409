// crates/labelpress-core/src/core/mod.rs
// ============================================================================
// Module: Labelpress Core Types
// Description: Record model, identifiers, and time values for label events.
// Purpose: Group the canonical data model shared across Labelpress crates.
// Dependencies: crate::core::{identifiers, records, time}
// ============================================================================

//! ## Overview
//! The core module groups the canonical Labelpress data model: strongly typed
//! record identifiers, caller-supplied timestamps, and the two label record
//! kinds with their validation rules.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod identifiers;
pub mod records;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::RecordId;
pub use records::BulkCount;
pub use records::LogisticsRecord;
pub use records::PackagingCondition;
pub use records::PackagingType;
pub use records::PalletChoice;
pub use records::RecordImage;
pub use records::RmaRecord;
pub use records::ValidationError;
pub use time::Timestamp;
