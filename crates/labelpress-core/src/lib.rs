// crates/labelpress-core/src/lib.rs
// ============================================================================
// Module: Labelpress Core Library
// Description: Public API surface for the Labelpress core.
// Purpose: Expose record types, the payload encoder, and store interfaces.
// Dependencies: crate::{core, interfaces, payload, store}
// ============================================================================

//! ## Overview
//! Labelpress core defines the label record model, the colon-delimited QR
//! payload encoder, and the record store contract shared by all backends. It
//! is transport-agnostic and performs no I/O; hosts supply timestamps and
//! storage implementations through explicit interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod payload;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::DEFAULT_RECENT_LIMIT;
pub use interfaces::RecordStore;
pub use interfaces::StoreError;
pub use payload::LOGISTICS_PREFIX;
pub use payload::PAYLOAD_VERSION;
pub use payload::RMA_PREFIX;
pub use payload::encode_logistics;
pub use payload::encode_rma;
pub use payload::format_label_timestamp;
pub use store::InMemoryRecordStore;
pub use store::SharedRecordStore;
