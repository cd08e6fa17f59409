// crates/labelpress-core/src/payload.rs
// ============================================================================
// Module: Labelpress Payload Encoder
// Description: Canonical colon-delimited QR payload encoding for label records.
// Purpose: Turn validated records plus a timestamp into deterministic payloads.
// Dependencies: crate::core, time
// ============================================================================

//! ## Overview
//! The payload encoder turns a validated record and a caller-supplied
//! timestamp into the single-line string encoded into a QR image. Encoding is
//! a pure function: identical record and timestamp always yield an identical
//! payload, and no side effects occur.
//!
//! Free-text fields (SKU, RMA number, serial numbers, custom bulk labels) are
//! NOT escaped when they themselves contain colons. This is an accepted
//! ambiguity of the wire format carried over for compatibility; consumers
//! that split on `:` must treat such payloads as ambiguous.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::core::LogisticsRecord;
use crate::core::RmaRecord;
use crate::core::Timestamp;
use crate::core::ValidationError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Payload prefix for bulk logistics labels.
pub const LOGISTICS_PREFIX: &str = "BULK";
/// Payload prefix for RMA labels.
pub const RMA_PREFIX: &str = "RMA";
/// Payload format version field.
pub const PAYLOAD_VERSION: &str = "V1";
/// Field separator for payload segments.
const FIELD_SEPARATOR: &str = ":";
/// Suffix appended to the bulk count field on RMA labels.
const BULK_COUNT_SUFFIX: &str = " Bultos";

/// Day-first, 24-hour stamp layout rendered into label payloads.
///
/// The rendered form still contains `/` and `:`; both are replaced with `-`
/// before the stamp enters the colon-delimited payload.
const STAMP_LAYOUT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year], [hour]:[minute]:[second]");

// ============================================================================
// SECTION: Timestamp Rendering
// ============================================================================

/// Renders a timestamp into the bracketed, colon-safe label stamp.
///
/// The stamp is locale-fixed: day-first date, 24-hour clock, UTC. Every `/`
/// and `:` in the rendered form is replaced with `-` so the stamp stays
/// colon-safe inside the payload, e.g. `[07-08-2026, 14-30-45]`.
///
/// # Errors
///
/// Returns [`ValidationError::TimestampOutOfRange`] when the instant cannot
/// be represented as a civil date.
pub fn format_label_timestamp(at: Timestamp) -> Result<String, ValidationError> {
    let seconds = at.as_unix_millis().div_euclid(1_000);
    let instant = OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|_| ValidationError::TimestampOutOfRange)?;
    let rendered =
        instant.format(STAMP_LAYOUT).map_err(|_| ValidationError::TimestampOutOfRange)?;
    Ok(format!("[{}]", rendered.replace(['/', ':'], "-")))
}

// ============================================================================
// SECTION: Encoders
// ============================================================================

/// Encodes a logistics record into its QR payload.
///
/// Produces `BULK:V1:<sku>:<count>:<serial>...:[<stamp>]` where `<count>` is
/// the serial count zero-padded to at least two digits.
///
/// # Errors
///
/// Returns [`ValidationError`] when the record fails validation or the
/// timestamp cannot be rendered.
pub fn encode_logistics(record: &LogisticsRecord, at: Timestamp) -> Result<String, ValidationError> {
    record.validate()?;
    let stamp = format_label_timestamp(at)?;
    let mut fields = Vec::with_capacity(record.serial_numbers.len() + 5);
    fields.push(LOGISTICS_PREFIX.to_string());
    fields.push(PAYLOAD_VERSION.to_string());
    fields.push(record.sku.clone());
    fields.push(format!("{:02}", record.serial_numbers.len()));
    fields.extend(record.serial_numbers.iter().cloned());
    fields.push(stamp);
    Ok(fields.join(FIELD_SEPARATOR))
}

/// Encodes an RMA record into its QR payload.
///
/// Produces `RMA:V1:<rma>:<pallet>:<packaging>:<condition>:<bulk> Bultos:[<stamp>]`
/// using the human-readable label form of each field.
///
/// # Errors
///
/// Returns [`ValidationError`] when the record fails validation or the
/// timestamp cannot be rendered.
pub fn encode_rma(record: &RmaRecord, at: Timestamp) -> Result<String, ValidationError> {
    record.validate()?;
    let stamp = format_label_timestamp(at)?;
    let fields = [
        RMA_PREFIX.to_string(),
        PAYLOAD_VERSION.to_string(),
        record.rma_number.clone(),
        record.pallet.label().to_string(),
        record.packaging_type.label().to_string(),
        record.packaging_condition.label().to_string(),
        format!("{}{BULK_COUNT_SUFFIX}", record.bulk_count.label()),
        stamp,
    ];
    Ok(fields.join(FIELD_SEPARATOR))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
