// crates/labelpress-core/src/payload/tests.rs
// ============================================================================
// Module: Payload Encoder Unit Tests
// Description: Unit coverage for the colon-delimited payload encoder.
// Purpose: Ensure deterministic encoding and fail-closed validation.
// Dependencies: labelpress-core
// ============================================================================

//! ## Overview
//! Unit tests for payload grammar, stamp rendering, and validation ordering.
//! Encoding must be deterministic and must fail before any side effect when
//! required fields are missing.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::BulkCount;
use crate::core::LogisticsRecord;
use crate::core::PackagingCondition;
use crate::core::PackagingType;
use crate::core::PalletChoice;
use crate::core::RecordImage;
use crate::core::RmaRecord;
use crate::core::Timestamp;
use crate::core::ValidationError;
use crate::payload::encode_logistics;
use crate::payload::encode_rma;
use crate::payload::format_label_timestamp;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// 2026-08-07 14:30:45 UTC in unix milliseconds.
const SAMPLE_MILLIS: i64 = 1_786_113_045_000;

fn sample_logistics() -> LogisticsRecord {
    LogisticsRecord {
        id: None,
        sku: "ABC123".to_string(),
        serial_numbers: vec!["SN1".to_string(), "SN2".to_string()],
        created_at: Timestamp::from_unix_millis(SAMPLE_MILLIS),
    }
}

fn sample_rma() -> RmaRecord {
    RmaRecord {
        id: None,
        rma_number: "R100".to_string(),
        pallet: PalletChoice::Pallet,
        packaging_type: PackagingType::Original,
        packaging_condition: PackagingCondition::Bueno,
        bulk_count: BulkCount::parse("two").unwrap(),
        images: vec![RecordImage {
            url: "data:image/jpeg;base64,AAAA".to_string(),
            content_type: "image/jpeg".to_string(),
            name: "product.jpg".to_string(),
        }],
        created_at: Timestamp::from_unix_millis(SAMPLE_MILLIS),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn stamp_renders_day_first_colon_safe() {
    let stamp = format_label_timestamp(Timestamp::from_unix_millis(SAMPLE_MILLIS)).unwrap();
    assert_eq!(stamp, "[07-08-2026, 14-30-45]");
}

#[test]
fn stamp_renders_epoch() {
    let stamp = format_label_timestamp(Timestamp::from_unix_millis(0)).unwrap();
    assert_eq!(stamp, "[01-01-1970, 00-00-00]");
}

#[test]
fn stamp_truncates_sub_second_precision() {
    let stamp = format_label_timestamp(Timestamp::from_unix_millis(999)).unwrap();
    assert_eq!(stamp, "[01-01-1970, 00-00-00]");
}

#[test]
fn logistics_payload_matches_grammar() {
    let record = sample_logistics();
    let payload = encode_logistics(&record, record.created_at).unwrap();
    assert_eq!(payload, "BULK:V1:ABC123:02:SN1:SN2:[07-08-2026, 14-30-45]");
}

#[test]
fn logistics_count_grows_past_two_digits() {
    let mut record = sample_logistics();
    record.serial_numbers = (1..=100).map(|n| format!("SN{n}")).collect();
    let payload = encode_logistics(&record, record.created_at).unwrap();
    assert!(payload.starts_with("BULK:V1:ABC123:100:SN1:"));
}

#[test]
fn rma_payload_matches_grammar() {
    let record = sample_rma();
    let payload = encode_rma(&record, record.created_at).unwrap();
    assert_eq!(payload, "RMA:V1:R100:Pallet:Original:Bueno:2 Bultos:[07-08-2026, 14-30-45]");
}

#[test]
fn rma_payload_uses_spanish_packaging_labels() {
    let mut record = sample_rma();
    record.pallet = PalletChoice::NoPallet;
    record.packaging_type = PackagingType::SinEmbalaje;
    record.packaging_condition = PackagingCondition::Malo;
    let payload = encode_rma(&record, record.created_at).unwrap();
    assert_eq!(payload, "RMA:V1:R100:No Pallet:Sin embalaje:Malo:2 Bultos:[07-08-2026, 14-30-45]");
}

#[test]
fn encoding_is_deterministic() {
    let record = sample_rma();
    let first = encode_rma(&record, record.created_at).unwrap();
    let second = encode_rma(&record, record.created_at).unwrap();
    assert_eq!(first, second);
}

#[test]
fn colons_in_free_text_are_not_escaped() {
    let mut record = sample_logistics();
    record.sku = "AB:C".to_string();
    let payload = encode_logistics(&record, record.created_at).unwrap();
    assert!(payload.starts_with("BULK:V1:AB:C:02:"));
}

#[test]
fn empty_sku_is_rejected() {
    let mut record = sample_logistics();
    record.sku = "   ".to_string();
    let result = encode_logistics(&record, record.created_at);
    assert_eq!(result, Err(ValidationError::EmptySku));
}

#[test]
fn empty_serial_list_is_rejected() {
    let mut record = sample_logistics();
    record.serial_numbers.clear();
    let result = encode_logistics(&record, record.created_at);
    assert_eq!(result, Err(ValidationError::NoSerialNumbers));
}

#[test]
fn blank_serial_entry_is_rejected() {
    let mut record = sample_logistics();
    record.serial_numbers.push(" ".to_string());
    let result = encode_logistics(&record, record.created_at);
    assert_eq!(
        result,
        Err(ValidationError::BlankSerialNumber {
            position: 3,
        })
    );
}

#[test]
fn missing_images_are_rejected() {
    let mut record = sample_rma();
    record.images.clear();
    let result = encode_rma(&record, record.created_at);
    assert_eq!(result, Err(ValidationError::NoImages));
}

#[test]
fn custom_bulk_count_is_rendered_verbatim() {
    let mut record = sample_rma();
    record.bulk_count = BulkCount::parse("media paleta").unwrap();
    let payload = encode_rma(&record, record.created_at).unwrap();
    assert!(payload.contains(":media paleta Bultos:"));
}
