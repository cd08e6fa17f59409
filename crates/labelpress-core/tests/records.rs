// crates/labelpress-core/tests/records.rs
// ============================================================================
// Module: Record Model Tests
// Description: Tests for record field enums, bulk counts, and wire forms.
// ============================================================================
//! ## Overview
//! Validates wire-form stability for record enums and the bulk count
//! resolution rules.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use labelpress_core::BulkCount;
use labelpress_core::PackagingCondition;
use labelpress_core::PackagingType;
use labelpress_core::PalletChoice;
use labelpress_core::RecordImage;
use labelpress_core::ValidationError;
use serde_json::json;

// ============================================================================
// SECTION: Wire Forms
// ============================================================================

#[test]
fn pallet_choice_uses_snake_case_wire_form() {
    let parsed: PalletChoice = serde_json::from_value(json!("no_pallet")).unwrap();
    assert_eq!(parsed, PalletChoice::NoPallet);
    assert_eq!(serde_json::to_value(PalletChoice::Pallet).unwrap(), json!("pallet"));
}

#[test]
fn packaging_type_uses_snake_case_wire_form() {
    let parsed: PackagingType = serde_json::from_value(json!("sin_embalaje")).unwrap();
    assert_eq!(parsed, PackagingType::SinEmbalaje);
    assert_eq!(serde_json::to_value(PackagingType::NoOriginal).unwrap(), json!("no_original"));
}

#[test]
fn packaging_condition_keeps_spanish_wire_form() {
    let parsed: PackagingCondition = serde_json::from_value(json!("Bueno")).unwrap();
    assert_eq!(parsed, PackagingCondition::Bueno);
    assert_eq!(serde_json::to_value(PackagingCondition::Malo).unwrap(), json!("Malo"));
}

#[test]
fn record_image_maps_type_field() {
    let image: RecordImage = serde_json::from_value(json!({
        "url": "data:image/png;base64,AAAA",
        "type": "image/png",
        "name": "caja.png"
    }))
    .unwrap();
    assert_eq!(image.content_type, "image/png");
    let value = serde_json::to_value(&image).unwrap();
    assert_eq!(value["type"], json!("image/png"));
}

// ============================================================================
// SECTION: Bulk Count Resolution
// ============================================================================

#[test]
fn bulk_count_resolves_selector_words() {
    let resolved = BulkCount::parse("two").unwrap();
    assert_eq!(resolved.label(), "2");
    let resolved = BulkCount::parse("Ten").unwrap();
    assert_eq!(resolved.label(), "10");
}

#[test]
fn bulk_count_resolves_numeric_strings() {
    let resolved = BulkCount::parse("12").unwrap();
    assert_eq!(resolved.label(), "12");
}

#[test]
fn bulk_count_keeps_custom_labels() {
    let resolved = BulkCount::parse("  media paleta ").unwrap();
    assert_eq!(resolved, BulkCount::Custom("media paleta".to_string()));
}

#[test]
fn bulk_count_rejects_empty_input() {
    assert_eq!(BulkCount::parse("   "), Err(ValidationError::EmptyBulkCount));
}

#[test]
fn bulk_count_rejects_zero() {
    assert_eq!(
        BulkCount::parse("0"),
        Err(ValidationError::InvalidBulkCount {
            value: "0".to_string(),
        })
    );
}

#[test]
fn bulk_count_round_trips_through_serde() {
    let resolved = BulkCount::parse("two").unwrap();
    let encoded = serde_json::to_value(&resolved).unwrap();
    assert_eq!(encoded, json!("2"));
    let decoded: BulkCount = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, resolved);
}
