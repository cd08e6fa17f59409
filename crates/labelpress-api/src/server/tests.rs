// crates/labelpress-api/src/server/tests.rs
// ============================================================================
// Module: API Server Unit Tests
// Description: Handler coverage against the in-memory record store.
// Purpose: Ensure boundary responses, validation ordering, and gating.
// Dependencies: labelpress-api, labelpress-core
// ============================================================================

//! ## Overview
//! Unit tests for the HTTP handlers. Validation failures must respond 400
//! before any store call, successful inserts return the persisted record, and
//! the raw query passthrough stays gated off by default.

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

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use labelpress_core::InMemoryRecordStore;
use labelpress_core::PackagingCondition;
use labelpress_core::PackagingType;
use labelpress_core::PalletChoice;
use labelpress_core::RecordImage;
use labelpress_core::RecordStore;
use labelpress_core::SharedRecordStore;
use serde_json::json;

use super::LogisticsSubmission;
use super::RawQueryRequest;
use super::RmaSubmission;
use super::ServerState;
use super::handle_recent_logistics;
use super::insert_logistics_response;
use super::insert_rma_response;
use super::raw_query_response;
use crate::telemetry::NullMetricSink;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn memory_state() -> (Arc<ServerState>, SharedRecordStore) {
    let store = SharedRecordStore::from_store(InMemoryRecordStore::new());
    let state =
        Arc::new(ServerState::new(store.clone(), None, false, Arc::new(NullMetricSink)));
    (state, store)
}

fn rma_submission(images: Vec<RecordImage>) -> RmaSubmission {
    RmaSubmission {
        rma: "R100".to_string(),
        is_pallet: PalletChoice::Pallet,
        packaging_type: PackagingType::Original,
        packaging_condition: PackagingCondition::Bueno,
        bulk_count: "two".to_string(),
        images,
    }
}

fn sample_image() -> RecordImage {
    RecordImage {
        url: "data:image/jpeg;base64,AAAA".to_string(),
        content_type: "image/jpeg".to_string(),
        name: "producto.jpg".to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn rma_insert_returns_persisted_record() {
    let (state, store) = memory_state();
    let (status, value) = insert_rma_response(&state, rma_submission(vec![sample_image()]));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["data"][0]["rma_number"], json!("R100"));
    assert_eq!(value["data"][0]["bulk_count"], json!("2"));
    assert_eq!(value["data"][0]["id"], json!(1));
    assert_eq!(store.recent_rma(10).unwrap().len(), 1);
}

#[test]
fn rma_insert_without_images_is_rejected_before_store() {
    let (state, store) = memory_state();
    let (status, value) = insert_rma_response(&state, rma_submission(Vec::new()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], json!("at least one image is required"));
    assert!(store.recent_rma(10).unwrap().is_empty());
}

#[test]
fn rma_insert_rejects_empty_bulk_count() {
    let (state, store) = memory_state();
    let mut submission = rma_submission(vec![sample_image()]);
    submission.bulk_count = "  ".to_string();
    let (status, _) = insert_rma_response(&state, submission);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.recent_rma(10).unwrap().is_empty());
}

#[test]
fn logistics_insert_succeeds() {
    let (state, store) = memory_state();
    let submission = LogisticsSubmission {
        sku: "ABC123".to_string(),
        serial_numbers: vec!["SN1".to_string(), "SN2".to_string()],
    };
    let (status, value) = insert_logistics_response(&state, submission);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({ "success": true }));
    let recent = store.recent_logistics(10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].serial_numbers, vec!["SN1", "SN2"]);
}

#[test]
fn logistics_insert_rejects_empty_sku() {
    let (state, store) = memory_state();
    let submission = LogisticsSubmission {
        sku: "  ".to_string(),
        serial_numbers: vec!["SN1".to_string()],
    };
    let (status, value) = insert_logistics_response(&state, submission);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], json!("sku must not be empty"));
    assert!(store.recent_logistics(10).unwrap().is_empty());
}

#[tokio::test]
async fn recent_logistics_returns_newest_first() {
    let (state, _) = memory_state();
    for sku in ["FIRST", "SECOND", "THIRD"] {
        let submission = LogisticsSubmission {
            sku: sku.to_string(),
            serial_numbers: vec!["SN1".to_string()],
        };
        let (status, _) = insert_logistics_response(&state, submission);
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = handle_recent_logistics(State(state)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.0.as_array().unwrap().clone();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["sku"], json!("THIRD"));
    assert_eq!(rows[2]["sku"], json!("FIRST"));
}

#[test]
fn raw_query_is_disabled_by_default() {
    let (state, _) = memory_state();
    let request = RawQueryRequest {
        query: "SELECT 1".to_string(),
    };
    let (status, value) = raw_query_response(&state, &request);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], json!("raw query endpoint is disabled"));
}

#[test]
fn raw_query_requires_sqlite_backend() {
    let store = SharedRecordStore::from_store(InMemoryRecordStore::new());
    let state = Arc::new(ServerState::new(store, None, true, Arc::new(NullMetricSink)));
    let request = RawQueryRequest {
        query: "SELECT 1".to_string(),
    };
    let (status, value) = raw_query_response(&state, &request);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"], json!("raw query requires the sqlite store"));
}
