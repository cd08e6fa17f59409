// crates/labelpress-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Store Tests
// Description: Validate SQLite RecordStore behavior.
// Purpose: Ensure durable persistence, ordering, and fail-closed schema checks.
// Dependencies: labelpress-store-sqlite, labelpress-core, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Conformance tests for the SQLite-backed record store. Exercises durable
//! persistence, recent-query ordering, lossless list round-trips, and schema
//! version fail-closed behavior.

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

use labelpress_core::BulkCount;
use labelpress_core::LogisticsRecord;
use labelpress_core::PackagingCondition;
use labelpress_core::PackagingType;
use labelpress_core::PalletChoice;
use labelpress_core::RecordImage;
use labelpress_core::RecordStore;
use labelpress_core::RmaRecord;
use labelpress_core::StoreError;
use labelpress_core::Timestamp;
use labelpress_store_sqlite::SqliteRecordStore;
use labelpress_store_sqlite::SqliteStoreConfig;
use labelpress_store_sqlite::SqliteStoreError;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn store_for(path: &std::path::Path) -> SqliteRecordStore {
    let config = SqliteStoreConfig {
        path: path.to_path_buf(),
        busy_timeout_ms: 1_000,
        journal_mode: labelpress_store_sqlite::SqliteStoreMode::Wal,
        sync_mode: labelpress_store_sqlite::SqliteSyncMode::Full,
    };
    SqliteRecordStore::new(config).expect("store init")
}

fn logistics_at(sku: &str, millis: i64) -> LogisticsRecord {
    LogisticsRecord {
        id: None,
        sku: sku.to_string(),
        serial_numbers: vec!["SN1".to_string(), "SN2".to_string()],
        created_at: Timestamp::from_unix_millis(millis),
    }
}

fn sample_rma(millis: i64) -> RmaRecord {
    RmaRecord {
        id: None,
        rma_number: "R100".to_string(),
        pallet: PalletChoice::Pallet,
        packaging_type: PackagingType::SinEmbalaje,
        packaging_condition: PackagingCondition::Regular,
        bulk_count: BulkCount::parse("dos cajas sueltas").unwrap(),
        images: vec![
            RecordImage {
                url: "data:image/jpeg;base64,AAAA".to_string(),
                content_type: "image/jpeg".to_string(),
                name: "frente.jpg".to_string(),
            },
            RecordImage {
                url: "data:image/jpeg;base64,BBBB".to_string(),
                content_type: "image/jpeg".to_string(),
                name: "dorso.jpg".to_string(),
            },
        ],
        created_at: Timestamp::from_unix_millis(millis),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn sqlite_store_roundtrips_logistics() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    let record = logistics_at("ABC123", 1_000);
    let id = store.insert_logistics(&record).unwrap();
    let recent = store.recent_logistics(10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, Some(id));
    assert_eq!(recent[0].sku, "ABC123");
    assert_eq!(recent[0].serial_numbers, vec!["SN1", "SN2"]);
    assert_eq!(recent[0].created_at, record.created_at);
}

#[test]
fn sqlite_store_roundtrips_rma_with_images() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    let record = sample_rma(2_000);
    store.insert_rma(&record).unwrap();
    let recent = store.recent_rma(10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].images, record.images);
    assert_eq!(recent[0].pallet, record.pallet);
    assert_eq!(recent[0].packaging_type, record.packaging_type);
    assert_eq!(recent[0].packaging_condition, record.packaging_condition);
    assert_eq!(recent[0].bulk_count, record.bulk_count);
}

#[test]
fn sqlite_store_persists_across_instances() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    {
        let store = store_for(&path);
        store.insert_logistics(&logistics_at("DURABLE", 1_000)).unwrap();
    }
    let store = store_for(&path);
    let recent = store.recent_logistics(10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].sku, "DURABLE");
}

#[test]
fn sqlite_store_orders_newest_first_with_id_tiebreak() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    store.insert_logistics(&logistics_at("OLD", 1_000)).unwrap();
    store.insert_logistics(&logistics_at("TIE-A", 2_000)).unwrap();
    store.insert_logistics(&logistics_at("TIE-B", 2_000)).unwrap();
    let recent = store.recent_logistics(10).unwrap();
    let skus: Vec<&str> = recent.iter().map(|row| row.sku.as_str()).collect();
    assert_eq!(skus, vec!["TIE-B", "TIE-A", "OLD"]);
}

#[test]
fn sqlite_store_respects_recent_limit() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    for index in 0..15 {
        store.insert_logistics(&logistics_at(&format!("SKU{index}"), index)).unwrap();
    }
    let recent = store.recent_logistics(10).unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].sku, "SKU14");
}

#[test]
fn sqlite_store_rejects_invalid_record_before_writing() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    let mut record = sample_rma(1_000);
    record.images.clear();
    let result = store.insert_rma(&record);
    assert!(matches!(result, Err(StoreError::ConstraintViolation(_))));
    assert!(store.recent_rma(10).unwrap().is_empty());
}

#[test]
fn sqlite_store_fails_closed_on_schema_version_mismatch() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.sqlite");
    {
        let store = store_for(&path);
        store.insert_logistics(&logistics_at("KEEP", 1_000)).unwrap();
    }
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection.execute("UPDATE store_meta SET version = 99", []).unwrap();
    }
    let config = SqliteStoreConfig {
        path,
        busy_timeout_ms: 1_000,
        journal_mode: labelpress_store_sqlite::SqliteStoreMode::Wal,
        sync_mode: labelpress_store_sqlite::SqliteSyncMode::Full,
    };
    let result = SqliteRecordStore::new(config);
    assert!(matches!(result, Err(SqliteStoreError::VersionMismatch(_))));
}

#[test]
fn raw_query_returns_json_rows() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    store.insert_logistics(&logistics_at("RAW", 1_000)).unwrap();
    let rows = store.raw_query("SELECT sku, created_at FROM logistics_records").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["sku"], serde_json::json!("RAW"));
    assert_eq!(rows[0]["created_at"], serde_json::json!(1_000));
}

#[test]
fn raw_query_surfaces_statement_errors() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("store.sqlite"));
    let result = store.raw_query("SELECT * FROM missing_table");
    assert!(result.is_err());
}
