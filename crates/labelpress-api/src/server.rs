// crates/labelpress-api/src/server.rs
// ============================================================================
// Module: API Server
// Description: axum HTTP server for label record persistence and history.
// Purpose: Expose the record store gateway over the boundary contract.
// Dependencies: labelpress-core, labelpress-store-sqlite, axum, tokio
// ============================================================================

//! ## Overview
//! The API server exposes the record store gateway over HTTP. Handlers
//! validate submissions locally before any store call, persist records
//! atomically through the gateway, and never retry failed store calls; retry
//! policy stays with the client. The raw SQL passthrough is an escape hatch
//! that stays disabled unless configuration enables it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::routing::post;
use labelpress_core::BulkCount;
use labelpress_core::DEFAULT_RECENT_LIMIT;
use labelpress_core::InMemoryRecordStore;
use labelpress_core::LogisticsRecord;
use labelpress_core::PackagingCondition;
use labelpress_core::PackagingType;
use labelpress_core::PalletChoice;
use labelpress_core::RecordImage;
use labelpress_core::RecordStore;
use labelpress_core::RmaRecord;
use labelpress_core::SharedRecordStore;
use labelpress_core::Timestamp;
use labelpress_store_sqlite::SqliteRecordStore;
use labelpress_store_sqlite::SqliteStoreConfig;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::config::LabelpressConfig;
use crate::config::RecordStoreType;
use crate::config::StoreConfig;
use crate::telemetry::ApiEndpoint;
use crate::telemetry::MetricSink;
use crate::telemetry::RequestMetricEvent;
use crate::telemetry::StderrMetricSink;

// ============================================================================
// SECTION: API Server
// ============================================================================

/// HTTP API server instance.
pub struct ApiServer {
    /// Host configuration.
    config: LabelpressConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl ApiServer {
    /// Builds a new API server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError`] when configuration is invalid or the store
    /// cannot be initialized.
    pub fn from_config(config: LabelpressConfig) -> Result<Self, ApiServerError> {
        config.validate().map_err(|err| ApiServerError::Config(err.to_string()))?;
        let (store, raw_store) = build_record_store(&config.store)?;
        let state = Arc::new(ServerState::new(
            store,
            raw_store,
            config.server.enable_raw_query,
            Arc::new(StderrMetricSink),
        ));
        Ok(Self {
            config,
            state,
        })
    }

    /// Serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError`] when the bind address is invalid or the
    /// server fails.
    pub async fn serve(self) -> Result<(), ApiServerError> {
        let addr: SocketAddr = self
            .config
            .server
            .bind
            .parse()
            .map_err(|_| ApiServerError::Config("invalid bind address".to_string()))?;
        emit_non_loopback_warning(&addr);
        let app = build_router(self.state, self.config.server.max_body_bytes);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ApiServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app)
            .await
            .map_err(|_| ApiServerError::Transport("http server failed".to_string()))
    }
}

/// Builds the record store pair from store configuration.
///
/// The second element carries the concrete SQLite handle used by the raw
/// query passthrough; it is `None` for the in-memory backend.
fn build_record_store(
    config: &StoreConfig,
) -> Result<(SharedRecordStore, Option<SqliteRecordStore>), ApiServerError> {
    match config.store_type {
        RecordStoreType::Memory => {
            Ok((SharedRecordStore::from_store(InMemoryRecordStore::new()), None))
        }
        RecordStoreType::Sqlite => {
            let path = config
                .path
                .clone()
                .ok_or_else(|| ApiServerError::Config("sqlite store requires path".to_string()))?;
            let sqlite_config = SqliteStoreConfig {
                path,
                busy_timeout_ms: config.busy_timeout_ms,
                journal_mode: config.journal_mode,
                sync_mode: config.sync_mode,
            };
            let store = SqliteRecordStore::new(sqlite_config)
                .map_err(|err| ApiServerError::Init(err.to_string()))?;
            Ok((SharedRecordStore::from_store(store.clone()), Some(store)))
        }
    }
}

/// Warns when the listener is exposed beyond loopback.
fn emit_non_loopback_warning(addr: &SocketAddr) {
    if !addr.ip().is_loopback() {
        let _ = writeln!(
            std::io::stderr(),
            "warning: labelpress api bound to non-loopback address {addr}; verify firewall rules"
        );
    }
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared server state for HTTP handlers.
pub struct ServerState {
    /// Record store gateway.
    store: SharedRecordStore,
    /// Concrete SQLite handle for the raw query passthrough.
    raw_store: Option<SqliteRecordStore>,
    /// Whether the raw query passthrough is enabled.
    enable_raw_query: bool,
    /// Metric sink receiving request events.
    metrics: Arc<dyn MetricSink + Send + Sync>,
}

impl ServerState {
    /// Creates handler state from its collaborators.
    #[must_use]
    pub fn new(
        store: SharedRecordStore,
        raw_store: Option<SqliteRecordStore>,
        enable_raw_query: bool,
        metrics: Arc<dyn MetricSink + Send + Sync>,
    ) -> Self {
        Self {
            store,
            raw_store,
            enable_raw_query,
            metrics,
        }
    }

    /// Records one request metric event.
    fn observe(&self, endpoint: ApiEndpoint, status: StatusCode, latency: Duration) {
        self.metrics.record(&RequestMetricEvent::new(endpoint, status.as_u16(), latency));
    }
}

/// Builds the API router over shared state.
#[must_use]
pub fn build_router(state: Arc<ServerState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/rma", post(handle_insert_rma))
        .route("/api/logistics", post(handle_insert_logistics))
        .route("/api/rma/recent", get(handle_recent_rma))
        .route("/api/logistics/recent", get(handle_recent_logistics))
        .route("/api/query", post(handle_raw_query))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// RMA submission body.
#[derive(Debug, Deserialize)]
struct RmaSubmission {
    /// RMA case number.
    rma: String,
    /// Pallet choice.
    #[serde(rename = "isPallet")]
    is_pallet: PalletChoice,
    /// Packaging type.
    #[serde(rename = "packagingType")]
    packaging_type: PackagingType,
    /// Packaging condition.
    #[serde(rename = "packagingCondition")]
    packaging_condition: PackagingCondition,
    /// Raw bulk count input.
    #[serde(rename = "bulkCount")]
    bulk_count: String,
    /// Captured images.
    images: Vec<RecordImage>,
}

/// Logistics submission body.
#[derive(Debug, Deserialize)]
struct LogisticsSubmission {
    /// Stock keeping unit.
    sku: String,
    /// Ordered serial numbers.
    #[serde(rename = "serialNumbers")]
    serial_numbers: Vec<String>,
}

/// Raw query request body.
#[derive(Debug, Deserialize)]
struct RawQueryRequest {
    /// SQL statement to execute verbatim.
    query: String,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles GET /api/health.
async fn handle_health(State(state): State<Arc<ServerState>>) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    let status = StatusCode::OK;
    state.observe(ApiEndpoint::Health, status, started.elapsed());
    (status, Json(json!({ "status": "ok" })))
}

/// Handles POST /api/rma.
async fn handle_insert_rma(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<RmaSubmission>,
) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    let (status, value) = insert_rma_response(&state, body);
    state.observe(ApiEndpoint::InsertRma, status, started.elapsed());
    (status, Json(value))
}

/// Builds the response for an RMA submission.
fn insert_rma_response(state: &ServerState, body: RmaSubmission) -> (StatusCode, Value) {
    let bulk_count = match BulkCount::parse(&body.bulk_count) {
        Ok(bulk_count) => bulk_count,
        Err(err) => {
            return (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }));
        }
    };
    let record = RmaRecord {
        id: None,
        rma_number: body.rma,
        pallet: body.is_pallet,
        packaging_type: body.packaging_type,
        packaging_condition: body.packaging_condition,
        bulk_count,
        images: body.images,
        created_at: current_timestamp(),
    };
    if let Err(err) = record.validate() {
        return (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }));
    }
    match run_blocking(|| state.store.insert_rma(&record)) {
        Ok(id) => {
            let mut persisted = record;
            persisted.id = Some(id);
            (StatusCode::OK, json!({ "success": true, "data": [persisted] }))
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "could not save record", "details": err.to_string() }),
        ),
    }
}

/// Handles POST /api/logistics.
async fn handle_insert_logistics(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<LogisticsSubmission>,
) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    let (status, value) = insert_logistics_response(&state, body);
    state.observe(ApiEndpoint::InsertLogistics, status, started.elapsed());
    (status, Json(value))
}

/// Builds the response for a logistics submission.
fn insert_logistics_response(
    state: &ServerState,
    body: LogisticsSubmission,
) -> (StatusCode, Value) {
    let record = LogisticsRecord {
        id: None,
        sku: body.sku,
        serial_numbers: body.serial_numbers,
        created_at: current_timestamp(),
    };
    if let Err(err) = record.validate() {
        return (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }));
    }
    match run_blocking(|| state.store.insert_logistics(&record)) {
        Ok(_) => (StatusCode::OK, json!({ "success": true })),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "could not save record", "details": err.to_string() }),
        ),
    }
}

/// Handles GET /api/rma/recent.
async fn handle_recent_rma(State(state): State<Arc<ServerState>>) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    let (status, value) =
        recent_response(run_blocking(|| state.store.recent_rma(DEFAULT_RECENT_LIMIT)));
    state.observe(ApiEndpoint::RecentRma, status, started.elapsed());
    (status, Json(value))
}

/// Handles GET /api/logistics/recent.
async fn handle_recent_logistics(
    State(state): State<Arc<ServerState>>,
) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    let (status, value) =
        recent_response(run_blocking(|| state.store.recent_logistics(DEFAULT_RECENT_LIMIT)));
    state.observe(ApiEndpoint::RecentLogistics, status, started.elapsed());
    (status, Json(value))
}

/// Builds the response for a recent-records query.
fn recent_response<T: serde::Serialize>(
    result: Result<Vec<T>, labelpress_core::StoreError>,
) -> (StatusCode, Value) {
    match result {
        Ok(records) => match serde_json::to_value(records) {
            Ok(value) => (StatusCode::OK, value),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "could not serialize records", "details": err.to_string() }),
            ),
        },
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "could not fetch records", "details": err.to_string() }),
        ),
    }
}

/// Handles POST /api/query.
async fn handle_raw_query(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<RawQueryRequest>,
) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    let (status, value) = raw_query_response(&state, &body);
    state.observe(ApiEndpoint::RawQuery, status, started.elapsed());
    (status, Json(value))
}

/// Builds the response for a raw query passthrough request.
fn raw_query_response(state: &ServerState, body: &RawQueryRequest) -> (StatusCode, Value) {
    if !state.enable_raw_query {
        return (StatusCode::NOT_FOUND, json!({ "error": "raw query endpoint is disabled" }));
    }
    let Some(raw_store) = &state.raw_store else {
        return (
            StatusCode::NOT_FOUND,
            json!({ "error": "raw query requires the sqlite store" }),
        );
    };
    let query = body.query.trim();
    if query.is_empty() {
        return (StatusCode::BAD_REQUEST, json!({ "error": "query is required" }));
    }
    match run_blocking(|| raw_store.raw_query(query)) {
        Ok(rows) => (StatusCode::OK, json!({ "data": rows })),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "query execution failed", "details": err.to_string() }),
        ),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs a blocking store call without starving the async runtime.
fn run_blocking<T>(call: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(call)
        }
        _ => call(),
    }
}

/// Captures the current wall-clock instant as a record timestamp.
fn current_timestamp() -> Timestamp {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    Timestamp::from_unix_millis(i64::try_from(now.as_millis()).unwrap_or(i64::MAX))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// API server errors.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("initialization error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
