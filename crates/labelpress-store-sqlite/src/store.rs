// crates/labelpress-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Record Store
// Description: Durable RecordStore backed by SQLite WAL.
// Purpose: Persist label records with parameterized statements only.
// Dependencies: labelpress-core, rusqlite, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`RecordStore`] using `SQLite`. Each
//! insert commits the row and its serialized list columns in one transaction.
//! Recent queries order strictly by creation time descending with the
//! auto-increment identifier as the tie-break. Every statement binds
//! parameters; record values never reach the SQL text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use labelpress_core::BulkCount;
use labelpress_core::LogisticsRecord;
use labelpress_core::PackagingCondition;
use labelpress_core::PackagingType;
use labelpress_core::PalletChoice;
use labelpress_core::RecordId;
use labelpress_core::RecordImage;
use labelpress_core::RecordStore;
use labelpress_core::RmaRecord;
use labelpress_core::StoreError;
use labelpress_core::Timestamp;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` record store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// The database is unreachable, busy past the timeout, or locked.
    #[error("sqlite store connection error: {0}")]
    Connection(String),
    /// A schema constraint rejected the record.
    #[error("sqlite store constraint violation: {0}")]
    Constraint(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) | SqliteStoreError::Connection(message) => {
                Self::ConnectionFailed(message)
            }
            SqliteStoreError::Constraint(message) => Self::ConstraintViolation(message),
            SqliteStoreError::VersionMismatch(message)
            | SqliteStoreError::Invalid(message)
            | SqliteStoreError::Db(message) => Self::Unknown(message),
        }
    }
}

/// Classifies a rusqlite error into the store error taxonomy.
fn classify_db_error(error: &rusqlite::Error) -> SqliteStoreError {
    match error.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen) => {
            SqliteStoreError::Connection(error.to_string())
        }
        Some(ErrorCode::ConstraintViolation) => SqliteStoreError::Constraint(error.to_string()),
        _ => SqliteStoreError::Db(error.to_string()),
    }
}

// ============================================================================
// SECTION: Raw Rows
// ============================================================================

/// JSON object row returned by the raw query passthrough.
pub type JsonRow = serde_json::Map<String, Value>;

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed record store with WAL support.
#[derive(Clone)]
pub struct SqliteRecordStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Opens an `SQLite`-backed record store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Executes an arbitrary SQL statement and returns its rows as JSON.
    ///
    /// This is the unsafe escape hatch behind the query passthrough endpoint:
    /// the statement text is executed verbatim against the store. Hosts must
    /// gate access to it. Blob columns are rendered lossily as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the statement fails to prepare or
    /// execute.
    pub fn raw_query(&self, sql: &str) -> Result<Vec<JsonRow>, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let mut statement = guard.prepare(sql).map_err(|err| classify_db_error(&err))?;
        let column_names: Vec<String> =
            statement.column_names().iter().map(ToString::to_string).collect();
        let mut rows = statement.query(params![]).map_err(|err| classify_db_error(&err))?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().map_err(|err| classify_db_error(&err))? {
            let mut object = JsonRow::new();
            for (index, name) in column_names.iter().enumerate() {
                let value = match row.get_ref(index).map_err(|err| classify_db_error(&err))? {
                    rusqlite::types::ValueRef::Null => Value::Null,
                    rusqlite::types::ValueRef::Integer(value) => Value::from(value),
                    rusqlite::types::ValueRef::Real(value) => Value::from(value),
                    rusqlite::types::ValueRef::Text(bytes) => {
                        Value::String(String::from_utf8_lossy(bytes).into_owned())
                    }
                    rusqlite::types::ValueRef::Blob(bytes) => {
                        Value::String(String::from_utf8_lossy(bytes).into_owned())
                    }
                };
                object.insert(name.clone(), value);
            }
            results.push(object);
        }
        Ok(results)
    }

    /// Inserts a logistics record inside a transaction.
    fn insert_logistics_row(&self, record: &LogisticsRecord) -> Result<RecordId, SqliteStoreError> {
        record.validate().map_err(|err| SqliteStoreError::Constraint(err.to_string()))?;
        let serials = serde_json::to_string(&record.serial_numbers)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| classify_db_error(&err))?;
        tx.execute(
            "INSERT INTO logistics_records (sku, serial_numbers, created_at) VALUES (?1, ?2, ?3)",
            params![record.sku, serials, record.created_at.as_unix_millis()],
        )
        .map_err(|err| classify_db_error(&err))?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(|err| classify_db_error(&err))?;
        drop(guard);
        RecordId::from_raw(id)
            .ok_or_else(|| SqliteStoreError::Db("invalid rowid from insert".to_string()))
    }

    /// Inserts an RMA record inside a transaction.
    fn insert_rma_row(&self, record: &RmaRecord) -> Result<RecordId, SqliteStoreError> {
        record.validate().map_err(|err| SqliteStoreError::Constraint(err.to_string()))?;
        let images = serde_json::to_string(&record.images)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| classify_db_error(&err))?;
        tx.execute(
            "INSERT INTO rma_records (rma_number, has_pallet, packaging_type, \
             packaging_condition, bulk_count, images, created_at) VALUES (?1, ?2, ?3, ?4, ?5, \
             ?6, ?7)",
            params![
                record.rma_number,
                matches!(record.pallet, PalletChoice::Pallet),
                packaging_type_wire(record.packaging_type),
                record.packaging_condition.label(),
                record.bulk_count.label(),
                images,
                record.created_at.as_unix_millis()
            ],
        )
        .map_err(|err| classify_db_error(&err))?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(|err| classify_db_error(&err))?;
        drop(guard);
        RecordId::from_raw(id)
            .ok_or_else(|| SqliteStoreError::Db("invalid rowid from insert".to_string()))
    }

    /// Lists recent logistics rows, newest first.
    fn recent_logistics_rows(
        &self,
        limit: usize,
    ) -> Result<Vec<LogisticsRecord>, SqliteStoreError> {
        let limit = i64::try_from(limit)
            .map_err(|_| SqliteStoreError::Invalid("recent limit too large".to_string()))?;
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let mut statement = guard
            .prepare(
                "SELECT id, sku, serial_numbers, created_at FROM logistics_records ORDER BY \
                 created_at DESC, id DESC LIMIT ?1",
            )
            .map_err(|err| classify_db_error(&err))?;
        let rows = statement
            .query_map(params![limit], |row| {
                let id: i64 = row.get(0)?;
                let sku: String = row.get(1)?;
                let serials: String = row.get(2)?;
                let created_at: i64 = row.get(3)?;
                Ok((id, sku, serials, created_at))
            })
            .map_err(|err| classify_db_error(&err))?;
        let mut records = Vec::new();
        for row in rows {
            let (id, sku, serials, created_at) = row.map_err(|err| classify_db_error(&err))?;
            let serial_numbers: Vec<String> = serde_json::from_str(&serials)
                .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
            records.push(LogisticsRecord {
                id: RecordId::from_raw(id),
                sku,
                serial_numbers,
                created_at: Timestamp::from_unix_millis(created_at),
            });
        }
        Ok(records)
    }

    /// Lists recent RMA rows, newest first.
    fn recent_rma_rows(&self, limit: usize) -> Result<Vec<RmaRecord>, SqliteStoreError> {
        let limit = i64::try_from(limit)
            .map_err(|_| SqliteStoreError::Invalid("recent limit too large".to_string()))?;
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let mut statement = guard
            .prepare(
                "SELECT id, rma_number, has_pallet, packaging_type, packaging_condition, \
                 bulk_count, images, created_at FROM rma_records ORDER BY created_at DESC, id \
                 DESC LIMIT ?1",
            )
            .map_err(|err| classify_db_error(&err))?;
        let rows = statement
            .query_map(params![limit], |row| {
                let id: i64 = row.get(0)?;
                let rma_number: String = row.get(1)?;
                let has_pallet: bool = row.get(2)?;
                let packaging_type: String = row.get(3)?;
                let packaging_condition: String = row.get(4)?;
                let bulk_count: String = row.get(5)?;
                let images: String = row.get(6)?;
                let created_at: i64 = row.get(7)?;
                Ok((
                    id,
                    rma_number,
                    has_pallet,
                    packaging_type,
                    packaging_condition,
                    bulk_count,
                    images,
                    created_at,
                ))
            })
            .map_err(|err| classify_db_error(&err))?;
        let mut records = Vec::new();
        for row in rows {
            let (id, rma_number, has_pallet, packaging_type, condition, bulk, images, created_at) =
                row.map_err(|err| classify_db_error(&err))?;
            let images: Vec<RecordImage> = serde_json::from_str(&images)
                .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
            records.push(RmaRecord {
                id: RecordId::from_raw(id),
                rma_number,
                pallet: if has_pallet {
                    PalletChoice::Pallet
                } else {
                    PalletChoice::NoPallet
                },
                packaging_type: packaging_type_from_wire(&packaging_type)?,
                packaging_condition: packaging_condition_from_wire(&condition)?,
                bulk_count: BulkCount::parse(&bulk)
                    .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?,
                images,
                created_at: Timestamp::from_unix_millis(created_at),
            });
        }
        Ok(records)
    }
}

impl RecordStore for SqliteRecordStore {
    fn insert_logistics(&self, record: &LogisticsRecord) -> Result<RecordId, StoreError> {
        self.insert_logistics_row(record).map_err(StoreError::from)
    }

    fn insert_rma(&self, record: &RmaRecord) -> Result<RecordId, StoreError> {
        self.insert_rma_row(record).map_err(StoreError::from)
    }

    fn recent_logistics(&self, limit: usize) -> Result<Vec<LogisticsRecord>, StoreError> {
        self.recent_logistics_rows(limit).map_err(StoreError::from)
    }

    fn recent_rma(&self, limit: usize) -> Result<Vec<RmaRecord>, StoreError> {
        self.recent_rma_rows(limit).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Wire Helpers
// ============================================================================

/// Returns the stored wire value for a packaging type.
const fn packaging_type_wire(value: PackagingType) -> &'static str {
    match value {
        PackagingType::Original => "original",
        PackagingType::NoOriginal => "no_original",
        PackagingType::SinEmbalaje => "sin_embalaje",
    }
}

/// Parses a stored packaging type wire value.
fn packaging_type_from_wire(value: &str) -> Result<PackagingType, SqliteStoreError> {
    match value {
        "original" => Ok(PackagingType::Original),
        "no_original" => Ok(PackagingType::NoOriginal),
        "sin_embalaje" => Ok(PackagingType::SinEmbalaje),
        other => Err(SqliteStoreError::Invalid(format!("unknown packaging type: {other}"))),
    }
}

/// Parses a stored packaging condition wire value.
fn packaging_condition_from_wire(value: &str) -> Result<PackagingCondition, SqliteStoreError> {
    match value {
        "Bueno" => Ok(PackagingCondition::Bueno),
        "Regular" => Ok(PackagingCondition::Regular),
        "Malo" => Ok(PackagingCondition::Malo),
        other => Err(SqliteStoreError::Invalid(format!("unknown packaging condition: {other}"))),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| classify_db_error(&err))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| classify_db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| classify_db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| classify_db_error(&err))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| classify_db_error(&err))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| classify_db_error(&err))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| classify_db_error(&err))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| classify_db_error(&err))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| classify_db_error(&err))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS logistics_records (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    sku TEXT NOT NULL,
                    serial_numbers TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS rma_records (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    rma_number TEXT NOT NULL,
                    has_pallet INTEGER NOT NULL,
                    packaging_type TEXT NOT NULL,
                    packaging_condition TEXT NOT NULL,
                    bulk_count TEXT NOT NULL,
                    images TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_logistics_records_recent
                    ON logistics_records (created_at DESC, id DESC);
                CREATE INDEX IF NOT EXISTS idx_rma_records_recent
                    ON rma_records (created_at DESC, id DESC);",
            )
            .map_err(|err| classify_db_error(&err))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| classify_db_error(&err))?;
    Ok(())
}
