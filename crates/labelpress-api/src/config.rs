// crates/labelpress-api/src/config.rs
// ============================================================================
// Module: Labelpress Configuration
// Description: Configuration loading and validation for the Labelpress host.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: labelpress-qr, labelpress-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Unknown
//! fields and out-of-range values fail closed. The raw query passthrough is
//! disabled unless explicitly enabled, and the default bind address stays on
//! loopback.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use labelpress_qr::QrOptions;
use labelpress_store_sqlite::SqliteStoreMode;
use labelpress_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "labelpress.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "LABELPRESS_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;
/// Default bind address; loopback on the label tool's historical port.
const DEFAULT_BIND: &str = "127.0.0.1:3001";
/// Default maximum request body size; data-URI image lists are large.
const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;
/// Maximum allowed request body size.
const MAX_MAX_BODY_BYTES: usize = 256 * 1024 * 1024;
/// Minimum allowed store busy timeout in milliseconds.
const MIN_BUSY_TIMEOUT_MS: u64 = 100;
/// Maximum allowed store busy timeout in milliseconds.
const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;
/// Minimum rendered QR width in pixels.
const MIN_QR_WIDTH: u32 = 64;
/// Maximum rendered QR width in pixels.
const MAX_QR_WIDTH: u32 = 4_096;
/// Maximum quiet-zone margin in modules.
const MAX_QR_MARGIN: u32 = 16;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config file exceeds the size limit.
    #[error("config file too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        actual_bytes: u64,
    },
    /// Config failed validation.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Record store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStoreType {
    /// In-memory store; records are lost on restart.
    #[default]
    Memory,
    /// Durable SQLite store.
    Sqlite,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum allowed request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Enables the raw SQL passthrough endpoint.
    #[serde(default)]
    pub enable_raw_query: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            enable_raw_query: false,
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: RecordStoreType,
    /// Path to the SQLite database file (required for the sqlite backend).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds for the SQLite backend.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// SQLite journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// SQLite sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Label rendering configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelConfig {
    /// Target QR image width in pixels.
    #[serde(default = "default_qr_width")]
    pub qr_width: u32,
    /// Quiet-zone margin in modules.
    #[serde(default = "default_qr_margin")]
    pub qr_margin: u32,
    /// QR error correction level.
    #[serde(default)]
    pub error_correction: labelpress_qr::ErrorCorrection,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            qr_width: default_qr_width(),
            qr_margin: default_qr_margin(),
            error_correction: labelpress_qr::ErrorCorrection::default(),
        }
    }
}

impl LabelConfig {
    /// Returns the rendering options for the configured label settings.
    #[must_use]
    pub const fn qr_options(&self) -> QrOptions {
        QrOptions {
            width: self.qr_width,
            margin: self.qr_margin,
            error_correction: self.error_correction,
        }
    }
}

/// Top-level Labelpress configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LabelpressConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Label rendering settings.
    #[serde(default)]
    pub labels: LabelConfig,
}

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default maximum body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default SQLite busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Returns the default QR width.
const fn default_qr_width() -> u32 {
    256
}

/// Returns the default QR margin.
const fn default_qr_margin() -> u32 {
    1
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl LabelpressConfig {
    /// Loads configuration from the resolved path.
    ///
    /// Resolution order: the explicit path argument, the `LABELPRESS_CONFIG`
    /// environment variable, then `labelpress.toml` in the working directory.
    /// When no explicit or environment path is set and the default file does
    /// not exist, built-in defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_path(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV_VAR) {
            return Self::load_path(Path::new(&path));
        }
        let default_path = Path::new(DEFAULT_CONFIG_NAME);
        if default_path.exists() {
            return Self::load_path(default_path);
        }
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load_path(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                max_bytes: MAX_CONFIG_FILE_SIZE,
                actual_bytes: metadata.len(),
            });
        }
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let config: Self =
            toml::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration, failing closed on out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address: {}", self.server.bind)))?;
        if self.server.max_body_bytes == 0 || self.server.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "max_body_bytes must be in 1..={MAX_MAX_BODY_BYTES}"
            )));
        }
        if self.store.store_type == RecordStoreType::Sqlite && self.store.path.is_none() {
            return Err(ConfigError::Invalid("sqlite store requires a path".to_string()));
        }
        if self.store.busy_timeout_ms < MIN_BUSY_TIMEOUT_MS
            || self.store.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(format!(
                "busy_timeout_ms must be in {MIN_BUSY_TIMEOUT_MS}..={MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        if self.labels.qr_width < MIN_QR_WIDTH || self.labels.qr_width > MAX_QR_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "qr_width must be in {MIN_QR_WIDTH}..={MAX_QR_WIDTH}"
            )));
        }
        if self.labels.qr_margin > MAX_QR_MARGIN {
            return Err(ConfigError::Invalid(format!("qr_margin must be at most {MAX_QR_MARGIN}")));
        }
        Ok(())
    }
}
