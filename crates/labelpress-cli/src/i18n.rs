// crates/labelpress-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalogs and translation utilities for the CLI.
// Purpose: Centralize user-facing strings with English and Spanish locales.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The Labelpress CLI stores user-facing strings in small translation
//! catalogs. The tool's operators are Spanish-speaking warehouse staff, so a
//! full Spanish catalog ships alongside the English fallback. All runtime
//! output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The locale is selected once and read-only thereafter.
//! - Missing keys fall back to the English catalog, then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Spanish.
    Es,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let language = normalized.split(['-', '_', '.']).next().unwrap_or(&normalized);
        match language {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }
}

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Locale selected for this process.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the process locale; later calls are ignored.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the process locale, defaulting to English.
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalogs
// ============================================================================

/// English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "labelpress {version}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("serve.listening", "Labelpress API listening on {bind}"),
    ("serve.init_failed", "Failed to initialize API server: {error}"),
    ("serve.failed", "API server failed: {error}"),
    ("serve.runtime_failed", "Failed to start async runtime: {error}"),
    ("label.payload", "Payload: {payload}"),
    ("label.validation_failed", "Validation failed: {error}"),
    ("label.qr_written", "QR image written to {path}"),
    ("label.qr_failed", "Could not generate code: {error}"),
    ("label.qr_write_failed", "Failed to write QR image to {path}: {error}"),
    ("label.saved", "Record saved with id {id}"),
    ("label.save_failed", "Could not save record: {error}"),
    ("label.serials_read_failed", "Failed to read serial numbers from {path}: {error}"),
    ("label.serials_missing", "Provide at least one serial number (--serial or --serials-file)."),
    ("label.image_read_failed", "Failed to read image at {path}: {error}"),
    ("label.images_missing", "Provide at least one image (--image). Take a photo of the product."),
    ("recent.empty", "No records found."),
    ("recent.row_failed", "Failed to render record: {error}"),
    ("recent.fetch_failed", "Failed to fetch records: {error}"),
    ("store.init_failed", "Failed to open record store: {error}"),
    ("store.memory_warning", "Note: the configured store is in-memory; records do not persist."),
];

/// Spanish catalog entries.
const CATALOG_ES: &[(&str, &str)] = &[
    ("main.version", "labelpress {version}"),
    ("config.load_failed", "Error al cargar la configuración: {error}"),
    ("config.validate.ok", "Configuración válida."),
    ("serve.listening", "API de Labelpress escuchando en {bind}"),
    ("serve.init_failed", "Error al inicializar el servidor API: {error}"),
    ("serve.failed", "Fallo del servidor API: {error}"),
    ("serve.runtime_failed", "Error al iniciar el runtime asíncrono: {error}"),
    ("label.payload", "Contenido: {payload}"),
    ("label.validation_failed", "Validación fallida: {error}"),
    ("label.qr_written", "Imagen QR escrita en {path}"),
    ("label.qr_failed", "No se pudo generar el código: {error}"),
    ("label.qr_write_failed", "Error al escribir la imagen QR en {path}: {error}"),
    ("label.saved", "Registro guardado con id {id}"),
    ("label.save_failed", "Error al guardar el registro: {error}"),
    ("label.serials_read_failed", "Error al leer los números de serie de {path}: {error}"),
    (
        "label.serials_missing",
        "Introduce al menos un número de serie (--serial o --serials-file).",
    ),
    ("label.image_read_failed", "Error al leer la imagen en {path}: {error}"),
    (
        "label.images_missing",
        "Se requiere al menos una imagen (--image). Por favor, tome una foto del producto.",
    ),
    ("recent.empty", "No se encontraron registros."),
    ("recent.row_failed", "Error al mostrar el registro: {error}"),
    ("recent.fetch_failed", "Error al obtener registros: {error}"),
    ("store.init_failed", "Error al abrir el almacén de registros: {error}"),
    (
        "store.memory_warning",
        "Nota: el almacén configurado es en memoria; los registros no persisten.",
    ),
];

/// Returns the catalog map for a locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_ES_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Es => CATALOG_ES_MAP.get_or_init(|| CATALOG_ES.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` for the process locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
