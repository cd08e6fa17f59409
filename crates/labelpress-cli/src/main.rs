// crates/labelpress-cli/src/main.rs
// ============================================================================
// Module: Labelpress CLI Entry Point
// Description: Command dispatcher for the Labelpress API and offline labels.
// Purpose: Provide a localized CLI for server and offline label tasks.
// Dependencies: clap, labelpress-api, labelpress-core, labelpress-qr, tokio
// ============================================================================

//! ## Overview
//! The Labelpress CLI runs the HTTP API server and generates label payloads
//! and QR images offline. All user-facing strings are routed through the
//! i18n catalog; the operator locale is selected with `LABELPRESS_LANG`.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use labelpress_api::ApiServer;
use labelpress_api::LabelpressConfig;
use labelpress_api::RecordStoreType;
use labelpress_cli::i18n::Locale;
use labelpress_cli::i18n::set_locale;
use labelpress_cli::t;
use labelpress_core::BulkCount;
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
use labelpress_core::encode_logistics;
use labelpress_core::encode_rma;
use labelpress_qr::QrOptions;
use labelpress_qr::render_png;
use labelpress_store_sqlite::SqliteRecordStore;
use labelpress_store_sqlite::SqliteStoreConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "LABELPRESS_LANG";

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// QR label generation and history for logistics and RMA workflows.
#[derive(Parser, Debug)]
#[command(name = "labelpress", version)]
struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),
    /// Generate a label payload and QR image offline.
    #[command(subcommand)]
    Label(LabelCommands),
    /// List recent records, newest first.
    Recent(RecentArgs),
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Arguments for the serve command.
#[derive(Args, Debug)]
struct ServeArgs {
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Label generation commands.
#[derive(Subcommand, Debug)]
enum LabelCommands {
    /// Generate a bulk logistics label.
    Bulk(BulkArgs),
    /// Generate an RMA label.
    Rma(RmaArgs),
}

/// Arguments for bulk label generation.
#[derive(Args, Debug)]
struct BulkArgs {
    /// Stock keeping unit for the shipment.
    #[arg(long)]
    sku: String,
    /// Serial number to include (repeatable).
    #[arg(long = "serial")]
    serials: Vec<String>,
    /// File with one serial number per line.
    #[arg(long)]
    serials_file: Option<PathBuf>,
    /// Output path for the rendered QR image.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Persist the record to the configured store.
    #[arg(long)]
    store: bool,
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Arguments for RMA label generation.
#[derive(Args, Debug)]
struct RmaArgs {
    /// RMA case number.
    #[arg(long)]
    rma: String,
    /// Whether the package arrived on a pallet.
    #[arg(long, value_enum)]
    pallet: PalletArg,
    /// Packaging type of the returned package.
    #[arg(long, value_enum)]
    packaging: PackagingArg,
    /// Packaging condition of the returned package.
    #[arg(long, value_enum)]
    condition: ConditionArg,
    /// Bulk count selection or custom label.
    #[arg(long)]
    bulk: String,
    /// Image file to attach (repeatable).
    #[arg(long = "image")]
    images: Vec<PathBuf>,
    /// Output path for the rendered QR image.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Persist the record to the configured store.
    #[arg(long)]
    store: bool,
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Arguments for the recent command.
#[derive(Args, Debug)]
struct RecentArgs {
    /// Record kind to list.
    #[arg(value_enum)]
    kind: RecordKindArg,
    /// Maximum number of records to list.
    #[arg(long, default_value_t = 10)]
    limit: usize,
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validate the configuration file.
    Validate(ConfigValidateArgs),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateArgs {
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Pallet choice CLI values.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PalletArg {
    /// Package arrived on a pallet.
    Pallet,
    /// Package arrived without a pallet.
    NoPallet,
}

impl From<PalletArg> for PalletChoice {
    fn from(value: PalletArg) -> Self {
        match value {
            PalletArg::Pallet => Self::Pallet,
            PalletArg::NoPallet => Self::NoPallet,
        }
    }
}

/// Packaging type CLI values.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PackagingArg {
    /// Original manufacturer packaging.
    Original,
    /// Non-original packaging.
    NoOriginal,
    /// No packaging at all.
    SinEmbalaje,
}

impl From<PackagingArg> for PackagingType {
    fn from(value: PackagingArg) -> Self {
        match value {
            PackagingArg::Original => Self::Original,
            PackagingArg::NoOriginal => Self::NoOriginal,
            PackagingArg::SinEmbalaje => Self::SinEmbalaje,
        }
    }
}

/// Packaging condition CLI values.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConditionArg {
    /// Packaging in good condition.
    Bueno,
    /// Packaging in fair condition.
    Regular,
    /// Packaging in poor condition.
    Malo,
}

impl From<ConditionArg> for PackagingCondition {
    fn from(value: ConditionArg) -> Self {
        match value {
            ConditionArg::Bueno => Self::Bueno,
            ConditionArg::Regular => Self::Regular,
            ConditionArg::Malo => Self::Malo,
        }
    }
}

/// Record kind CLI values.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RecordKindArg {
    /// Bulk logistics records.
    Bulk,
    /// RMA records.
    Rma,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Parses arguments, dispatches the command, and reports localized errors.
fn main() -> ExitCode {
    init_locale();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Serve(args) => run_serve(&args),
        Commands::Label(LabelCommands::Bulk(args)) => run_label_bulk(&args),
        Commands::Label(LabelCommands::Rma(args)) => run_label_rma(&args),
        Commands::Recent(args) => run_recent(&args),
        Commands::Config(ConfigCommands::Validate(args)) => run_config_validate(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(std::io::stderr(), "{message}");
            ExitCode::FAILURE
        }
    }
}

/// Selects the process locale from the environment.
fn init_locale() {
    if let Ok(value) = env::var(LANG_ENV)
        && let Some(locale) = Locale::parse(&value)
    {
        set_locale(locale);
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs the HTTP API server until it fails.
fn run_serve(args: &ServeArgs) -> Result<(), String> {
    let config = LabelpressConfig::load(args.config.as_deref())
        .map_err(|err| t!("config.load_failed", error = err))?;
    let bind = config.server.bind.clone();
    let server =
        ApiServer::from_config(config).map_err(|err| t!("serve.init_failed", error = err))?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| t!("serve.runtime_failed", error = err))?;
    emit(&t!("serve.listening", bind = bind));
    runtime.block_on(server.serve()).map_err(|err| t!("serve.failed", error = err))
}

/// Generates a bulk logistics label.
fn run_label_bulk(args: &BulkArgs) -> Result<(), String> {
    let config = LabelpressConfig::load(args.config.as_deref())
        .map_err(|err| t!("config.load_failed", error = err))?;
    let mut serials = args.serials.clone();
    if let Some(path) = &args.serials_file {
        let contents = fs::read_to_string(path)
            .map_err(|err| t!("label.serials_read_failed", path = path.display(), error = err))?;
        serials.extend(split_serial_lines(&contents));
    }
    if serials.is_empty() {
        return Err(t!("label.serials_missing"));
    }
    let record = LogisticsRecord {
        id: None,
        sku: args.sku.clone(),
        serial_numbers: serials,
        created_at: current_timestamp(),
    };
    let payload = encode_logistics(&record, record.created_at)
        .map_err(|err| t!("label.validation_failed", error = err))?;
    emit(&t!("label.payload", payload = payload));
    if let Some(out) = &args.out {
        write_qr(&payload, out, &config.labels.qr_options())?;
    }
    if args.store {
        let store = open_store(&config)?;
        let id = store
            .insert_logistics(&record)
            .map_err(|err| t!("label.save_failed", error = err))?;
        emit(&t!("label.saved", id = id));
    }
    Ok(())
}

/// Generates an RMA label.
fn run_label_rma(args: &RmaArgs) -> Result<(), String> {
    let config = LabelpressConfig::load(args.config.as_deref())
        .map_err(|err| t!("config.load_failed", error = err))?;
    if args.images.is_empty() {
        return Err(t!("label.images_missing"));
    }
    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        images.push(load_image(path)?);
    }
    let bulk_count =
        BulkCount::parse(&args.bulk).map_err(|err| t!("label.validation_failed", error = err))?;
    let record = RmaRecord {
        id: None,
        rma_number: args.rma.clone(),
        pallet: args.pallet.into(),
        packaging_type: args.packaging.into(),
        packaging_condition: args.condition.into(),
        bulk_count,
        images,
        created_at: current_timestamp(),
    };
    let payload = encode_rma(&record, record.created_at)
        .map_err(|err| t!("label.validation_failed", error = err))?;
    emit(&t!("label.payload", payload = payload));
    if let Some(out) = &args.out {
        write_qr(&payload, out, &config.labels.qr_options())?;
    }
    if args.store {
        let store = open_store(&config)?;
        let id =
            store.insert_rma(&record).map_err(|err| t!("label.save_failed", error = err))?;
        emit(&t!("label.saved", id = id));
    }
    Ok(())
}

/// Lists recent records, newest first.
fn run_recent(args: &RecentArgs) -> Result<(), String> {
    let config = LabelpressConfig::load(args.config.as_deref())
        .map_err(|err| t!("config.load_failed", error = err))?;
    let store = open_store(&config)?;
    let rows = match args.kind {
        RecordKindArg::Bulk => store
            .recent_logistics(args.limit)
            .map_err(|err| t!("recent.fetch_failed", error = err))
            .and_then(|records| render_rows(&records)),
        RecordKindArg::Rma => store
            .recent_rma(args.limit)
            .map_err(|err| t!("recent.fetch_failed", error = err))
            .and_then(|records| render_rows(&records)),
    }?;
    if rows.is_empty() {
        emit(&t!("recent.empty"));
        return Ok(());
    }
    for row in rows {
        emit(&row);
    }
    Ok(())
}

/// Validates the configuration file.
fn run_config_validate(args: &ConfigValidateArgs) -> Result<(), String> {
    LabelpressConfig::load(args.config.as_deref())
        .map_err(|err| t!("config.load_failed", error = err))?;
    emit(&t!("config.validate.ok"));
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes a message to stdout.
fn emit(message: &str) {
    let _ = writeln!(std::io::stdout(), "{message}");
}

/// Splits textarea-style serial input into non-empty lines.
fn split_serial_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Renders records as one JSON line each.
fn render_rows<T: serde::Serialize>(records: &[T]) -> Result<Vec<String>, String> {
    records
        .iter()
        .map(|record| {
            serde_json::to_string(record).map_err(|err| t!("recent.row_failed", error = err))
        })
        .collect()
}

/// Returns the MIME type for an image file extension.
fn mime_for_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Loads an image file as a data-URI record image.
fn load_image(path: &Path) -> Result<RecordImage, String> {
    let bytes = fs::read(path)
        .map_err(|err| t!("label.image_read_failed", path = path.display(), error = err))?;
    let mime = mime_for_extension(path);
    let encoded = STANDARD.encode(bytes);
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    Ok(RecordImage {
        url: format!("data:{mime};base64,{encoded}"),
        content_type: mime.to_string(),
        name,
    })
}

/// Renders a payload as a QR image and writes it to disk.
fn write_qr(payload: &str, out: &Path, options: &QrOptions) -> Result<(), String> {
    let bytes = render_png(payload, options).map_err(|err| t!("label.qr_failed", error = err))?;
    fs::write(out, bytes)
        .map_err(|err| t!("label.qr_write_failed", path = out.display(), error = err))?;
    emit(&t!("label.qr_written", path = out.display()));
    Ok(())
}

/// Opens the configured record store.
fn open_store(config: &LabelpressConfig) -> Result<SharedRecordStore, String> {
    match config.store.store_type {
        RecordStoreType::Memory => {
            emit(&t!("store.memory_warning"));
            Ok(SharedRecordStore::from_store(InMemoryRecordStore::new()))
        }
        RecordStoreType::Sqlite => {
            let path = config
                .store
                .path
                .clone()
                .ok_or_else(|| t!("store.init_failed", error = "sqlite store requires a path"))?;
            let store = SqliteRecordStore::new(SqliteStoreConfig {
                path,
                busy_timeout_ms: config.store.busy_timeout_ms,
                journal_mode: config.store.journal_mode,
                sync_mode: config.store.sync_mode,
            })
            .map_err(|err| t!("store.init_failed", error = err))?;
            Ok(SharedRecordStore::from_store(store))
        }
    }
}

/// Captures the current wall-clock instant as a record timestamp.
fn current_timestamp() -> Timestamp {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    Timestamp::from_unix_millis(i64::try_from(now.as_millis()).unwrap_or(i64::MAX))
}
