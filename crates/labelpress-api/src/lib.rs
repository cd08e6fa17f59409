// crates/labelpress-api/src/lib.rs
// ============================================================================
// Module: Labelpress API Library
// Description: HTTP boundary for label record persistence and history.
// Purpose: Expose the record store gateway over a thin axum adapter.
// Dependencies: crate::{config, server, telemetry}
// ============================================================================

//! ## Overview
//! The API crate hosts the HTTP boundary of Labelpress: a thin axum adapter
//! over the record store gateway, fail-closed TOML configuration, and
//! dependency-light request telemetry. Payload encoding and QR rendering stay
//! in their own crates; this layer only validates, persists, and lists.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod server;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::LabelConfig;
pub use config::LabelpressConfig;
pub use config::RecordStoreType;
pub use config::ServerConfig;
pub use config::StoreConfig;
pub use server::ApiServer;
pub use server::ApiServerError;
pub use telemetry::ApiEndpoint;
pub use telemetry::ApiOutcome;
pub use telemetry::MetricSink;
pub use telemetry::NullMetricSink;
pub use telemetry::RequestMetricEvent;
pub use telemetry::StderrMetricSink;
