// crates/labelpress-api/src/telemetry.rs
// ============================================================================
// Module: API Telemetry
// Description: Observability hooks for HTTP request handling.
// Purpose: Provide metric events and a stderr sink without hard deps.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for API request counters and
//! latencies. It is intentionally dependency-light so deployments can plug in
//! Prometheus or OpenTelemetry without redesign; the default sink writes one
//! JSON line per request to stderr.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::Duration;

use serde::Serialize;

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// API endpoint classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApiEndpoint {
    /// GET /api/health.
    Health,
    /// POST /api/rma.
    InsertRma,
    /// POST /api/logistics.
    InsertLogistics,
    /// GET /api/rma/recent.
    RecentRma,
    /// GET /api/logistics/recent.
    RecentLogistics,
    /// POST /api/query.
    RawQuery,
}

impl ApiEndpoint {
    /// Returns a stable label for the endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "/api/health",
            Self::InsertRma => "/api/rma",
            Self::InsertLogistics => "/api/logistics",
            Self::RecentRma => "/api/rma/recent",
            Self::RecentLogistics => "/api/logistics/recent",
            Self::RawQuery => "/api/query",
        }
    }
}

/// API request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApiOutcome {
    /// Request succeeded.
    Ok,
    /// Request was rejected as invalid.
    ClientError,
    /// Request failed in the store or host.
    ServerError,
}

impl ApiOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::ClientError => "client_error",
            Self::ServerError => "server_error",
        }
    }

    /// Classifies an HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            200..=399 => Self::Ok,
            400..=499 => Self::ClientError,
            _ => Self::ServerError,
        }
    }
}

/// API request metric event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RequestMetricEvent {
    /// Endpoint handling the request.
    pub endpoint: ApiEndpoint,
    /// Request outcome.
    pub outcome: ApiOutcome,
    /// HTTP status code returned.
    pub status: u16,
    /// Handler latency in milliseconds.
    pub latency_ms: u128,
}

impl RequestMetricEvent {
    /// Builds an event from a handler result.
    #[must_use]
    pub const fn new(endpoint: ApiEndpoint, status: u16, latency: Duration) -> Self {
        Self {
            endpoint,
            outcome: ApiOutcome::from_status(status),
            status,
            latency_ms: latency.as_millis(),
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink receiving request metric events.
pub trait MetricSink {
    /// Records one request event.
    fn record(&self, event: &RequestMetricEvent);
}

/// Metric sink that logs JSON lines to stderr.
pub struct StderrMetricSink;

impl MetricSink for StderrMetricSink {
    fn record(&self, event: &RequestMetricEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Metric sink that discards all events.
pub struct NullMetricSink;

impl MetricSink for NullMetricSink {
    fn record(&self, _event: &RequestMetricEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
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

    use super::ApiOutcome;

    #[test]
    fn outcomes_classify_status_ranges() {
        assert_eq!(ApiOutcome::from_status(200), ApiOutcome::Ok);
        assert_eq!(ApiOutcome::from_status(400), ApiOutcome::ClientError);
        assert_eq!(ApiOutcome::from_status(404), ApiOutcome::ClientError);
        assert_eq!(ApiOutcome::from_status(500), ApiOutcome::ServerError);
    }
}
