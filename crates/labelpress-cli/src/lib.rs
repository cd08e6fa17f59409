// crates/labelpress-cli/src/lib.rs
// ============================================================================
// Module: Labelpress CLI Library
// Description: Shared CLI helpers exposed for the labelpress binary.
// Purpose: Host the i18n catalog and translation macro.
// Dependencies: crate::i18n
// ============================================================================

//! ## Overview
//! The CLI library hosts the localized message catalog used by the
//! `labelpress` binary. All user-facing strings route through the
//! [`t!`](crate::t) macro so the English and Spanish catalogs stay in sync.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;
