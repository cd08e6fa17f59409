// crates/labelpress-core/src/core/records.rs
// ============================================================================
// Module: Labelpress Record Model
// Description: Logistics and RMA label records with validation rules.
// Purpose: Provide explicit tagged record types with stable wire forms.
// Dependencies: serde, thiserror, crate::core::{identifiers, time}
// ============================================================================

//! ## Overview
//! This module defines the two label record kinds and their field enums.
//! Records are created exclusively by a successful generate-label action and
//! are immutable afterwards. Validation runs before any payload encoding or
//! store call and fails closed with [`ValidationError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU32;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::RecordId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Record validation errors raised before encoding or persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// SKU field is empty or whitespace.
    #[error("sku must not be empty")]
    EmptySku,
    /// Serial number list is empty.
    #[error("at least one serial number is required")]
    NoSerialNumbers,
    /// A serial number entry is blank.
    #[error("serial number {position} is blank")]
    BlankSerialNumber {
        /// 1-based position of the blank entry.
        position: usize,
    },
    /// RMA number field is empty or whitespace.
    #[error("rma number must not be empty")]
    EmptyRmaNumber,
    /// Bulk count input is empty or whitespace.
    #[error("bulk count must not be empty")]
    EmptyBulkCount,
    /// Bulk count input is numeric but not a positive count.
    #[error("bulk count must be a positive number or a custom label: {value}")]
    InvalidBulkCount {
        /// Rejected input value.
        value: String,
    },
    /// Image list is empty.
    #[error("at least one image is required")]
    NoImages,
    /// An image entry has an empty url.
    #[error("image {position} has an empty url")]
    EmptyImageUrl {
        /// 1-based position of the offending image.
        position: usize,
    },
    /// Timestamp cannot be rendered into a label stamp.
    #[error("timestamp is out of the representable date range")]
    TimestampOutOfRange,
}

// ============================================================================
// SECTION: Field Enums
// ============================================================================

/// Pallet choice recorded on an RMA label.
///
/// # Invariants
/// - Wire form is `pallet` / `no_pallet`; label form is `Pallet` / `No Pallet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PalletChoice {
    /// Package arrived on a pallet.
    Pallet,
    /// Package arrived without a pallet.
    NoPallet,
}

impl PalletChoice {
    /// Returns the human-readable label form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pallet => "Pallet",
            Self::NoPallet => "No Pallet",
        }
    }
}

/// Packaging type recorded on an RMA label.
///
/// # Invariants
/// - Wire form is `original` / `no_original` / `sin_embalaje`.
/// - Label form preserves the original tool's Spanish wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackagingType {
    /// Original manufacturer packaging.
    Original,
    /// Non-original packaging.
    NoOriginal,
    /// No packaging at all.
    SinEmbalaje,
}

impl PackagingType {
    /// Returns the human-readable label form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::NoOriginal => "No Original",
            Self::SinEmbalaje => "Sin embalaje",
        }
    }
}

/// Packaging condition recorded on an RMA label.
///
/// # Invariants
/// - Wire and label form are the Spanish condition words themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackagingCondition {
    /// Packaging in good condition.
    Bueno,
    /// Packaging in fair condition.
    Regular,
    /// Packaging in poor condition.
    Malo,
}

impl PackagingCondition {
    /// Returns the human-readable label form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bueno => "Bueno",
            Self::Regular => "Regular",
            Self::Malo => "Malo",
        }
    }
}

// ============================================================================
// SECTION: Bulk Count
// ============================================================================

/// Selector words accepted as bulk counts, mirroring the intake form options.
const BULK_COUNT_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Bulk (bultos) count carried on an RMA label.
///
/// # Invariants
/// - `Count` is always >= 1.
/// - `Custom` is always non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BulkCount {
    /// Resolved positive package count.
    Count(NonZeroU32),
    /// Free-text bulk description.
    Custom(String),
}

impl BulkCount {
    /// Resolves a bulk count from raw form input.
    ///
    /// Numeric strings and the selector words `one` through `ten` resolve to
    /// [`BulkCount::Count`]; any other non-empty input becomes
    /// [`BulkCount::Custom`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the input is empty or a non-positive
    /// number.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyBulkCount);
        }
        if let Some(&(_, count)) = BULK_COUNT_WORDS
            .iter()
            .find(|(word, _)| trimmed.eq_ignore_ascii_case(word))
        {
            let count = NonZeroU32::new(count).ok_or(ValidationError::EmptyBulkCount)?;
            return Ok(Self::Count(count));
        }
        if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            let parsed: u32 = trimmed.parse().map_err(|_| ValidationError::InvalidBulkCount {
                value: trimmed.to_string(),
            })?;
            let count = NonZeroU32::new(parsed).ok_or_else(|| ValidationError::InvalidBulkCount {
                value: trimmed.to_string(),
            })?;
            return Ok(Self::Count(count));
        }
        Ok(Self::Custom(trimmed.to_string()))
    }

    /// Returns the label form used in payloads and persisted rows.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Count(count) => count.to_string(),
            Self::Custom(text) => text.clone(),
        }
    }
}

impl fmt::Display for BulkCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl TryFrom<String> for BulkCount {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BulkCount> for String {
    fn from(value: BulkCount) -> Self {
        value.label()
    }
}

// ============================================================================
// SECTION: Images
// ============================================================================

/// Image attached to an RMA record.
///
/// # Invariants
/// - `url` carries a data URI captured by the intake UI.
/// - Order within a record is significant and round-trips through storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordImage {
    /// Data URI of the captured image.
    pub url: String,
    /// MIME type reported for the image.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Client-side file name.
    pub name: String,
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Bulk logistics shipment label record.
///
/// # Invariants
/// - `serial_numbers` is non-empty when encoded; order is significant.
/// - Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogisticsRecord {
    /// Store-assigned identifier; `None` until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Stock keeping unit for the shipment.
    pub sku: String,
    /// Ordered serial numbers included in the shipment.
    pub serial_numbers: Vec<String>,
    /// Creation instant supplied by the host.
    pub created_at: Timestamp,
}

impl LogisticsRecord {
    /// Validates required fields before encoding or persistence.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the SKU is empty, the serial list is
    /// empty, or any serial entry is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sku.trim().is_empty() {
            return Err(ValidationError::EmptySku);
        }
        if self.serial_numbers.is_empty() {
            return Err(ValidationError::NoSerialNumbers);
        }
        for (index, serial) in self.serial_numbers.iter().enumerate() {
            if serial.trim().is_empty() {
                return Err(ValidationError::BlankSerialNumber {
                    position: index + 1,
                });
            }
        }
        Ok(())
    }
}

/// Return-merchandise (RMA) label record.
///
/// # Invariants
/// - `images` is non-empty before persistence; order is significant.
/// - Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RmaRecord {
    /// Store-assigned identifier; `None` until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// RMA case number.
    pub rma_number: String,
    /// Pallet choice for the returned package.
    pub pallet: PalletChoice,
    /// Packaging type for the returned package.
    pub packaging_type: PackagingType,
    /// Packaging condition for the returned package.
    pub packaging_condition: PackagingCondition,
    /// Bulk count for the returned package.
    pub bulk_count: BulkCount,
    /// Ordered images captured for the return.
    pub images: Vec<RecordImage>,
    /// Creation instant supplied by the host.
    pub created_at: Timestamp,
}

impl RmaRecord {
    /// Validates required fields before encoding or persistence.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the RMA number is empty, the image
    /// list is empty, or any image url is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rma_number.trim().is_empty() {
            return Err(ValidationError::EmptyRmaNumber);
        }
        if self.images.is_empty() {
            return Err(ValidationError::NoImages);
        }
        for (index, image) in self.images.iter().enumerate() {
            if image.url.trim().is_empty() {
                return Err(ValidationError::EmptyImageUrl {
                    position: index + 1,
                });
            }
        }
        Ok(())
    }
}
