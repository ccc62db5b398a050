//! Request and response shapes of the converter service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ConversionId, ConversionResult, RateSourceKind};
use nbp_currencies::CurrencyCode;

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to convert an amount into PLN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRequest {
    /// Amount in the source currency
    pub amount: Decimal,
    pub currency: CurrencyCode,
    #[serde(default = "default_source")]
    pub source: RateSourceKind,
    /// Rate date; the latest rate published up to today when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

fn default_source() -> RateSourceKind {
    RateSourceKind::Api
}

/// A conversion that has been written to the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedConversion {
    /// Identifier assigned by the storage backend
    pub id: ConversionId,
    #[serde(flatten)]
    pub result: ConversionResult,
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Summary of a bulk rate import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Effective date of the imported table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,
    /// Number of rates written to the store
    pub stored: usize,
    /// Codes present in the table but not in the currency catalogue
    pub skipped: Vec<String>,
}
