//! Row structs for the SQLite tables and the text encodings they use.
//!
//! SQLite has no decimal or date type, so rates and amounts are stored as
//! normalized decimal strings and dates as `YYYY-MM-DD` text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;

use pln_types::{
    ConversionId, ConversionRecord, CurrencyCode, RateRecord, RepoError, StoredConversion,
};

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Conversion row from the `conversions` table.
#[derive(FromRow)]
pub struct DbConversion {
    pub id: i64,
    pub currency: String,
    pub rate: String,
    pub price_in_pln: String,
    pub date: String,
}

impl DbConversion {
    pub fn into_domain(self) -> Result<StoredConversion, RepoError> {
        Ok(StoredConversion {
            id: ConversionId::new(self.id),
            record: ConversionRecord {
                currency: parse_currency(&self.currency)?,
                rate: parse_decimal(&self.rate)?,
                price_in_pln: parse_decimal(&self.price_in_pln)?,
                date: parse_date(&self.date)?,
            },
        })
    }
}

/// Rate row from the `currency_rates` table.
#[derive(FromRow)]
pub struct DbRate {
    pub currency: String,
    pub date: String,
    pub rate: String,
}

impl DbRate {
    pub fn into_domain(self) -> Result<RateRecord, RepoError> {
        Ok(RateRecord {
            currency: parse_currency(&self.currency)?,
            rate: parse_decimal(&self.rate)?,
            date: parse_date(&self.date)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoding / parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Canonical text form, so that `4.25` and `4.250` hit the same unique key.
pub fn decimal_to_db(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_currency(s: &str) -> Result<CurrencyCode, RepoError> {
    CurrencyCode::from_str(s).map_err(|e| RepoError::Corrupt(e.to_string()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal, RepoError> {
    Decimal::from_str(s).map_err(|e| RepoError::Corrupt(format!("invalid decimal '{}': {}", s, e)))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, RepoError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| RepoError::Corrupt(format!("invalid date '{}': {}", s, e)))
}
