//! Daily exchange rate records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use nbp_currencies::CurrencyCode;

use crate::error::DomainError;

/// Mid rate of one currency against PLN, published for a single day.
///
/// Unique per `(currency, date)` within a rates store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    pub currency: CurrencyCode,
    pub rate: Decimal,
    pub date: NaiveDate,
}

impl RateRecord {
    /// Creates a rate record.
    ///
    /// # Validation
    /// - Rate must be positive
    pub fn new(currency: CurrencyCode, rate: Decimal, date: NaiveDate) -> Result<Self, DomainError> {
        let record = Self {
            currency,
            rate,
            date,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.rate <= Decimal::ZERO {
            return Err(DomainError::NonPositiveRate(self.rate));
        }
        Ok(())
    }
}

/// Where the orchestrator takes its exchange rate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSourceKind {
    /// The local rates store.
    Local,
    /// The NBP web API.
    Api,
}

impl fmt::Display for RateSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSourceKind::Local => write!(f, "local"),
            RateSourceKind::Api => write!(f, "api"),
        }
    }
}

impl FromStr for RateSourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "json" | "json file" | "file" => Ok(RateSourceKind::Local),
            "api" | "nbp" | "api nbp" | "remote" => Ok(RateSourceKind::Api),
            _ => Err(DomainError::ValidationError(format!(
                "Invalid rate source '{}'. Available rate sources: local, api",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_record_creation() {
        let record =
            RateRecord::new(CurrencyCode::EUR, dec!(4.25), "2023-10-01".parse().unwrap()).unwrap();
        assert_eq!(record.rate, dec!(4.25));
    }

    #[test]
    fn test_rate_record_rejects_zero_rate() {
        let result = RateRecord::new(CurrencyCode::EUR, dec!(0), "2023-10-01".parse().unwrap());
        assert!(matches!(result, Err(DomainError::NonPositiveRate(_))));
    }

    #[test]
    fn test_rate_record_accepts_numeric_json() {
        let record: RateRecord =
            serde_json::from_str(r#"{"currency":"CZK","rate":0.28,"date":"2023-07-30"}"#).unwrap();
        assert_eq!(record.rate, dec!(0.28));
        assert_eq!(record.currency, CurrencyCode::CZK);
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("LOCAL".parse::<RateSourceKind>().unwrap(), RateSourceKind::Local);
        assert_eq!("json file".parse::<RateSourceKind>().unwrap(), RateSourceKind::Local);
        assert_eq!("api nbp".parse::<RateSourceKind>().unwrap(), RateSourceKind::Api);
        assert!("ftp".parse::<RateSourceKind>().is_err());
    }
}
