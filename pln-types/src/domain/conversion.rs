//! Conversion domain model.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use nbp_currencies::CurrencyCode;

use crate::error::DomainError;

/// Number of decimal places of a PLN amount (grosze).
pub const PLN_DECIMAL_PLACES: u32 = 2;

/// Rounds a PLN value to grosze, with midpoints rounded away from zero.
pub fn round_pln(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PLN_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Identifier assigned to a conversion record by the storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionId(i64);

impl ConversionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ConversionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ConversionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Outcome of converting an amount in a foreign currency into PLN.
///
/// Fields are private: a `ConversionResult` can only be obtained through
/// [`ConversionResult::new`] or [`ConversionResult::from_parts`], both of which
/// enforce `amount_pln == round_pln(amount_source * rate)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    currency: CurrencyCode,
    rate: Decimal,
    rate_date: NaiveDate,
    amount_source: Decimal,
    amount_pln: Decimal,
}

impl ConversionResult {
    /// Computes the PLN value of `amount_source` at `rate`.
    ///
    /// # Validation
    /// - Amount cannot be negative
    /// - Rate must be positive
    pub fn new(
        currency: CurrencyCode,
        rate: Decimal,
        rate_date: NaiveDate,
        amount_source: Decimal,
    ) -> Result<Self, DomainError> {
        check_inputs(rate, amount_source)?;

        let amount_pln = amount_source
            .checked_mul(rate)
            .map(round_pln)
            .ok_or(DomainError::AmountOverflow)?;

        Ok(Self {
            currency,
            rate,
            rate_date,
            amount_source,
            amount_pln,
        })
    }

    /// Rebuilds a result from stored parts, re-checking the PLN amount.
    pub fn from_parts(
        currency: CurrencyCode,
        rate: Decimal,
        rate_date: NaiveDate,
        amount_source: Decimal,
        amount_pln: Decimal,
    ) -> Result<Self, DomainError> {
        let result = Self {
            currency,
            rate,
            rate_date,
            amount_source,
            amount_pln,
        };
        result.validate()?;
        Ok(result)
    }

    /// Checks the rounding invariant.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_inputs(self.rate, self.amount_source)?;

        let expected = self
            .amount_source
            .checked_mul(self.rate)
            .map(round_pln)
            .ok_or(DomainError::AmountOverflow)?;

        if expected != self.amount_pln {
            return Err(DomainError::AmountMismatch {
                expected,
                actual: self.amount_pln,
            });
        }
        Ok(())
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn rate_date(&self) -> NaiveDate {
        self.rate_date
    }

    pub fn amount_source(&self) -> Decimal {
        self.amount_source
    }

    pub fn amount_pln(&self) -> Decimal {
        self.amount_pln
    }
}

fn check_inputs(rate: Decimal, amount_source: Decimal) -> Result<(), DomainError> {
    if amount_source.is_sign_negative() && !amount_source.is_zero() {
        return Err(DomainError::NegativeAmount);
    }
    if rate <= Decimal::ZERO {
        return Err(DomainError::NonPositiveRate(rate));
    }
    Ok(())
}

/// Persisted form of a conversion.
///
/// Field names follow the storage schema (`rate`, `price_in_pln`, `date`),
/// not the names used by [`ConversionResult`]. The source amount is not part
/// of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub currency: CurrencyCode,
    pub rate: Decimal,
    pub price_in_pln: Decimal,
    pub date: NaiveDate,
}

impl ConversionRecord {
    /// Rejects records no conversion could have produced.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.rate <= Decimal::ZERO {
            return Err(DomainError::NonPositiveRate(self.rate));
        }
        if self.price_in_pln.is_sign_negative() && !self.price_in_pln.is_zero() {
            return Err(DomainError::NegativeAmount);
        }
        Ok(())
    }
}

impl From<&ConversionResult> for ConversionRecord {
    fn from(result: &ConversionResult) -> Self {
        Self {
            currency: result.currency,
            rate: result.rate,
            price_in_pln: result.amount_pln,
            date: result.rate_date,
        }
    }
}

/// A conversion record together with the id its backend assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredConversion {
    pub id: ConversionId,
    #[serde(flatten)]
    pub record: ConversionRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_usd_conversion() {
        let result =
            ConversionResult::new(CurrencyCode::USD, dec!(4.0123), date("2024-05-06"), dec!(100.00))
                .unwrap();
        assert_eq!(result.amount_pln(), dec!(401.23));
        assert_eq!(result.rate_date(), date("2024-05-06"));
    }

    #[test]
    fn test_eur_conversion() {
        let result =
            ConversionResult::new(CurrencyCode::EUR, dec!(4.305), date("2024-05-06"), dec!(50.00))
                .unwrap();
        assert_eq!(result.amount_pln(), dec!(215.25));
    }

    #[test]
    fn test_midpoint_rounds_up() {
        let result =
            ConversionResult::new(CurrencyCode::CHF, dec!(4.125), date("2024-05-06"), dec!(1))
                .unwrap();
        assert_eq!(result.amount_pln(), dec!(4.13));

        assert_eq!(round_pln(dec!(0.005)), dec!(0.01));
        assert_eq!(round_pln(dec!(2.345)), dec!(2.35));
        assert_eq!(round_pln(dec!(2.3449)), dec!(2.34));
    }

    #[test]
    fn test_zero_amount() {
        let result =
            ConversionResult::new(CurrencyCode::GBP, dec!(5.1234), date("2024-06-01"), dec!(0))
                .unwrap();
        assert_eq!(result.amount_pln(), dec!(0));
    }

    #[test]
    fn test_negative_amount_fails() {
        let result =
            ConversionResult::new(CurrencyCode::USD, dec!(4.0), date("2024-05-06"), dec!(-1));
        assert!(matches!(result, Err(DomainError::NegativeAmount)));
    }

    #[test]
    fn test_non_positive_rate_fails() {
        let result =
            ConversionResult::new(CurrencyCode::USD, dec!(0), date("2024-05-06"), dec!(10));
        assert!(matches!(result, Err(DomainError::NonPositiveRate(_))));
    }

    #[test]
    fn test_from_parts_checks_invariant() {
        let ok = ConversionResult::from_parts(
            CurrencyCode::EUR,
            dec!(4.44),
            date("2010-10-10"),
            dec!(5),
            dec!(22.20),
        );
        assert!(ok.is_ok());

        let bad = ConversionResult::from_parts(
            CurrencyCode::EUR,
            dec!(4.44),
            date("2010-10-10"),
            dec!(5),
            dec!(22.21),
        );
        assert!(matches!(bad, Err(DomainError::AmountMismatch { .. })));
    }

    #[test]
    fn test_invariant_over_amounts() {
        let rates = [dec!(0.0001), dec!(0.2861), dec!(3.9876), dec!(4.305), dec!(137.12)];
        let amounts = [dec!(0), dec!(0.01), dec!(1), dec!(99.99), dec!(12345.67)];
        for rate in rates {
            for amount in amounts {
                let result =
                    ConversionResult::new(CurrencyCode::JPY, rate, date("2024-01-02"), amount)
                        .unwrap();
                assert_eq!(result.amount_pln(), round_pln(amount * rate));
                assert!(result.amount_pln().scale() <= 2);
                result.validate().unwrap();
            }
        }
    }

    #[test]
    fn test_record_mapping() {
        let result =
            ConversionResult::new(CurrencyCode::EUR, dec!(4.65), date("2012-02-02"), dec!(5))
                .unwrap();
        let record = ConversionRecord::from(&result);
        assert_eq!(record.currency, CurrencyCode::EUR);
        assert_eq!(record.rate, dec!(4.65));
        assert_eq!(record.price_in_pln, dec!(23.25));
        assert_eq!(record.date, date("2012-02-02"));
    }

    #[test]
    fn test_stored_conversion_serializes_flat() {
        let stored = StoredConversion {
            id: ConversionId::new(3),
            record: ConversionRecord {
                currency: CurrencyCode::EUR,
                rate: dec!(4.65),
                price_in_pln: dec!(23.25),
                date: date("2012-02-02"),
            },
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["date"], "2012-02-02");
    }

    #[test]
    fn test_conversion_id_parse() {
        assert_eq!("42".parse::<ConversionId>().unwrap(), ConversionId::new(42));
        assert!("abc".parse::<ConversionId>().is_err());
    }
}
