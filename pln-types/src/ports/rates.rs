//! Exchange rate ports.
//!
//! `RateSource` is what the converter asks for a rate; implementations read
//! the local rates store or call the NBP web API. `RateStore` is the local
//! table of daily rates itself.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::RateRecord;
use crate::error::{RateError, RepoError};
use nbp_currencies::CurrencyCode;

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync + 'static {
    /// Gets the mid rate of `currency` against PLN.
    ///
    /// With `date` set, only a rate published for exactly that day is
    /// returned. Without it, the latest rate published up to today is.
    async fn get_rate(
        &self,
        currency: CurrencyCode,
        date: Option<NaiveDate>,
    ) -> Result<RateRecord, RateError>;
}

/// Port trait for the local table of daily rates.
#[async_trait::async_trait]
pub trait RateStore: Send + Sync + 'static {
    /// Gets the rate stored for `(currency, date)`.
    async fn get_rate(&self, currency: CurrencyCode, date: NaiveDate)
    -> Result<RateRecord, RepoError>;

    /// Gets the most recent rate dated on or before `on_or_before`.
    async fn latest_rate(
        &self,
        currency: CurrencyCode,
        on_or_before: NaiveDate,
    ) -> Result<RateRecord, RepoError>;

    /// Lists every stored rate of `currency`, oldest first.
    async fn rates_for(&self, currency: CurrencyCode) -> Result<Vec<RateRecord>, RepoError>;

    /// Inserts a rate or replaces the one stored for the same day.
    async fn upsert_rate(&self, record: RateRecord) -> Result<(), RepoError>;

    /// Removes all rates of `currency` and returns how many were removed.
    async fn delete_currency(&self, currency: CurrencyCode) -> Result<u64, RepoError>;
}

#[async_trait::async_trait]
impl<T: RateSource + ?Sized> RateSource for Arc<T> {
    async fn get_rate(
        &self,
        currency: CurrencyCode,
        date: Option<NaiveDate>,
    ) -> Result<RateRecord, RateError> {
        (**self).get_rate(currency, date).await
    }
}

#[async_trait::async_trait]
impl<T: RateStore + ?Sized> RateStore for Arc<T> {
    async fn get_rate(
        &self,
        currency: CurrencyCode,
        date: NaiveDate,
    ) -> Result<RateRecord, RepoError> {
        (**self).get_rate(currency, date).await
    }

    async fn latest_rate(
        &self,
        currency: CurrencyCode,
        on_or_before: NaiveDate,
    ) -> Result<RateRecord, RepoError> {
        (**self).latest_rate(currency, on_or_before).await
    }

    async fn rates_for(&self, currency: CurrencyCode) -> Result<Vec<RateRecord>, RepoError> {
        (**self).rates_for(currency).await
    }

    async fn upsert_rate(&self, record: RateRecord) -> Result<(), RepoError> {
        (**self).upsert_rate(record).await
    }

    async fn delete_currency(&self, currency: CurrencyCode) -> Result<u64, RepoError> {
        (**self).delete_currency(currency).await
    }
}
