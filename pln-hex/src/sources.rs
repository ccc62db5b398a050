//! Rate sources built on the local rates store.

use async_trait::async_trait;
use chrono::NaiveDate;

use pln_types::{CurrencyCode, RateError, RateRecord, RateSource, RateStore, RepoError};

/// Reads rates from the local rates store.
///
/// A date is looked up exactly; without one the latest rate stored on or
/// before today is used.
pub struct LocalRateSource<S: RateStore> {
    store: S,
}

impl<S: RateStore> LocalRateSource<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[async_trait]
impl<S: RateStore> RateSource for LocalRateSource<S> {
    async fn get_rate(
        &self,
        currency: CurrencyCode,
        date: Option<NaiveDate>,
    ) -> Result<RateRecord, RateError> {
        let found = match date {
            Some(date) => self.store.get_rate(currency, date).await,
            None => self.store.latest_rate(currency, today()).await,
        };

        match found {
            Ok(record) => {
                tracing::debug!(%currency, date = %record.date, "rate read from local store");
                Ok(record)
            }
            Err(RepoError::NotFound) => Err(match date {
                Some(date) => RateError::RateNotPublished { currency, date },
                None => RateError::CurrencyNotFound(currency),
            }),
            Err(e) => Err(RateError::Store(e)),
        }
    }
}

/// Wraps a remote source and writes every rate it returns to the rates store.
///
/// A failed store write fails the lookup.
pub struct CachingRateSource<M: RateSource, S: RateStore> {
    remote: M,
    store: S,
}

impl<M: RateSource, S: RateStore> CachingRateSource<M, S> {
    pub fn new(remote: M, store: S) -> Self {
        Self { remote, store }
    }

    pub fn remote(&self) -> &M {
        &self.remote
    }
}

#[async_trait]
impl<M: RateSource, S: RateStore> RateSource for CachingRateSource<M, S> {
    async fn get_rate(
        &self,
        currency: CurrencyCode,
        date: Option<NaiveDate>,
    ) -> Result<RateRecord, RateError> {
        let record = self.remote.get_rate(currency, date).await?;
        self.store.upsert_rate(record.clone()).await?;

        tracing::debug!(%currency, date = %record.date, "fetched rate cached");
        Ok(record)
    }
}
