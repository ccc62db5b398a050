//! JSON file adapters.
//!
//! Each store keeps its whole document in memory and rewrites the file after
//! every mutation. A missing file is an empty store; the file is created on the
//! first write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use pln_types::{
    ConversionId, ConversionRecord, ConversionRepository, CurrencyCode, RateRecord, RateStore,
    RepoError, StoredConversion,
};

use crate::DUPLICATE_RECORD;

// ─────────────────────────────────────────────────────────────────────────────
// File helpers
// ─────────────────────────────────────────────────────────────────────────────

async fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T, RepoError> {
    let body = match tokio::fs::read_to_string(path).await {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "json store not found, starting empty");
            return Ok(T::default());
        }
        Err(e) => return Err(RepoError::File(format!("{}: {}", path.display(), e))),
    };

    if body.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&body)
        .map_err(|e| RepoError::Corrupt(format!("{}: {}", path.display(), e)))
}

async fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), RepoError> {
    let body = serde_json::to_string_pretty(document)
        .map_err(|e| RepoError::File(format!("{}: {}", path.display(), e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RepoError::File(format!("{}: {}", parent.display(), e)))?;
    }

    // Write next to the target, then swap it in.
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body)
        .await
        .map_err(|e| RepoError::File(format!("{}: {}", tmp.display(), e)))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| RepoError::File(format!("{}: {}", path.display(), e)))?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of the conversions document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonConversion {
    id: i64,
    currency: CurrencyCode,
    rate: Decimal,
    price_in_pln: Decimal,
    date: NaiveDate,
}

impl JsonConversion {
    fn new(id: i64, record: ConversionRecord) -> Self {
        Self {
            id,
            currency: record.currency,
            rate: record.rate,
            price_in_pln: record.price_in_pln,
            date: record.date,
        }
    }

    fn same_values(&self, record: &ConversionRecord) -> bool {
        self.currency == record.currency
            && self.rate == record.rate
            && self.price_in_pln == record.price_in_pln
            && self.date == record.date
    }

    fn to_domain(&self) -> StoredConversion {
        StoredConversion {
            id: ConversionId::new(self.id),
            record: ConversionRecord {
                currency: self.currency,
                rate: self.rate.normalize(),
                price_in_pln: self.price_in_pln.normalize(),
                date: self.date,
            },
        }
    }
}

/// Conversion records kept as a JSON array of `{id, currency, rate, price_in_pln, date}`.
pub struct JsonConversionRepo {
    path: PathBuf,
    rows: Mutex<Vec<JsonConversion>>,
}

impl JsonConversionRepo {
    /// Loads the document at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let path = path.into();
        let mut rows: Vec<JsonConversion> = read_document(&path).await?;
        rows.sort_by_key(|r| r.id);

        tracing::debug!(path = %path.display(), records = rows.len(), "json conversions loaded");
        Ok(Self {
            path,
            rows: Mutex::new(rows),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConversionRepository for JsonConversionRepo {
    async fn create(&self, record: ConversionRecord) -> Result<ConversionId, RepoError> {
        record.validate()?;

        let mut rows = self.rows.lock().await;
        if rows.iter().any(|r| r.same_values(&record)) {
            return Err(RepoError::Conflict(DUPLICATE_RECORD.into()));
        }

        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let mut next = rows.clone();
        next.push(JsonConversion::new(id, record));
        write_document(&self.path, &next).await?;
        *rows = next;

        tracing::debug!(id, path = %self.path.display(), "conversion stored in json file");
        Ok(ConversionId::new(id))
    }

    async fn get(&self, id: ConversionId) -> Result<StoredConversion, RepoError> {
        let rows = self.rows.lock().await;
        rows.iter()
            .find(|r| r.id == id.get())
            .map(JsonConversion::to_domain)
            .ok_or(RepoError::NotFound)
    }

    async fn list(&self) -> Result<Vec<StoredConversion>, RepoError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().map(JsonConversion::to_domain).collect())
    }

    async fn update(&self, id: ConversionId, record: ConversionRecord) -> Result<(), RepoError> {
        record.validate()?;

        let mut rows = self.rows.lock().await;
        let index = rows
            .iter()
            .position(|r| r.id == id.get())
            .ok_or(RepoError::NotFound)?;

        if rows
            .iter()
            .any(|r| r.id != id.get() && r.same_values(&record))
        {
            return Err(RepoError::Conflict(DUPLICATE_RECORD.into()));
        }

        let mut next = rows.clone();
        next[index] = JsonConversion::new(id.get(), record);
        write_document(&self.path, &next).await?;
        *rows = next;
        Ok(())
    }

    async fn delete(&self, id: ConversionId) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().await;
        let index = rows
            .iter()
            .position(|r| r.id == id.get())
            .ok_or(RepoError::NotFound)?;

        let mut next = rows.clone();
        next.remove(index);
        write_document(&self.path, &next).await?;
        *rows = next;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Daily rates
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct JsonRate {
    date: NaiveDate,
    rate: Decimal,
}

/// Daily rates kept as a JSON object mapping currency code to `[{date, rate}]`.
///
/// Keys are matched case-insensitively; codes outside the currency catalogue
/// are preserved on rewrite but never returned.
pub struct JsonRateStore {
    path: PathBuf,
    rates: Mutex<BTreeMap<String, Vec<JsonRate>>>,
}

impl JsonRateStore {
    /// Loads the document at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let path = path.into();
        let raw: BTreeMap<String, Vec<JsonRate>> = read_document(&path).await?;

        // Keys differing only in case are merged; a later entry for the same day wins.
        let mut merged: BTreeMap<String, BTreeMap<NaiveDate, Decimal>> = BTreeMap::new();
        for (code, entries) in raw {
            let by_date = merged.entry(code.to_uppercase()).or_default();
            for entry in entries {
                by_date.insert(entry.date, entry.rate);
            }
        }
        let rates: BTreeMap<String, Vec<JsonRate>> = merged
            .into_iter()
            .map(|(code, by_date)| {
                let entries = by_date
                    .into_iter()
                    .map(|(date, rate)| JsonRate { date, rate })
                    .collect();
                (code, entries)
            })
            .collect();

        tracing::debug!(path = %path.display(), currencies = rates.len(), "json rates loaded");
        Ok(Self {
            path,
            rates: Mutex::new(rates),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn to_record(currency: CurrencyCode, entry: &JsonRate) -> RateRecord {
    RateRecord {
        currency,
        rate: entry.rate.normalize(),
        date: entry.date,
    }
}

#[async_trait]
impl RateStore for JsonRateStore {
    async fn get_rate(
        &self,
        currency: CurrencyCode,
        date: NaiveDate,
    ) -> Result<RateRecord, RepoError> {
        let rates = self.rates.lock().await;
        rates
            .get(currency.code())
            .and_then(|entries| entries.iter().find(|e| e.date == date))
            .map(|e| to_record(currency, e))
            .ok_or(RepoError::NotFound)
    }

    async fn latest_rate(
        &self,
        currency: CurrencyCode,
        on_or_before: NaiveDate,
    ) -> Result<RateRecord, RepoError> {
        let rates = self.rates.lock().await;
        rates
            .get(currency.code())
            .and_then(|entries| {
                entries
                    .iter()
                    .filter(|e| e.date <= on_or_before)
                    .max_by_key(|e| e.date)
            })
            .map(|e| to_record(currency, e))
            .ok_or(RepoError::NotFound)
    }

    async fn rates_for(&self, currency: CurrencyCode) -> Result<Vec<RateRecord>, RepoError> {
        let rates = self.rates.lock().await;
        Ok(rates
            .get(currency.code())
            .map(|entries| entries.iter().map(|e| to_record(currency, e)).collect())
            .unwrap_or_default())
    }

    async fn upsert_rate(&self, record: RateRecord) -> Result<(), RepoError> {
        record.validate()?;

        let mut rates = self.rates.lock().await;
        let entry = JsonRate {
            date: record.date,
            rate: record.rate,
        };

        let existing = rates.get(record.currency.code());
        if existing.is_some_and(|entries| entries.contains(&entry)) {
            tracing::debug!(currency = %record.currency, date = %record.date, "rate already stored");
            return Ok(());
        }

        let mut next = rates.clone();
        let entries = next.entry(record.currency.code().to_string()).or_default();
        match entries.iter_mut().find(|e| e.date == record.date) {
            Some(e) => e.rate = record.rate,
            None => {
                entries.push(entry);
                entries.sort_by_key(|e| e.date);
            }
        }

        write_document(&self.path, &next).await?;
        *rates = next;

        tracing::debug!(currency = %record.currency, date = %record.date, rate = %record.rate, "rate upserted in json file");
        Ok(())
    }

    async fn delete_currency(&self, currency: CurrencyCode) -> Result<u64, RepoError> {
        let mut rates = self.rates.lock().await;
        let Some(removed) = rates.get(currency.code()).map(|e| e.len() as u64) else {
            tracing::info!(%currency, "currency does not exist in the rates store");
            return Ok(0);
        };

        let mut next = rates.clone();
        next.remove(currency.code());
        write_document(&self.path, &next).await?;
        *rates = next;
        Ok(removed)
    }
}
