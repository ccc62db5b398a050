//! # PLN Repository
//!
//! Concrete storage adapters for the PLN converter. Every adapter implements
//! both the `ConversionRepository` port (conversion records) and the
//! `RateStore` port (the local table of daily rates):
//! - `json` - documents on disk (`database.json`, `currency_rates.json`)
//! - `sqlite` - a single SQLite file with `conversions` and `currency_rates`

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use pln_types::{
    ConversionId, ConversionRecord, ConversionRepository, CurrencyCode, RateRecord, RateStore,
    RepoError, StoredConversion,
};

pub mod json;
pub mod sqlite;

mod types;

#[cfg(test)]
mod sqlite_tests;

pub use json::{JsonConversionRepo, JsonRateStore};
pub use sqlite::SqliteRepo;

pub(crate) const DUPLICATE_RECORD: &str =
    "a record with the same currency, rate, date and price already exists";

// ─────────────────────────────────────────────────────────────────────────────
// Backend selection
// ─────────────────────────────────────────────────────────────────────────────

/// Storage backend selected through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    Json,
    Sqlite,
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseType::Json => write!(f, "json"),
            DatabaseType::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for DatabaseType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(DatabaseType::Json),
            "sqlite" => Ok(DatabaseType::Sqlite),
            other => anyhow::bail!("Unsupported database type '{}'. Expected json or sqlite", other),
        }
    }
}

/// Where each backend keeps its data.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_type: DatabaseType,
    /// SQLite connection URL, e.g. `sqlite://currencies.db?mode=rwc`
    pub database_url: String,
    /// Conversions document used by the JSON backend
    pub json_path: PathBuf,
    /// Daily rates document used by the JSON backend
    pub rates_path: PathBuf,
}

// ─────────────────────────────────────────────────────────────────────────────
// Unified repository
// ─────────────────────────────────────────────────────────────────────────────

/// Unified repository wrapper over the JSON and SQLite backends.
pub enum Repo {
    Json {
        conversions: JsonConversionRepo,
        rates: JsonRateStore,
    },
    Sqlite(SqliteRepo),
}

/// Build and initialize a repository from storage configuration.
///
/// This function:
/// 1. Opens the JSON documents, or connects to SQLite and runs migrations
/// 2. Returns a ready-to-use `Repo`
///
/// # Examples
///
/// ```ignore
/// let repo = build_repo(&StorageConfig {
///     database_type: DatabaseType::Sqlite,
///     database_url: "sqlite://currencies.db?mode=rwc".into(),
///     json_path: "database.json".into(),
///     rates_path: "currency_rates.json".into(),
/// })
/// .await?;
/// ```
pub async fn build_repo(config: &StorageConfig) -> anyhow::Result<Repo> {
    Repo::new(config).await
}

impl Repo {
    pub async fn new(config: &StorageConfig) -> anyhow::Result<Self> {
        let repo = match config.database_type {
            DatabaseType::Json => Repo::Json {
                conversions: JsonConversionRepo::open(&config.json_path).await?,
                rates: JsonRateStore::open(&config.rates_path).await?,
            },
            DatabaseType::Sqlite => Repo::Sqlite(SqliteRepo::new(&config.database_url).await?),
        };
        tracing::info!(backend = %repo.database_type(), "storage backend initialised");
        Ok(repo)
    }

    pub fn database_type(&self) -> DatabaseType {
        match self {
            Repo::Json { .. } => DatabaseType::Json,
            Repo::Sqlite(_) => DatabaseType::Sqlite,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement the ports for Repo (delegation)
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ConversionRepository for Repo {
    async fn create(&self, record: ConversionRecord) -> Result<ConversionId, RepoError> {
        match self {
            Repo::Json { conversions, .. } => conversions.create(record).await,
            Repo::Sqlite(inner) => ConversionRepository::create(inner, record).await,
        }
    }

    async fn get(&self, id: ConversionId) -> Result<StoredConversion, RepoError> {
        match self {
            Repo::Json { conversions, .. } => conversions.get(id).await,
            Repo::Sqlite(inner) => ConversionRepository::get(inner, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<StoredConversion>, RepoError> {
        match self {
            Repo::Json { conversions, .. } => conversions.list().await,
            Repo::Sqlite(inner) => ConversionRepository::list(inner).await,
        }
    }

    async fn update(&self, id: ConversionId, record: ConversionRecord) -> Result<(), RepoError> {
        match self {
            Repo::Json { conversions, .. } => conversions.update(id, record).await,
            Repo::Sqlite(inner) => ConversionRepository::update(inner, id, record).await,
        }
    }

    async fn delete(&self, id: ConversionId) -> Result<(), RepoError> {
        match self {
            Repo::Json { conversions, .. } => conversions.delete(id).await,
            Repo::Sqlite(inner) => ConversionRepository::delete(inner, id).await,
        }
    }
}

#[async_trait]
impl RateStore for Repo {
    async fn get_rate(
        &self,
        currency: CurrencyCode,
        date: NaiveDate,
    ) -> Result<RateRecord, RepoError> {
        match self {
            Repo::Json { rates, .. } => rates.get_rate(currency, date).await,
            Repo::Sqlite(inner) => RateStore::get_rate(inner, currency, date).await,
        }
    }

    async fn latest_rate(
        &self,
        currency: CurrencyCode,
        on_or_before: NaiveDate,
    ) -> Result<RateRecord, RepoError> {
        match self {
            Repo::Json { rates, .. } => rates.latest_rate(currency, on_or_before).await,
            Repo::Sqlite(inner) => RateStore::latest_rate(inner, currency, on_or_before).await,
        }
    }

    async fn rates_for(&self, currency: CurrencyCode) -> Result<Vec<RateRecord>, RepoError> {
        match self {
            Repo::Json { rates, .. } => rates.rates_for(currency).await,
            Repo::Sqlite(inner) => RateStore::rates_for(inner, currency).await,
        }
    }

    async fn upsert_rate(&self, record: RateRecord) -> Result<(), RepoError> {
        match self {
            Repo::Json { rates, .. } => rates.upsert_rate(record).await,
            Repo::Sqlite(inner) => RateStore::upsert_rate(inner, record).await,
        }
    }

    async fn delete_currency(&self, currency: CurrencyCode) -> Result<u64, RepoError> {
        match self {
            Repo::Json { rates, .. } => rates.delete_currency(currency).await,
            Repo::Sqlite(inner) => RateStore::delete_currency(inner, currency).await,
        }
    }
}
