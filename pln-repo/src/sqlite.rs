//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use pln_types::{
    ConversionId, ConversionRecord, ConversionRepository, CurrencyCode, RateRecord, RateStore,
    RepoError, StoredConversion,
};

use crate::DUPLICATE_RECORD;
use crate::types::{DbConversion, DbRate, date_to_db, decimal_to_db};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository holding both the `conversions` and `currency_rates` tables.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;

        tracing::debug!(database_url, "sqlite repository ready");
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema if it does not exist yet.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl_conversions = include_str!("../migrations/0001_create_conversions.sql");
        sqlx::query(ddl_conversions)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let ddl_rates = include_str!("../migrations/0002_create_currency_rates.sql");
        sqlx::query(ddl_rates)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}

fn map_write_error(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepoError::Conflict(DUPLICATE_RECORD.into());
        }
    }
    RepoError::Database(err.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ConversionRepository for SqliteRepo {
    async fn create(&self, record: ConversionRecord) -> Result<ConversionId, RepoError> {
        record.validate()?;

        let result = sqlx::query(
            r#"INSERT INTO conversions (currency, rate, price_in_pln, date) VALUES (?, ?, ?, ?)"#,
        )
        .bind(record.currency.code())
        .bind(decimal_to_db(record.rate))
        .bind(decimal_to_db(record.price_in_pln))
        .bind(date_to_db(record.date))
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        let id = ConversionId::new(result.last_insert_rowid());
        tracing::debug!(%id, currency = %record.currency, "conversion stored in sqlite");
        Ok(id)
    }

    async fn get(&self, id: ConversionId) -> Result<StoredConversion, RepoError> {
        let row: Option<DbConversion> = sqlx::query_as(
            r#"SELECT id, currency, rate, price_in_pln, date FROM conversions WHERE id = ?"#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn list(&self) -> Result<Vec<StoredConversion>, RepoError> {
        let rows: Vec<DbConversion> = sqlx::query_as(
            r#"SELECT id, currency, rate, price_in_pln, date FROM conversions ORDER BY id ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbConversion::into_domain).collect()
    }

    async fn update(&self, id: ConversionId, record: ConversionRecord) -> Result<(), RepoError> {
        record.validate()?;

        let result = sqlx::query(
            r#"UPDATE conversions SET currency = ?, rate = ?, price_in_pln = ?, date = ? WHERE id = ?"#,
        )
        .bind(record.currency.code())
        .bind(decimal_to_db(record.rate))
        .bind(decimal_to_db(record.price_in_pln))
        .bind(date_to_db(record.date))
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: ConversionId) -> Result<(), RepoError> {
        let result = sqlx::query(r#"DELETE FROM conversions WHERE id = ?"#)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Daily rates
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RateStore for SqliteRepo {
    async fn get_rate(
        &self,
        currency: CurrencyCode,
        date: NaiveDate,
    ) -> Result<RateRecord, RepoError> {
        let row: Option<DbRate> = sqlx::query_as(
            r#"SELECT currency, date, rate FROM currency_rates WHERE currency = ? AND date = ?"#,
        )
        .bind(currency.code())
        .bind(date_to_db(date))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn latest_rate(
        &self,
        currency: CurrencyCode,
        on_or_before: NaiveDate,
    ) -> Result<RateRecord, RepoError> {
        let row: Option<DbRate> = sqlx::query_as(
            r#"SELECT currency, date, rate FROM currency_rates
               WHERE currency = ? AND date <= ?
               ORDER BY date DESC LIMIT 1"#,
        )
        .bind(currency.code())
        .bind(date_to_db(on_or_before))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn rates_for(&self, currency: CurrencyCode) -> Result<Vec<RateRecord>, RepoError> {
        let rows: Vec<DbRate> = sqlx::query_as(
            r#"SELECT currency, date, rate FROM currency_rates WHERE currency = ? ORDER BY date ASC"#,
        )
        .bind(currency.code())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbRate::into_domain).collect()
    }

    async fn upsert_rate(&self, record: RateRecord) -> Result<(), RepoError> {
        record.validate()?;

        sqlx::query(
            r#"INSERT INTO currency_rates (currency, date, rate) VALUES (?, ?, ?)
               ON CONFLICT (currency, date) DO UPDATE SET rate = excluded.rate"#,
        )
        .bind(record.currency.code())
        .bind(date_to_db(record.date))
        .bind(decimal_to_db(record.rate))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        tracing::debug!(currency = %record.currency, date = %record.date, rate = %record.rate, "rate upserted in sqlite");
        Ok(())
    }

    async fn delete_currency(&self, currency: CurrencyCode) -> Result<u64, RepoError> {
        let result = sqlx::query(r#"DELETE FROM currency_rates WHERE currency = ?"#)
            .bind(currency.code())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
