//! Converter Application Service
//!
//! Orchestrates rate lookups, conversion and persistence through the ports.
//! Contains NO infrastructure logic - pure orchestration.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use nbp_client::NbpClient;
use pln_types::{
    AppError, ConversionId, ConversionRecord, ConversionRepository, ConversionResult,
    ConvertRequest, CurrencyCode, NbpTable, RateRecord, RateSource, RateSourceKind, RateStore,
    RepoError, SavedConversion, StoredConversion, SyncReport,
};

/// Application service for conversions into PLN.
///
/// Generic over its ports:
/// - `R: ConversionRepository` - where conversion records are kept
/// - `S: RateStore` - the local table of daily rates
/// - `L: RateSource` - answers `RateSourceKind::Local` lookups
/// - `M: RateSource` - answers `RateSourceKind::Api` lookups
pub struct ConverterService<R, S, L, M>
where
    R: ConversionRepository,
    S: RateStore,
    L: RateSource,
    M: RateSource,
{
    repo: R,
    rates: S,
    local: L,
    remote: M,
}

impl<R, S, L, M> ConverterService<R, S, L, M>
where
    R: ConversionRepository,
    S: RateStore,
    L: RateSource,
    M: RateSource,
{
    /// Creates a new converter service.
    pub fn new(repo: R, rates: S, local: L, remote: M) -> Self {
        Self {
            repo,
            rates,
            local,
            remote,
        }
    }

    /// Returns a reference to the conversion repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts an amount into PLN and stores the result.
    ///
    /// The call fails as a whole if the record cannot be stored.
    pub async fn convert_to_pln(&self, req: ConvertRequest) -> Result<SavedConversion, AppError> {
        if req.amount < Decimal::ZERO {
            return Err(AppError::Validation("Amount cannot be negative".into()));
        }

        let rate = self.fetch_rate(req.currency, req.source, req.date).await?;

        let result = ConversionResult::new(req.currency, rate.rate, rate.date, req.amount)?;
        result.validate()?;

        let id = self.repo.create(ConversionRecord::from(&result)).await?;

        tracing::info!(
            %id,
            currency = %result.currency(),
            amount = %result.amount_source(),
            rate = %result.rate(),
            amount_pln = %result.amount_pln(),
            "conversion stored"
        );
        Ok(SavedConversion { id, result })
    }

    /// Gets the rate of `currency` from the chosen source.
    pub async fn fetch_rate(
        &self,
        currency: CurrencyCode,
        source: RateSourceKind,
        date: Option<NaiveDate>,
    ) -> Result<RateRecord, AppError> {
        tracing::debug!(%currency, %source, ?date, "fetching rate");

        let record = match source {
            RateSourceKind::Local => self.local.get_rate(currency, date).await?,
            RateSourceKind::Api => self.remote.get_rate(currency, date).await?,
        };
        Ok(record)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Stored conversions
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn get_conversion(&self, id: ConversionId) -> Result<StoredConversion, AppError> {
        self.repo.get(id).await.map_err(|e| not_found(e, id))
    }

    pub async fn list_conversions(&self) -> Result<Vec<StoredConversion>, AppError> {
        self.repo.list().await.map_err(Into::into)
    }

    /// Replaces a stored conversion and returns it as stored.
    pub async fn update_conversion(
        &self,
        id: ConversionId,
        record: ConversionRecord,
    ) -> Result<StoredConversion, AppError> {
        record.validate()?;

        self.repo
            .update(id, record)
            .await
            .map_err(|e| not_found(e, id))?;

        tracing::info!(%id, "conversion updated");
        self.get_conversion(id).await
    }

    pub async fn delete_conversion(&self, id: ConversionId) -> Result<(), AppError> {
        self.repo.delete(id).await.map_err(|e| not_found(e, id))?;

        tracing::info!(%id, "conversion deleted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rates store
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists the stored rates of `currency`, oldest first.
    pub async fn rates_for(&self, currency: CurrencyCode) -> Result<Vec<RateRecord>, AppError> {
        self.rates.rates_for(currency).await.map_err(Into::into)
    }

    /// Stores a rate by hand, replacing any rate stored for the same day.
    pub async fn set_rate(
        &self,
        currency: CurrencyCode,
        date: NaiveDate,
        rate: Decimal,
    ) -> Result<RateRecord, AppError> {
        let record = RateRecord::new(currency, rate, date)?;
        self.rates.upsert_rate(record.clone()).await?;

        tracing::info!(%currency, %date, %rate, "rate stored");
        Ok(record)
    }

    /// Removes every stored rate of `currency`.
    pub async fn delete_rates(&self, currency: CurrencyCode) -> Result<u64, AppError> {
        let removed = self.rates.delete_currency(currency).await?;

        tracing::info!(%currency, removed, "rates deleted");
        Ok(removed)
    }

    /// Imports a whole NBP table into the rates store.
    ///
    /// Codes missing from the currency catalogue are reported, not stored.
    pub async fn sync_table(
        &self,
        client: &NbpClient,
        table: NbpTable,
        date: Option<NaiveDate>,
    ) -> Result<SyncReport, AppError> {
        let fetched = client.fetch_table(table, date).await?;

        let mut report = SyncReport {
            effective_date: Some(fetched.effective_date),
            ..SyncReport::default()
        };

        for row in fetched.rates {
            let Ok(currency) = row.code.parse::<CurrencyCode>() else {
                tracing::warn!(code = %row.code, "currency missing from catalogue, skipped");
                report.skipped.push(row.code);
                continue;
            };

            let record = RateRecord::new(currency, row.mid, fetched.effective_date)?;
            self.rates.upsert_rate(record).await?;
            report.stored += 1;
        }

        tracing::info!(
            %table,
            no = %fetched.no,
            effective_date = %fetched.effective_date,
            stored = report.stored,
            skipped = report.skipped.len(),
            "rate table synced"
        );
        Ok(report)
    }
}

fn not_found(err: RepoError, id: ConversionId) -> AppError {
    match err {
        RepoError::NotFound => AppError::NotFound(format!("Conversion {}", id)),
        e => e.into(),
    }
}
