//! # NBP Client
//!
//! A typed Rust client for the exchange rate API of the National Bank of
//! Poland (`https://api.nbp.pl`). Implements the `RateSource` port so the
//! converter can use it as its remote rate source.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use pln_types::{AppError, CurrencyCode, NbpTable, RateError, RateRecord, RateSource};

/// Public NBP API root.
pub const DEFAULT_BASE_URL: &str = "https://api.nbp.pl/api";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    Unexpected(String),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(e) => AppError::NotFound(e),
            e @ (ClientError::Http(_) | ClientError::Api { .. }) => AppError::Network(e.to_string()),
            e @ (ClientError::Json(_) | ClientError::Unexpected(_)) => AppError::Parse(e.to_string()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response models
// ─────────────────────────────────────────────────────────────────────────────

/// Rate series for one currency (`/exchangerates/rates/...`).
#[derive(Debug, Deserialize)]
struct RateSeries {
    code: String,
    rates: Vec<SeriesRate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesRate {
    effective_date: NaiveDate,
    mid: Decimal,
}

/// A complete published table (`/exchangerates/tables/...`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    pub table: NbpTable,
    /// Publication number, e.g. `086/A/NBP/2024`
    pub no: String,
    pub effective_date: NaiveDate,
    pub rates: Vec<TableRate>,
}

/// One currency row of a [`RateTable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRate {
    pub currency: String,
    pub code: String,
    pub mid: Decimal,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// NBP web API client.
pub struct NbpClient {
    base_url: String,
    http: Client,
}

impl NbpClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(
                    error = %e,
                    "failed to build HTTP client, using defaults without timeout"
                );
                Client::new()
            });

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the mid rate of one currency.
    ///
    /// Without a date the most recently published rate is returned.
    pub async fn fetch_rate(
        &self,
        currency: CurrencyCode,
        date: Option<NaiveDate>,
    ) -> Result<RateRecord, ClientError> {
        let path = rate_path(currency, date);
        let series: RateSeries = self.get(&path).await?;

        if !series.code.eq_ignore_ascii_case(currency.code()) {
            return Err(ClientError::Unexpected(format!(
                "asked for {}, got {}",
                currency, series.code
            )));
        }

        let first = series
            .rates
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Unexpected(format!("no rates in response for {}", currency)))?;

        RateRecord::new(currency, first.mid, first.effective_date)
            .map_err(|e| ClientError::Unexpected(e.to_string()))
    }

    /// Fetches a whole published table.
    pub async fn fetch_table(
        &self,
        table: NbpTable,
        date: Option<NaiveDate>,
    ) -> Result<RateTable, ClientError> {
        let path = match date {
            Some(date) => format!("/exchangerates/tables/{}/{}/", table.as_path(), date),
            None => format!("/exchangerates/tables/{}/", table.as_path()),
        };

        let tables: Vec<RateTable> = self.get(&path).await?;
        tables
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Unexpected(format!("empty response for table {}", table)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "requesting NBP API");

        let resp = self
            .http
            .get(&url)
            .query(&[("format", "json")])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else if status == StatusCode::NOT_FOUND {
            let body = resp.text().await.unwrap_or_default();
            Err(ClientError::NotFound(body.trim().to_string()))
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message: message.trim().to_string(),
            })
        }
    }
}

impl Default for NbpClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn rate_path(currency: CurrencyCode, date: Option<NaiveDate>) -> String {
    let table = currency.table().as_path();
    let code = currency.code().to_lowercase();
    match date {
        Some(date) => format!("/exchangerates/rates/{}/{}/{}/", table, code, date),
        None => format!("/exchangerates/rates/{}/{}/", table, code),
    }
}

fn into_rate_error(err: ClientError, currency: CurrencyCode, date: Option<NaiveDate>) -> RateError {
    match err {
        ClientError::NotFound(_) => match date {
            Some(date) => RateError::RateNotPublished { currency, date },
            None => RateError::CurrencyNotFound(currency),
        },
        ClientError::Http(e) => RateError::Network(e.to_string()),
        e @ ClientError::Api { .. } => RateError::Network(e.to_string()),
        ClientError::Json(e) => RateError::Parse(e.to_string()),
        ClientError::Unexpected(e) => RateError::Parse(e),
    }
}

#[async_trait]
impl RateSource for NbpClient {
    async fn get_rate(
        &self,
        currency: CurrencyCode,
        date: Option<NaiveDate>,
    ) -> Result<RateRecord, RateError> {
        let record = self
            .fetch_rate(currency, date)
            .await
            .map_err(|e| into_rate_error(e, currency, date))?;

        tracing::info!(%currency, date = %record.date, rate = %record.rate, "rate fetched from NBP");
        Ok(record)
    }
}
