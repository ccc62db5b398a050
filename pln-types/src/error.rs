//! Error types for the PLN converter.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use nbp_currencies::CurrencyCode;

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Exchange rate must be positive, got {0}")]
    NonPositiveRate(Decimal),

    #[error("Amount is too large to convert")]
    AmountOverflow,

    #[error("PLN amount mismatch: expected {expected}, got {actual}")]
    AmountMismatch { expected: Decimal, actual: Decimal },

    #[error(transparent)]
    Currency(#[from] nbp_currencies::ParseError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("File error: {0}")]
    File(String),

    #[error("Corrupt data: {0}")]
    Corrupt(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Rate source errors.
#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("'{0}' currency not found")]
    CurrencyNotFound(CurrencyCode),

    #[error("No {currency} rate published for {date}")]
    RateNotPublished { currency: CurrencyCode, date: NaiveDate },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed rate response: {0}")]
    Parse(String),

    #[error(transparent)]
    Store(#[from] RepoError),
}

/// Application-level errors surfaced to callers of the converter service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Record not found".into()),
            RepoError::Conflict(e) => AppError::Conflict(e),
            RepoError::Corrupt(e) => AppError::Parse(e),
            RepoError::Database(e) | RepoError::File(e) => AppError::Storage(e),
        }
    }
}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        match err {
            e @ (RateError::CurrencyNotFound(_) | RateError::RateNotPublished { .. }) => {
                AppError::NotFound(e.to_string())
            }
            RateError::Network(e) => AppError::Network(e),
            RateError::Parse(e) => AppError::Parse(e),
            RateError::Store(e) => e.into(),
        }
    }
}
