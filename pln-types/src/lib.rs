//! # PLN Types
//!
//! Domain types and port traits for the PLN converter.
//! This crate has ZERO IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the workspace:
//! - `domain/` - Pure domain types (ConversionResult, RateRecord, ConversionRecord)
//! - `ports/` - Trait definitions that rate sources and stores must implement
//! - `dto/` - Request and response shapes of the orchestrator
//! - `error/` - Domain, repository, rate and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ConversionId, ConversionRecord, ConversionResult, RateRecord, RateSourceKind,
    StoredConversion, round_pln,
};
pub use dto::*;
pub use error::{AppError, DomainError, RateError, RepoError};
pub use nbp_currencies::{CurrencyCode, NbpTable};
pub use ports::{ConversionRepository, RateSource, RateStore};
