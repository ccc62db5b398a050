//! # PLN Hex
//!
//! Application service layer of the PLN converter.
//!
//! ## Architecture
//!
//! - `sources/` - Rate source adapters built on the rates store
//! - `service/` - Converter service (orchestrates rate lookups and storage)
//!
//! The service is generic over its ports, allowing different storage
//! backends and rate sources to be injected.

pub mod service;
pub mod sources;


pub use service::ConverterService;
pub use sources::{CachingRateSource, LocalRateSource};
