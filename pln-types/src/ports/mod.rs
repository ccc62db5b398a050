//! Port traits (interfaces for adapters).
//!
//! These are the contracts that rate sources and stores must implement.
//! The converter service depends on these traits, not concrete implementations.

mod rates;
mod repository;

pub use rates::{RateSource, RateStore};
pub use repository::ConversionRepository;
