//! Domain models for the PLN converter.

pub mod conversion;
pub mod rate;

pub use conversion::{ConversionId, ConversionRecord, ConversionResult, StoredConversion, round_pln};
pub use rate::{RateRecord, RateSourceKind};
