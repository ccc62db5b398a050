//! Macro-Generated Catalogue of NBP Currencies
//!
//! The National Bank of Poland publishes average (mid) exchange rates in two
//! tables: table A with the commonly traded currencies, refreshed every
//! business day, and table B with the remaining ones, refreshed weekly.
//! Every supported currency is declared once in the `define_currencies!`
//! invocation below, which generates the [`CurrencyCode`] enum together with
//! its lookup, parsing and display code.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` macro invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     GEL => ("GEL", "lari (Gruzja)", B),
//! }
//! ```
//!
//! # Example
//! ```
//! use nbp_currencies::{CurrencyCode, NbpTable};
//!
//! let usd: CurrencyCode = "usd".parse().unwrap();
//! assert_eq!(usd.code(), "USD");
//! assert_eq!(usd.table(), NbpTable::A);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Returned when a string does not name a supported currency or table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("'{0}' currency not found")]
    UnknownCurrency(String),

    #[error("unknown NBP table '{0}', expected A or B")]
    UnknownTable(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate tables
// ─────────────────────────────────────────────────────────────────────────────

/// NBP table a currency's mid rate is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NbpTable {
    A,
    B,
}

impl NbpTable {
    /// Path segment used by the NBP web API (`a` or `b`).
    pub fn as_path(&self) -> &'static str {
        match self {
            NbpTable::A => "a",
            NbpTable::B => "b",
        }
    }

    pub fn all() -> &'static [NbpTable] {
        &[NbpTable::A, NbpTable::B]
    }
}

impl fmt::Display for NbpTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NbpTable::A => write!(f, "A"),
            NbpTable::B => write!(f, "B"),
        }
    }
}

impl FromStr for NbpTable {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(NbpTable::A),
            "B" => Ok(NbpTable::B),
            _ => Err(ParseError::UnknownTable(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines the CurrencyCode enum and its runtime lookups
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define currencies with auto-generated lookups and conversions.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Variant => ("CODE", "polish name", TABLE),
/// }
/// ```
#[macro_export]
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $label:literal, $table:ident)
        ),* $(,)?
    ) => {
        /// ISO 4217 code of a currency with an NBP mid rate.
        ///
        /// Deserializes through `FromStr`, so stored codes match in any case.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

            /// Name used by NBP in its published tables.
            pub fn name(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $label),*
                }
            }

            pub fn table(&self) -> $crate::NbpTable {
                match self {
                    $(CurrencyCode::$name => $crate::NbpTable::$table),*
                }
            }

            pub fn all() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }

            /// Currencies published in the given table.
            pub fn in_table(table: $crate::NbpTable) -> impl Iterator<Item = CurrencyCode> {
                Self::all().iter().copied().filter(move |c| c.table() == table)
            }
        }

        impl std::fmt::Display for CurrencyCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = $crate::ParseError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err($crate::ParseError::UnknownCurrency(s.to_uppercase())),
                }
            }
        }

        impl TryFrom<String> for CurrencyCode {
            type Error = $crate::ParseError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - Add new currencies here!
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    // Table A
    THB => ("THB", "bat (Tajlandia)", A),
    USD => ("USD", "dolar amerykański", A),
    AUD => ("AUD", "dolar australijski", A),
    HKD => ("HKD", "dolar Hongkongu", A),
    CAD => ("CAD", "dolar kanadyjski", A),
    NZD => ("NZD", "dolar nowozelandzki", A),
    SGD => ("SGD", "dolar singapurski", A),
    EUR => ("EUR", "euro", A),
    HUF => ("HUF", "forint (Węgry)", A),
    CHF => ("CHF", "frank szwajcarski", A),
    GBP => ("GBP", "funt szterling", A),
    UAH => ("UAH", "hrywna (Ukraina)", A),
    JPY => ("JPY", "jen (Japonia)", A),
    CZK => ("CZK", "korona czeska", A),
    DKK => ("DKK", "korona duńska", A),
    ISK => ("ISK", "korona islandzka", A),
    NOK => ("NOK", "korona norweska", A),
    SEK => ("SEK", "korona szwedzka", A),
    RON => ("RON", "lej rumuński", A),
    BGN => ("BGN", "lew (Bułgaria)", A),
    TRY => ("TRY", "lira turecka", A),
    ILS => ("ILS", "nowy izraelski szekel", A),
    CLP => ("CLP", "peso chilijskie", A),
    PHP => ("PHP", "peso filipińskie", A),
    MXN => ("MXN", "peso meksykańskie", A),
    ZAR => ("ZAR", "rand (Republika Południowej Afryki)", A),
    BRL => ("BRL", "real (Brazylia)", A),
    MYR => ("MYR", "ringgit (Malezja)", A),
    IDR => ("IDR", "rupia indonezyjska", A),
    INR => ("INR", "rupia indyjska", A),
    KRW => ("KRW", "won południowokoreański", A),
    CNY => ("CNY", "yuan renminbi (Chiny)", A),
    XDR => ("XDR", "SDR (MFW)", A),
    // Table B
    AED => ("AED", "dirham ZEA (Zjednoczone Emiraty Arabskie)", B),
    ARS => ("ARS", "peso argentyńskie", B),
    EGP => ("EGP", "funt egipski", B),
    KZT => ("KZT", "tenge (Kazachstan)", B),
    MAD => ("MAD", "dirham marokański", B),
    SAR => ("SAR", "rial saudyjski", B),
    TWD => ("TWD", "nowy dolar tajwański", B),
    VND => ("VND", "dong (Wietnam)", B),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
