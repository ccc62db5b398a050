//! Configuration loading from environment.

use std::env;
use std::fmt;
use std::str::FromStr;

use pln_repo::{DatabaseType, StorageConfig};
use pln_types::RateSourceKind;

const DEFAULT_DATABASE_URL: &str = "sqlite://currencies.db?mode=rwc";
const DEFAULT_JSON_DATABASE_PATH: &str = "database.json";
const DEFAULT_CURRENCY_RATES_PATH: &str = "currency_rates.json";

/// Deployment environment; picks the default storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvState {
    Prod,
    Dev,
}

impl EnvState {
    pub fn default_database_type(&self) -> DatabaseType {
        match self {
            EnvState::Prod => DatabaseType::Sqlite,
            EnvState::Dev => DatabaseType::Json,
        }
    }
}

impl fmt::Display for EnvState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvState::Prod => write!(f, "prod"),
            EnvState::Dev => write!(f, "dev"),
        }
    }
}

impl FromStr for EnvState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prod" => Ok(EnvState::Prod),
            "dev" => Ok(EnvState::Dev),
            other => anyhow::bail!("Invalid ENV_STATE '{}'. Expected prod or dev", other),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Invalid LOG_FORMAT '{}'. Expected text or json", other),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub env_state: EnvState,
    pub storage: StorageConfig,
    /// Rate source used when a command does not pass `--source`
    pub rate_source: RateSourceKind,
    pub nbp_api_url: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let env_state: EnvState = lookup("ENV_STATE")
            .unwrap_or_else(|| "dev".to_string())
            .parse()?;

        let database_type = match lookup("DATABASE_TYPE") {
            Some(value) => value.parse()?,
            None => env_state.default_database_type(),
        };

        let rate_source: RateSourceKind = lookup("RATE_SOURCE")
            .unwrap_or_else(|| "api".to_string())
            .parse()?;

        let log_format: LogFormat = lookup("LOG_FORMAT")
            .unwrap_or_else(|| "text".to_string())
            .parse()?;

        let storage = StorageConfig {
            database_type,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            json_path: lookup("JSON_DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_JSON_DATABASE_PATH.to_string())
                .into(),
            rates_path: lookup("CURRENCY_RATES_PATH")
                .unwrap_or_else(|| DEFAULT_CURRENCY_RATES_PATH.to_string())
                .into(),
        };

        Ok(Self {
            env_state,
            storage,
            rate_source,
            nbp_api_url: lookup("NBP_API_URL")
                .unwrap_or_else(|| nbp_client::DEFAULT_BASE_URL.to_string()),
            log_format,
        })
    }
}
