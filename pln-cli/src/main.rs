//! # PLN Converter CLI
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the storage backend
//! - Create the converter service
//! - Run one command and print its result as JSON

mod config;

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use nbp_client::NbpClient;
use pln_hex::{CachingRateSource, ConverterService, LocalRateSource};
use pln_repo::build_repo;
use pln_types::{
    ConversionId, ConversionRecord, ConvertRequest, CurrencyCode, NbpTable, RateSourceKind,
};

use config::{Config, LogFormat};

#[derive(Parser)]
#[command(name = "pln")]
#[command(author, version, about = "Convert foreign currency amounts into PLN at NBP rates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount into PLN and store the result
    Convert {
        /// Amount in the source currency
        amount: Decimal,
        /// Currency code, e.g. USD
        currency: CurrencyCode,
        /// Rate source (local, api); defaults to RATE_SOURCE
        #[arg(long)]
        source: Option<RateSourceKind>,
        /// Rate date (YYYY-MM-DD); latest published rate when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the rate of a currency
    Rate {
        currency: CurrencyCode,
        #[arg(long)]
        source: Option<RateSourceKind>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Import a whole NBP table into the local rates store
    Sync {
        #[arg(long, default_value = "A")]
        table: NbpTable,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Stored conversions
    Conversions {
        #[command(subcommand)]
        action: ConversionCommands,
    },
    /// Local rates store
    Rates {
        #[command(subcommand)]
        action: RateCommands,
    },
    /// List supported currencies
    Currencies,
}

#[derive(Subcommand)]
enum ConversionCommands {
    /// List all stored conversions
    List,
    /// Get a stored conversion
    Get { id: ConversionId },
    /// Replace a stored conversion
    Update {
        id: ConversionId,
        #[arg(long)]
        currency: CurrencyCode,
        #[arg(long)]
        rate: Decimal,
        #[arg(long)]
        price_in_pln: Decimal,
        #[arg(long)]
        date: NaiveDate,
    },
    /// Delete a stored conversion
    Delete { id: ConversionId },
}

#[derive(Subcommand)]
enum RateCommands {
    /// List stored rates of a currency
    List { currency: CurrencyCode },
    /// Store a rate for a day, replacing any existing one
    Set {
        currency: CurrencyCode,
        date: NaiveDate,
        rate: Decimal,
    },
    /// Delete all stored rates of a currency
    Delete { currency: CurrencyCode },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,pln_cli=debug,pln_hex=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::debug!(
        env_state = %config.env_state,
        database_type = %config.storage.database_type,
        rate_source = %config.rate_source,
        "configuration loaded"
    );

    // Build repository (opens files or connects and migrates)
    let repo = Arc::new(build_repo(&config.storage).await?);
    let client = Arc::new(NbpClient::new(&config.nbp_api_url));

    let service = ConverterService::new(
        repo.clone(),
        repo.clone(),
        LocalRateSource::new(repo.clone()),
        CachingRateSource::new(client.clone(), repo),
    );

    match cli.command {
        Commands::Convert {
            amount,
            currency,
            source,
            date,
        } => {
            let saved = service
                .convert_to_pln(ConvertRequest {
                    amount,
                    currency,
                    source: source.unwrap_or(config.rate_source),
                    date,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }

        Commands::Rate {
            currency,
            source,
            date,
        } => {
            let rate = service
                .fetch_rate(currency, source.unwrap_or(config.rate_source), date)
                .await?;
            println!("{}", serde_json::to_string_pretty(&rate)?);
        }

        Commands::Sync { table, date } => {
            let report = service.sync_table(&client, table, date).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Conversions { action } => match action {
            ConversionCommands::List => {
                let conversions = service.list_conversions().await?;
                println!("{}", serde_json::to_string_pretty(&conversions)?);
            }
            ConversionCommands::Get { id } => {
                let conversion = service.get_conversion(id).await?;
                println!("{}", serde_json::to_string_pretty(&conversion)?);
            }
            ConversionCommands::Update {
                id,
                currency,
                rate,
                price_in_pln,
                date,
            } => {
                let record = ConversionRecord {
                    currency,
                    rate,
                    price_in_pln,
                    date,
                };
                let conversion = service.update_conversion(id, record).await?;
                println!("{}", serde_json::to_string_pretty(&conversion)?);
            }
            ConversionCommands::Delete { id } => {
                service.delete_conversion(id).await?;
                println!("{}", serde_json::json!({ "deleted": id }));
            }
        },

        Commands::Rates { action } => match action {
            RateCommands::List { currency } => {
                let rates = service.rates_for(currency).await?;
                println!("{}", serde_json::to_string_pretty(&rates)?);
            }
            RateCommands::Set {
                currency,
                date,
                rate,
            } => {
                let record = service.set_rate(currency, date, rate).await?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            RateCommands::Delete { currency } => {
                let removed = service.delete_rates(currency).await?;
                println!(
                    "{}",
                    serde_json::json!({ "currency": currency, "removed": removed })
                );
            }
        },

        Commands::Currencies => {
            let currencies: Vec<_> = CurrencyCode::all()
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "code": c.code(),
                        "name": c.name(),
                        "table": c.table(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&currencies)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from(["pln", "convert", "100.00", "usd", "--source", "local"])
            .unwrap();
        match cli.command {
            Commands::Convert {
                amount,
                currency,
                source,
                date,
            } => {
                assert_eq!(amount, Decimal::new(10000, 2));
                assert_eq!(currency, CurrencyCode::USD);
                assert_eq!(source, Some(RateSourceKind::Local));
                assert_eq!(date, None);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_currency() {
        assert!(Cli::try_parse_from(["pln", "convert", "10", "XYZ"]).is_err());
    }

    #[test]
    fn test_parse_conversion_update() {
        let cli = Cli::try_parse_from([
            "pln",
            "conversions",
            "update",
            "3",
            "--currency",
            "EUR",
            "--rate",
            "4.65",
            "--price-in-pln",
            "23.25",
            "--date",
            "2012-02-02",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Conversions {
                action: ConversionCommands::Update { id, .. }
            } if id == ConversionId::new(3)
        ));
    }

    #[test]
    fn test_sync_defaults_to_table_a() {
        let cli = Cli::try_parse_from(["pln", "sync"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sync {
                table: NbpTable::A,
                date: None
            }
        ));
    }
}
