//! Exchange rate CLI commands

use clap::Subcommand;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::display::table;
use crate::services::{parse_date, RateResolver};
use crate::storage::Storage;

/// Rate subcommands
#[derive(Subcommand, Debug)]
pub enum RateCommands {
    /// Show the effective rate of every configured currency
    Show {
        /// Date to resolve at (YYYY-MM-DD); without it only fallback rates apply
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Resolve one currency's rate
    Get {
        /// Currency code
        currency: String,

        /// Date to resolve at (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// Rate executed on the transaction, which wins over configured rates
        #[arg(long)]
        pinned: Option<f64>,
    },

    /// Set a fallback rate, or a month's rate with --month
    Set {
        /// Currency code
        currency: String,

        /// Units of base currency per unit
        rate: f64,

        /// Month the rate applies to (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a rate command
pub fn handle_rate_command(storage: &mut Storage, cmd: RateCommands) -> LedgerResult<()> {
    match cmd {
        RateCommands::Show { date } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            let resolver = RateResolver::new(&storage.config);
            let rows = resolver
                .table(date)
                .into_iter()
                .map(|(currency, rate)| vec![currency, format!("{:.4}", rate)]);

            match date {
                Some(date) => println!("Rates to {} on {}", storage.config.base_currency, date),
                None => println!("Fallback rates to {}", storage.config.base_currency),
            }
            println!("{}", table(&["Currency", "Rate"], rows));
            Ok(())
        }

        RateCommands::Get {
            currency,
            date,
            pinned,
        } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            let currency = currency.trim().to_uppercase();
            let rate = RateResolver::new(&storage.config).resolve(&currency, date, pinned);
            println!("{}", rate);
            Ok(())
        }

        RateCommands::Set {
            currency,
            rate,
            month,
        } => {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(LedgerError::Validation(format!(
                    "Rate must be a positive number, got {}",
                    rate
                )));
            }
            let currency = currency.trim().to_uppercase();
            if currency == storage.config.base_currency {
                return Err(LedgerError::Validation(format!(
                    "{} is the base currency; its rate is always 1",
                    currency
                )));
            }

            let config = &mut storage.config;
            match month {
                Some(month) => {
                    let month = crate::models::Month::parse(&month)?;
                    config
                        .rates_by_month
                        .entry(month.to_string())
                        .or_default()
                        .insert(currency.clone(), rate);
                    println!("Set {} rate for {} to {}", currency, month, rate);
                }
                None => {
                    config.rates_to_base.insert(currency.clone(), rate);
                    if !config.currencies.contains(&currency) {
                        config.currencies.push(currency.clone());
                    }
                    println!("Set fallback {} rate to {}", currency, rate);
                }
            }

            storage.config.save(storage.paths())?;
            info!(currency = %currency, rate, "rate updated");
            Ok(())
        }
    }
}
