//! FX CLI commands
//!
//! Records monthly currency purchases and sales, and lists a month's
//! operations.

use clap::Subcommand;
use tracing::info;

use crate::display::{format_amount, table};
use crate::error::LedgerResult;
use crate::reports::{fx_operation, operations, FxSide};
use crate::storage::Storage;

use super::parse_month_or_current;

/// FX subcommands
#[derive(Subcommand, Debug)]
pub enum FxCommands {
    /// Record a buy or sell of foreign currency
    Record {
        /// buy or sell
        #[arg(value_enum)]
        side: FxSide,

        /// Currency code (e.g., USD)
        currency: String,

        /// Quantity of the currency
        amount: f64,

        /// Month of the operation (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List a month's FX operations
    List {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle an FX command
pub fn handle_fx_command(storage: &mut Storage, cmd: FxCommands) -> LedgerResult<()> {
    match cmd {
        FxCommands::Record {
            side,
            currency,
            amount,
            month,
            notes,
        } => {
            let month = parse_month_or_current(month.as_deref())?;
            let tx = fx_operation(side, month, &currency, amount, &notes)?;
            let summary = format!(
                "Recorded {} of {} for {}\n  ID: {}",
                side,
                format_amount(tx.amount, &tx.currency),
                month,
                tx.id
            );
            let id = tx.id.clone();

            storage.transactions.insert(tx);
            storage.transactions.save()?;

            info!(%id, %side, "fx operation recorded");
            println!("{}", summary);
            Ok(())
        }

        FxCommands::List { month } => {
            let month = parse_month_or_current(month.as_deref())?;
            let ops = operations(storage.transactions.all(), month);

            if ops.is_empty() {
                println!("No FX operations in {}.", month);
                return Ok(());
            }

            let rows = ops.iter().map(|op| {
                vec![
                    op.date.to_string(),
                    op.side.to_string(),
                    format_amount(op.amount, &op.currency),
                    op.notes.clone(),
                    op.id.to_string(),
                ]
            });
            println!("FX operations for {}", month);
            println!("{}", table(&["Date", "Side", "Amount", "Notes", "ID"], rows));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::error::LedgerError;
    use tempfile::TempDir;

    fn buy() -> FxCommands {
        FxCommands::Record {
            side: FxSide::Buy,
            currency: "usd".into(),
            amount: 100.0,
            month: Some("2026-03".into()),
            notes: String::new(),
        }
    }

    #[test]
    fn test_record_saves_operation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::load(paths.clone()).unwrap();

        handle_fx_command(&mut storage, buy()).unwrap();

        let reloaded = Storage::load(paths).unwrap();
        let month = crate::models::Month::new(2026, 3).unwrap();
        let ops = operations(reloaded.transactions.all(), month);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].currency, "USD");
        assert_eq!(ops[0].side, FxSide::Buy);
    }

    #[test]
    fn test_record_reports_failed_save() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::load(paths.clone()).unwrap();
        std::fs::write(paths.data_dir(), "not a directory").unwrap();

        let err = handle_fx_command(&mut storage, buy()).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }
}
