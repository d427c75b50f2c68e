//! Budget CLI commands
//!
//! Sets and lists monthly spending limits per category or group.

use clap::Subcommand;
use tracing::info;

use crate::display::report::{format_amount, table};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetKey, BudgetKind};
use crate::storage::Storage;

use super::parse_month_or_current;

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Set a monthly limit (0 removes it)
    Set {
        /// Category name, or group name with --group
        name: String,

        /// Limit in base currency
        limit: f64,

        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Treat the name as an expense group
        #[arg(short, long)]
        group: bool,
    },

    /// List the limits configured for a month
    List {
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &mut Storage, cmd: BudgetCommands) -> LedgerResult<()> {
    match cmd {
        BudgetCommands::Set {
            name,
            limit,
            month,
            group,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(LedgerError::Validation("Budget name cannot be empty".into()));
            }
            if !limit.is_finite() || limit < 0.0 {
                return Err(LedgerError::Validation(format!(
                    "Budget limit must be zero or positive, got {}",
                    limit
                )));
            }

            let month = parse_month_or_current(month.as_deref())?;
            let key = if group {
                BudgetKey::group(name.clone())
            } else {
                BudgetKey::category(name.clone())
            };

            storage.budgets.set_limit(month, key, limit);
            storage.budgets.save()?;
            info!(%month, name = %name, limit, "budget limit updated");

            if limit > 0.0 {
                println!(
                    "Set {} budget for {} in {}: {}",
                    if group { "group" } else { "category" },
                    name,
                    month,
                    format_amount(limit, &storage.config.base_currency)
                );
            } else {
                println!("Removed budget for {} in {}", name, month);
            }
            Ok(())
        }

        BudgetCommands::List { month } => {
            let month = parse_month_or_current(month.as_deref())?;
            let book = storage.budgets.book();
            let base = &storage.config.base_currency;

            let rows: Vec<Vec<String>> = [BudgetKind::Category, BudgetKind::Group]
                .into_iter()
                .flat_map(|kind| {
                    book.limits_for(month, kind)
                        .into_iter()
                        .map(move |(name, limit)| {
                            vec![name.to_string(), kind.to_string(), format_amount(limit, base)]
                        })
                })
                .collect();

            if rows.is_empty() {
                println!("No budgets set for {}.", month);
            } else {
                println!("Budgets for {}", month);
                println!("{}", table(&["Name", "Kind", "Limit"], rows));
            }
            Ok(())
        }
    }
}
