//! Transaction CLI commands
//!
//! Implements CLI commands for recording, listing and removing transactions.

use clap::Subcommand;
use tracing::info;

use crate::display::report::{format_amount, table};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{RawNumber, RawTags, RawTransaction, TransactionId, TransactionKind};
use crate::services::{normalize, parse_date, sort_transactions, RateResolver, TransactionFilter};
use crate::storage::Storage;

use super::report::parse_kind;

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// income or expense
        #[arg(value_parser = parse_kind)]
        kind: TransactionKind,

        /// Amount, greater than zero
        amount: f64,

        /// Currency code, defaults to the base currency
        #[arg(long)]
        currency: Option<String>,

        /// Category name
        #[arg(short, long)]
        category: Option<String>,

        /// Payment method (expenses) or source (income)
        #[arg(short, long)]
        pay: Option<String>,

        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Merchant or origin
        #[arg(long)]
        vendor: Option<String>,

        /// Short description
        #[arg(long)]
        desc: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Notes
        #[arg(long)]
        notes: Option<String>,

        /// Executed exchange rate to pin on the record
        #[arg(long)]
        fx_rate: Option<f64>,

        /// Leave the record out of net totals
        #[arg(long)]
        exclude_from_net: bool,
    },

    /// List transactions, newest first
    List {
        /// Only records containing this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only records of this type
        #[arg(long, value_parser = parse_kind)]
        kind: Option<TransactionKind>,

        /// Only records in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &mut Storage,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            currency,
            category,
            pay,
            date,
            vendor,
            desc,
            tags,
            notes,
            fx_rate,
            exclude_from_net,
        } => {
            let raw = RawTransaction {
                kind: Some(kind.as_str().to_string()),
                date,
                amount: Some(RawNumber::Number(amount)),
                currency: currency.map(|c| c.trim().to_uppercase()),
                category,
                payment_source: pay,
                vendor,
                description: desc,
                tags: tags.map(RawTags::Text),
                notes,
                fx_rate: fx_rate.map(RawNumber::Number),
                include_in_net: Some(!exclude_from_net),
                ..Default::default()
            };
            let tx = normalize(raw, &storage.config)?;
            let base = RateResolver::new(&storage.config).transaction_to_base(&tx);

            let summary = format!(
                "Added {} {} on {} in {} ({})\n  ID: {}",
                tx.kind,
                format_amount(tx.amount, &tx.currency),
                tx.date,
                tx.category,
                format_amount(base, &storage.config.base_currency),
                tx.id
            );
            let id = tx.id.clone();

            storage.transactions.insert(tx);
            storage.transactions.save()?;

            info!(%id, "transaction added");
            println!("{}", summary);
            Ok(())
        }

        TransactionCommands::List {
            search,
            kind,
            category,
            from,
            to,
            limit,
        } => {
            let filter = TransactionFilter {
                search,
                kind,
                category,
                from: from.as_deref().map(parse_date).transpose()?,
                to: to.as_deref().map(parse_date).transpose()?,
            };
            let matched: Vec<_> = filter
                .apply(storage.transactions.all())
                .into_iter()
                .cloned()
                .collect();

            if matched.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }

            let rates = RateResolver::new(&storage.config);
            let base = &storage.config.base_currency;
            let sorted = sort_transactions(&matched);
            let rows = sorted.iter().take(limit).map(|tx| {
                vec![
                    tx.date.to_string(),
                    tx.kind.to_string(),
                    tx.category.clone(),
                    format_amount(tx.amount, &tx.currency),
                    format_amount(rates.transaction_to_base(tx), base),
                    tx.id.to_string(),
                ]
            });

            println!(
                "{}",
                table(&["Date", "Type", "Category", "Amount", "Base", "ID"], rows)
            );
            if sorted.len() > limit {
                println!("Showing {} of {} transactions", limit, sorted.len());
            }
            Ok(())
        }

        TransactionCommands::Delete { id } => {
            let id = TransactionId::from_external(id);
            let removed = storage
                .transactions
                .remove(&id)
                .ok_or_else(|| LedgerError::Validation(format!("No transaction with ID {}", id)))?;
            storage.transactions.save()?;

            info!(id = %removed.id, "transaction deleted");
            println!(
                "Deleted {} {} on {}",
                removed.kind,
                format_amount(removed.amount, &removed.currency),
                removed.date
            );
            Ok(())
        }
    }
}
