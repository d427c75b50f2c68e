//! CSV Export functionality
//!
//! Exports transactions (with their base-currency amount) and budget limits
//! to spreadsheet-friendly CSV.

use std::io::Write;

use crate::config::LedgerConfig;
use crate::error::LedgerResult;
use crate::models::{BudgetBook, BudgetEntry, Transaction};
use crate::services::{sort_transactions, RateResolver};

/// Column header of the transaction export
pub const TRANSACTION_COLUMNS: [&str; 12] = [
    "type",
    "date",
    "amount",
    "currency",
    "amount_base",
    "base_currency",
    "category",
    "pay",
    "vendor",
    "desc",
    "tags",
    "notes",
];

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Export transactions to CSV, newest first
pub fn export_transactions_csv<W: Write>(
    config: &LedgerConfig,
    transactions: &[Transaction],
    writer: W,
) -> LedgerResult<()> {
    let rates = RateResolver::new(config);
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(TRANSACTION_COLUMNS)?;

    for tx in sort_transactions(transactions) {
        csv.write_record([
            tx.kind.as_str().to_string(),
            tx.date.to_string(),
            tx.amount.to_string(),
            tx.currency.clone(),
            rates.transaction_to_base(&tx).to_string(),
            config.base_currency.clone(),
            tx.category.clone(),
            tx.payment_source.clone(),
            single_line(&tx.vendor),
            single_line(&tx.description),
            tx.tags.join("|"),
            single_line(&tx.notes),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Export budget limits to CSV, one line per month and key
pub fn export_budgets_csv<W: Write>(budgets: &BudgetBook, writer: W) -> LedgerResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record(["month", "kind", "name", "limit"])?;

    for entry in Vec::<BudgetEntry>::from(budgets.clone()) {
        csv.write_record([
            entry.month.to_string(),
            entry.kind.to_string(),
            entry.name,
            format!("{:.2}", entry.limit),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetKey, Month, TransactionKind};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_transactions_csv_columns_and_order() {
        let mut config = LedgerConfig::with_base_currency("ARS");
        config.rates_to_base.insert("USD".into(), 1000.0);

        let mut usd = Transaction::new(TransactionKind::Expense, date(9), 2.5, "USD", "Ocio")
            .with_payment_source("Tarjeta");
        usd.tags = vec!["viaje".into(), "amigos".into()];
        usd.notes = "linea uno\nlinea dos".into();
        let older = Transaction::new(TransactionKind::Income, date(1), 100.0, "ARS", "Salario")
            .with_payment_source("Transferencia");

        let mut out = Vec::new();
        export_transactions_csv(&config, &[older, usd], &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "type,date,amount,currency,amount_base,base_currency,category,pay,vendor,desc,tags,notes"
        );
        assert_eq!(
            lines[1],
            "expense,2026-03-09,2.5,USD,2500,ARS,Ocio,Tarjeta,,,viaje|amigos,linea uno linea dos"
        );
        assert!(lines[2].starts_with("income,2026-03-01,100,ARS,100,ARS,Salario"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let config = LedgerConfig::default();
        let mut tx = Transaction::new(TransactionKind::Expense, date(2), 1.0, "ARS", "Comida");
        tx.vendor = "Panadería, centro".into();

        let mut out = Vec::new();
        export_transactions_csv(&config, &[tx], &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\"Panadería, centro\""));
    }

    #[test]
    fn test_budgets_csv() {
        let mut budgets = BudgetBook::new();
        let march = Month::new(2026, 3).unwrap();
        budgets.set_limit(march, BudgetKey::category("Comida"), 1000.0);
        budgets.set_limit(march, BudgetKey::group("Esenciales"), 2500.0);

        let mut out = Vec::new();
        export_budgets_csv(&budgets, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert!(csv.contains("2026-03,category,Comida,1000.00"));
        assert!(csv.contains("2026-03,group,Esenciales,2500.00"));
    }
}
