//! Monthly Comparison Report
//!
//! Rolling windows of consecutive calendar months ending at an anchor month:
//! income, expense and net per month, and a per-label spending series whose
//! label order is fixed across the whole window.

use serde::Serialize;
use std::io::Write;

use crate::config::LedgerConfig;
use crate::display::{format_amount, table};
use crate::error::LedgerResult;
use crate::models::{Month, Transaction};
use crate::services::{expense_key, group_sum, is_reentry_transfer, AggregationMode, RateResolver};

/// Default number of months in a comparison window
pub const DEFAULT_WINDOW: usize = 6;

/// Income, expense and net per month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyComparison {
    /// Oldest first; always `window` entries
    pub months: Vec<Month>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
    pub net: Vec<f64>,
    pub base_currency: String,
}

impl MonthlyComparison {
    /// Build the `window` months ending at `anchor`
    ///
    /// Income excludes reentry transfers. Months without records are zero.
    pub fn build(
        config: &LedgerConfig,
        transactions: &[Transaction],
        anchor: Month,
        window: usize,
    ) -> Self {
        let rates = RateResolver::new(config);
        let months = anchor.window_ending(window);
        let mut income = vec![0.0; months.len()];
        let mut expense = vec![0.0; months.len()];

        for tx in transactions {
            let Some(i) = months.iter().position(|m| m.contains(tx.date)) else {
                continue;
            };
            if tx.is_expense() {
                expense[i] += rates.transaction_to_base(tx);
            } else if !is_reentry_transfer(tx, config) {
                income[i] += rates.transaction_to_base(tx);
            }
        }

        let net = income.iter().zip(&expense).map(|(i, e)| i - e).collect();

        Self {
            months,
            income,
            expense,
            net,
            base_currency: config.base_currency.clone(),
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = format!(
            "Monthly Comparison ({} months, {})\n",
            self.months.len(),
            self.base_currency
        );

        let rows = self.months.iter().enumerate().map(|(i, month)| {
            vec![
                month.to_string(),
                format_amount(self.income[i], &self.base_currency),
                format_amount(self.expense[i], &self.base_currency),
                format_amount(self.net[i], &self.base_currency),
            ]
        });
        output.push_str(&table(&["Month", "Income", "Expense", "Net"], rows));
        output.push('\n');
        output
    }

    /// Export the comparison to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["month", "income", "expense", "net"])?;
        for (i, month) in self.months.iter().enumerate() {
            csv.write_record([
                month.to_string(),
                format!("{:.2}", self.income[i]),
                format!("{:.2}", self.expense[i]),
                format!("{:.2}", self.net[i]),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Spending per label per month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdownSeries {
    pub months: Vec<Month>,
    pub mode: AggregationMode,
    /// Ranked once by spend across the whole window
    pub labels: Vec<String>,
    /// `series[i][j]` is the spend of `labels[i]` in `months[j]`
    pub series: Vec<Vec<f64>>,
    pub base_currency: String,
}

impl CategoryBreakdownSeries {
    /// Build the per-label series for the `window` months ending at `anchor`
    ///
    /// With a `subset`, only those labels are kept (in ranking order, unspent
    /// ones last with zeros). Otherwise every label with nonzero spend is.
    pub fn build(
        config: &LedgerConfig,
        transactions: &[Transaction],
        anchor: Month,
        window: usize,
        mode: AggregationMode,
        subset: Option<&[String]>,
    ) -> Self {
        let rates = RateResolver::new(config);
        let months = anchor.window_ending(window);

        let expenses: Vec<(usize, &Transaction)> = transactions
            .iter()
            .filter(|tx| tx.is_expense())
            .filter_map(|tx| {
                months
                    .iter()
                    .position(|m| m.contains(tx.date))
                    .map(|i| (i, tx))
            })
            .collect();

        let ranking = group_sum(
            &expenses,
            |(_, tx)| expense_key(tx, config, mode),
            |(_, tx)| rates.transaction_to_base(tx),
        );

        let labels: Vec<String> = match subset {
            Some(subset) => {
                let mut labels: Vec<String> = ranking
                    .iter()
                    .filter(|b| subset.contains(&b.key))
                    .map(|b| b.key.clone())
                    .collect();
                for label in subset {
                    if !labels.contains(label) {
                        labels.push(label.clone());
                    }
                }
                labels
            }
            None => ranking
                .iter()
                .filter(|b| b.value != 0.0)
                .map(|b| b.key.clone())
                .collect(),
        };

        let mut series = vec![vec![0.0; months.len()]; labels.len()];
        for (j, tx) in &expenses {
            let key = expense_key(tx, config, mode);
            if let Some(i) = labels.iter().position(|l| *l == key) {
                series[i][*j] += rates.transaction_to_base(tx);
            }
        }

        Self {
            months,
            mode,
            labels,
            series,
            base_currency: config.base_currency.clone(),
        }
    }

    /// Total spend of one label across the window
    pub fn label_total(&self, label: &str) -> f64 {
        self.labels
            .iter()
            .position(|l| l == label)
            .map_or(0.0, |i| self.series[i].iter().sum())
    }

    /// Format the series for terminal display, one row per label
    pub fn format_terminal(&self) -> String {
        let mut output = format!("Spending by {:?} ({})\n", self.mode, self.base_currency);

        if self.labels.is_empty() {
            output.push_str("No spending in this window.\n");
            return output;
        }

        let month_labels: Vec<String> = self.months.iter().map(Month::to_string).collect();
        let mut header: Vec<&str> = vec!["Label"];
        header.extend(month_labels.iter().map(String::as_str));

        let rows = self.labels.iter().zip(&self.series).map(|(label, values)| {
            std::iter::once(label.clone())
                .chain(values.iter().map(|v| format!("{:.2}", v)))
                .collect::<Vec<_>>()
        });
        output.push_str(&table(&header, rows));
        output.push('\n');
        output
    }

    /// Export the series in long form: one line per label and month
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["label", "month", "spent"])?;
        for (label, values) in self.labels.iter().zip(&self.series) {
            for (month, value) in self.months.iter().zip(values) {
                csv.write_record([label.clone(), month.to_string(), format!("{:.2}", value)])?;
            }
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::NaiveDate;

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn tx(kind: TransactionKind, y: i32, m: u32, amount: f64, category: &str) -> Transaction {
        Transaction::new(
            kind,
            NaiveDate::from_ymd_opt(y, m, 10).unwrap(),
            amount,
            "ARS",
            category,
        )
    }

    fn config() -> LedgerConfig {
        let mut config = LedgerConfig::with_base_currency("ARS");
        config
            .expense_category_groups
            .insert("Comida".into(), "Esenciales".into());
        config
            .expense_category_groups
            .insert("Salud".into(), "Esenciales".into());
        config
    }

    #[test]
    fn test_window_of_three_months() {
        let report = MonthlyComparison::build(&config(), &[], month(2026, 3), 3);
        let labels: Vec<String> = report.months.iter().map(Month::to_string).collect();
        assert_eq!(labels, vec!["2026-01", "2026-02", "2026-03"]);
        assert_eq!(report.income, vec![0.0; 3]);
        assert_eq!(report.net, vec![0.0; 3]);
    }

    #[test]
    fn test_window_rolls_over_year() {
        let txs = vec![tx(TransactionKind::Expense, 2025, 12, 40.0, "Comida")];
        let report = MonthlyComparison::build(&config(), &txs, month(2026, 2), 4);
        let labels: Vec<String> = report.months.iter().map(Month::to_string).collect();
        assert_eq!(labels, vec!["2025-11", "2025-12", "2026-01", "2026-02"]);
        assert_eq!(report.expense, vec![0.0, 40.0, 0.0, 0.0]);
        assert_eq!(report.net, vec![0.0, -40.0, 0.0, 0.0]);
    }

    #[test]
    fn test_income_excludes_reentry() {
        let reentry = tx(TransactionKind::Income, 2026, 3, 500.0, "Reintegro")
            .with_payment_source("reintegro");
        let txs = vec![
            tx(TransactionKind::Income, 2026, 3, 1000.0, "Salario"),
            tx(TransactionKind::Expense, 2026, 3, 300.0, "Comida"),
            reentry,
            tx(TransactionKind::Income, 2025, 1, 77.0, "Salario"),
        ];

        let report = MonthlyComparison::build(&config(), &txs, month(2026, 3), 2);
        assert_eq!(report.income, vec![0.0, 1000.0]);
        assert_eq!(report.expense, vec![0.0, 300.0]);
        assert_eq!(report.net, vec![0.0, 700.0]);
    }

    #[test]
    fn test_breakdown_ranked_once_over_window() {
        let txs = vec![
            tx(TransactionKind::Expense, 2026, 1, 100.0, "Ocio"),
            tx(TransactionKind::Expense, 2026, 2, 30.0, "Comida"),
            tx(TransactionKind::Expense, 2026, 3, 90.0, "Comida"),
            tx(TransactionKind::Expense, 2026, 3, 5.0, "Ropa"),
            tx(TransactionKind::Income, 2026, 3, 999.0, "Salario"),
        ];

        let series = CategoryBreakdownSeries::build(
            &config(),
            &txs,
            month(2026, 3),
            3,
            AggregationMode::Category,
            None,
        );
        assert_eq!(series.labels, vec!["Comida", "Ocio", "Ropa"]);
        assert_eq!(series.series[0], vec![0.0, 30.0, 90.0]);
        assert_eq!(series.series[1], vec![100.0, 0.0, 0.0]);
        assert_eq!(series.label_total("Comida"), 120.0);
    }

    #[test]
    fn test_breakdown_group_mode_and_subset() {
        let txs = vec![
            tx(TransactionKind::Expense, 2026, 3, 10.0, "Comida"),
            tx(TransactionKind::Expense, 2026, 3, 15.0, "Salud"),
            tx(TransactionKind::Expense, 2026, 3, 50.0, "Ocio"),
        ];
        let subset = vec!["Esenciales".to_string(), "Viajes".to_string()];

        let series = CategoryBreakdownSeries::build(
            &config(),
            &txs,
            month(2026, 3),
            1,
            AggregationMode::Group,
            Some(&subset),
        );
        assert_eq!(series.labels, vec!["Esenciales", "Viajes"]);
        assert_eq!(series.series, vec![vec![25.0], vec![0.0]]);
    }

    #[test]
    fn test_csv_export() {
        let txs = vec![tx(TransactionKind::Expense, 2026, 3, 10.0, "Comida")];
        let report = MonthlyComparison::build(&config(), &txs, month(2026, 3), 2);

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.contains("2026-02,0.00,0.00,0.00"));
        assert!(csv.contains("2026-03,0.00,10.00,-10.00"));
    }
}
