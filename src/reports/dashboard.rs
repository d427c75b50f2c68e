//! Dashboard Report
//!
//! Headline figures for a scope of transactions: totals, net and savings
//! rate, ranked breakdowns, and a per-day series when the scope is a month.

use chrono::Datelike;
use serde::Serialize;
use std::io::Write;

use crate::config::LedgerConfig;
use crate::display::{format_amount, format_bar, format_percentage, separator, table, PLACEHOLDER};
use crate::error::LedgerResult;
use crate::models::{Month, Transaction};
use crate::services::{
    expense_key, group_sum, is_reentry_transfer, top_entry, AggregationMode, Breakdown,
    RateResolver, TransactionFilter,
};

/// Which transactions the dashboard covers
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardScope {
    /// Records dated in one month
    Month(Month),
    /// The whole history
    All,
    /// Records passing a list filter
    Filtered(TransactionFilter),
}

impl DashboardScope {
    fn select<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        match self {
            Self::Month(month) => transactions
                .iter()
                .filter(|tx| month.contains(tx.date))
                .collect(),
            Self::All => transactions.iter().collect(),
            Self::Filtered(filter) => filter.apply(transactions),
        }
    }
}

/// Per-day totals of a month; index 0 is day 1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    pub month: Month,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
    pub net: Vec<f64>,
}

/// Dashboard Report
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    /// Month covered, for month scope
    pub month: Option<Month>,
    pub mode: AggregationMode,
    pub base_currency: String,
    /// Income in base currency, reentry transfers excluded
    pub income_total: f64,
    /// Expenses in base currency
    pub expense_total: f64,
    /// Income minus expenses over records that count toward net
    pub net: f64,
    /// `net / income_total * 100`, or 0 without income
    pub savings_pct: f64,
    /// Number of records in scope
    pub count: usize,
    /// Mean movement size over records in scope
    pub average: f64,
    /// Expenses by category or group
    pub expense_breakdown: Vec<Breakdown>,
    /// Income by category
    pub income_breakdown: Vec<Breakdown>,
    /// All records by payment source
    pub payment_breakdown: Vec<Breakdown>,
    pub daily: Option<DailySeries>,
}

impl DashboardReport {
    /// Generate the dashboard for a scope
    pub fn generate(
        config: &LedgerConfig,
        transactions: &[Transaction],
        scope: &DashboardScope,
        mode: AggregationMode,
    ) -> Self {
        let rates = RateResolver::new(config);

        let list = scope.select(transactions);
        let (incomes, expenses): (Vec<&Transaction>, Vec<&Transaction>) =
            list.iter().copied().partition(|tx| tx.is_income());

        let income_total: f64 = incomes
            .iter()
            .filter(|tx| !is_reentry_transfer(tx, config))
            .map(|tx| rates.transaction_to_base(tx))
            .sum();
        let expense_total: f64 = expenses
            .iter()
            .map(|tx| rates.transaction_to_base(tx))
            .sum();

        let net: f64 = list
            .iter()
            .filter(|tx| tx.include_in_net)
            .map(|tx| {
                let amount = rates.transaction_to_base(tx);
                if tx.is_income() {
                    amount
                } else {
                    -amount
                }
            })
            .sum();
        let savings_pct = if income_total > 0.0 {
            net / income_total * 100.0
        } else {
            0.0
        };

        let count = list.len();
        let average = if count > 0 {
            (income_total + expense_total) / count as f64
        } else {
            0.0
        };

        let to_base = |tx: &&Transaction| rates.transaction_to_base(tx);
        let expense_breakdown = group_sum(&expenses, |tx| expense_key(tx, config, mode), to_base);
        let income_breakdown = group_sum(&incomes, |tx| tx.category.clone(), to_base);
        let payment_breakdown = group_sum(&list, |tx| tx.payment_source.clone(), to_base);

        let month = match scope {
            DashboardScope::Month(month) => Some(*month),
            _ => None,
        };
        let daily = month.map(|month| {
            let days = month.days() as usize;
            let mut income = vec![0.0; days];
            let mut expense = vec![0.0; days];
            for tx in list.iter().filter(|tx| month.contains(tx.date)) {
                let day = tx.date.day() as usize - 1;
                if tx.is_income() {
                    income[day] += rates.transaction_to_base(tx);
                } else {
                    expense[day] += rates.transaction_to_base(tx);
                }
            }
            let net = income.iter().zip(&expense).map(|(i, e)| i - e).collect();
            DailySeries {
                month,
                income,
                expense,
                net,
            }
        });

        Self {
            month,
            mode,
            base_currency: config.base_currency.clone(),
            income_total,
            expense_total,
            net,
            savings_pct,
            count,
            average,
            expense_breakdown,
            income_breakdown,
            payment_breakdown,
            daily,
        }
    }

    /// Largest expense bucket
    pub fn top_expense(&self) -> Option<&Breakdown> {
        top_entry(&self.expense_breakdown)
    }

    /// Largest income bucket
    pub fn top_income(&self) -> Option<&Breakdown> {
        top_entry(&self.income_breakdown)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let currency = self.base_currency.as_str();
        let mut output = String::new();

        match self.month {
            Some(month) => output.push_str(&format!("Dashboard - {}\n", month)),
            None => output.push_str("Dashboard\n"),
        }
        output.push_str(&separator(40));
        output.push('\n');

        let top = |entry: Option<&Breakdown>| {
            entry
                .map(|b| format!("top: {}", b.key))
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };
        output.push_str(&format!(
            "Income:   {:>20}  {}\n",
            format_amount(self.income_total, currency),
            top(self.top_income())
        ));
        output.push_str(&format!(
            "Expenses: {:>20}  {}\n",
            format_amount(self.expense_total, currency),
            top(self.top_expense())
        ));
        output.push_str(&format!(
            "Net:      {:>20}  {} record(s), avg {}\n",
            format_amount(self.net, currency),
            self.count,
            format_amount(self.average, currency)
        ));
        let savings = if self.income_total > 0.0 {
            format_percentage(self.savings_pct)
        } else {
            PLACEHOLDER.to_string()
        };
        output.push_str(&format!("Savings:  {:>20}\n\n", savings));

        let max = self.expense_breakdown.first().map_or(0.0, |b| b.value);
        let title = match self.mode {
            AggregationMode::Category => "Expenses by category",
            AggregationMode::Group => "Expenses by group",
        };
        output.push_str(&format!("{}\n", title));
        if self.expense_breakdown.is_empty() {
            output.push_str("No expenses.\n");
        } else {
            let rows = self.expense_breakdown.iter().map(|b| {
                vec![
                    b.key.clone(),
                    format_amount(b.value, currency),
                    format_bar(b.value, max, 20),
                ]
            });
            output.push_str(&table(&["Key", "Amount", ""], rows));
            output.push('\n');
        }

        if !self.payment_breakdown.is_empty() {
            output.push_str("\nBy payment source\n");
            let rows = self
                .payment_breakdown
                .iter()
                .map(|b| vec![b.key.clone(), format_amount(b.value, currency)]);
            output.push_str(&table(&["Source", "Amount"], rows));
            output.push('\n');
        }

        output
    }

    /// Export the breakdowns to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["breakdown", "key", "value"])?;

        let sections = [
            ("expense", &self.expense_breakdown),
            ("income", &self.income_breakdown),
            ("payment", &self.payment_breakdown),
        ];
        for (name, breakdown) in sections {
            for b in breakdown {
                csv.write_record([name.to_string(), b.key.clone(), format!("{:.2}", b.value)])?;
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

    fn march() -> Month {
        Month::new(2026, 3).unwrap()
    }

    fn tx(kind: TransactionKind, d: u32, amount: f64, category: &str) -> Transaction {
        Transaction::new(
            kind,
            NaiveDate::from_ymd_opt(2026, 3, d).unwrap(),
            amount,
            "ARS",
            category,
        )
    }

    fn config() -> LedgerConfig {
        let mut config = LedgerConfig::with_base_currency("ARS");
        config.rates_to_base.insert("USD".into(), 1000.0);
        config
            .expense_category_groups
            .insert("Comida".into(), "Esenciales".into());
        config
    }

    fn sample() -> Vec<Transaction> {
        let mut usd = tx(TransactionKind::Expense, 5, 1.0, "Ocio");
        usd.currency = "USD".into();
        vec![
            tx(TransactionKind::Income, 1, 10000.0, "Salario").with_payment_source("Transferencia"),
            tx(TransactionKind::Income, 2, 500.0, "Reintegro").with_payment_source("Reintegro"),
            tx(TransactionKind::Expense, 3, 2000.0, "Comida").with_payment_source("Tarjeta"),
            tx(TransactionKind::Expense, 3, 1500.0, "Hogar")
                .with_payment_source("Tarjeta")
                .excluded_from_net(),
            usd.with_payment_source("Efectivo"),
            Transaction::new(
                TransactionKind::Expense,
                NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
                50.0,
                "ARS",
                "Comida",
            ),
        ]
    }

    #[test]
    fn test_month_kpis() {
        let report = DashboardReport::generate(
            &config(),
            &sample(),
            &DashboardScope::Month(march()),
            AggregationMode::Category,
        );

        assert_eq!(report.income_total, 10000.0);
        assert_eq!(report.expense_total, 4500.0);
        assert_eq!(report.net, 10500.0 - 3000.0);
        assert_eq!(report.savings_pct, 75.0);
        assert_eq!(report.count, 5);
        assert_eq!(report.average, 14500.0 / 5.0);
        assert_eq!(report.top_expense().unwrap().key, "Comida");
        assert_eq!(report.top_income().unwrap().key, "Salario");
    }

    #[test]
    fn test_accented_reentry_label_left_out_of_income() {
        let mut config = config();
        config.reentry_categories = vec!["Devolución".into()];
        let txs = vec![
            tx(TransactionKind::Income, 1, 1000.0, "Salario").with_payment_source("Transferencia"),
            tx(TransactionKind::Income, 2, 300.0, "Reembolso").with_payment_source("DEVOLUCIÓN"),
        ];

        let report = DashboardReport::generate(
            &config,
            &txs,
            &DashboardScope::Month(march()),
            AggregationMode::Category,
        );

        assert_eq!(report.income_total, 1000.0);
        assert_eq!(report.net, 1300.0);
    }

    #[test]
    fn test_daily_series_spans_month() {
        let report = DashboardReport::generate(
            &config(),
            &sample(),
            &DashboardScope::Month(march()),
            AggregationMode::Category,
        );
        let daily = report.daily.unwrap();

        assert_eq!(daily.income.len(), 31);
        assert_eq!(daily.income[0], 10000.0);
        assert_eq!(daily.expense[2], 3500.0);
        assert_eq!(daily.net[2], -3500.0);
        assert_eq!(daily.expense[30], 0.0);
    }

    #[test]
    fn test_all_scope_and_group_mode() {
        let report = DashboardReport::generate(
            &config(),
            &sample(),
            &DashboardScope::All,
            AggregationMode::Group,
        );

        assert!(report.daily.is_none());
        assert_eq!(report.count, 6);
        assert_eq!(report.expense_breakdown[0].key, "Esenciales");
        assert_eq!(report.expense_breakdown[0].value, 2050.0);
        assert!(report.expense_breakdown.iter().any(|b| b.key == "Hogar"));
    }

    #[test]
    fn test_filtered_scope() {
        let filter = TransactionFilter {
            category: Some("Comida".into()),
            ..TransactionFilter::default()
        };
        let report = DashboardReport::generate(
            &config(),
            &sample(),
            &DashboardScope::Filtered(filter),
            AggregationMode::Category,
        );

        assert_eq!(report.count, 2);
        assert_eq!(report.expense_total, 2050.0);
        assert_eq!(report.savings_pct, 0.0);
        assert!(report.format_terminal().contains(PLACEHOLDER));
    }

    #[test]
    fn test_payment_breakdown_covers_all_records() {
        let report = DashboardReport::generate(
            &config(),
            &sample(),
            &DashboardScope::Month(march()),
            AggregationMode::Category,
        );

        assert_eq!(report.payment_breakdown[0].key, "Transferencia");
        let tarjeta = report
            .payment_breakdown
            .iter()
            .find(|b| b.key == "Tarjeta")
            .unwrap();
        assert_eq!(tarjeta.value, 3500.0);
    }

    #[test]
    fn test_empty_scope() {
        let report = DashboardReport::generate(
            &config(),
            &[],
            &DashboardScope::Month(march()),
            AggregationMode::Category,
        );
        assert_eq!(report.count, 0);
        assert_eq!(report.average, 0.0);
        assert_eq!(report.savings_pct, 0.0);
        assert!(report.format_terminal().contains("No expenses."));
    }

    #[test]
    fn test_csv_export() {
        let report = DashboardReport::generate(
            &config(),
            &sample(),
            &DashboardScope::Month(march()),
            AggregationMode::Category,
        );
        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.starts_with("breakdown,key,value"));
        assert!(csv.contains("expense,Comida,2000.00"));
        assert!(csv.contains("income,Salario,10000.00"));
    }
}
