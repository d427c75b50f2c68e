//! Budget Status Report
//!
//! Compares a month's base-currency spending against the configured limits,
//! by category or by group, and classifies each budget into a status tier.

use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::config::LedgerConfig;
use crate::display::{format_amount, format_percentage, table, PLACEHOLDER};
use crate::error::LedgerResult;
use crate::models::{BudgetBook, BudgetKind, Month, Transaction};
use crate::services::{expense_key, group_sum, AggregationMode, Breakdown, RateResolver};

/// Share of the limit at which a budget turns to a warning
pub const WARN_THRESHOLD: f64 = 80.0;

/// Share of the limit at which a budget is exceeded
pub const DANGER_THRESHOLD: f64 = 100.0;

/// Status tier of a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Ok,
    Warn,
    Danger,
}

impl BudgetStatus {
    /// Classify a spent percentage; both thresholds are inclusive
    pub fn from_pct(pct: f64) -> Self {
        if pct >= DANGER_THRESHOLD {
            Self::Danger
        } else if pct >= WARN_THRESHOLD {
            Self::Warn
        } else {
            Self::Ok
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warn => write!(f, "warn"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

fn budget_kind(mode: AggregationMode) -> BudgetKind {
    match mode {
        AggregationMode::Category => BudgetKind::Category,
        AggregationMode::Group => BudgetKind::Group,
    }
}

/// A budget with a configured limit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatusRow {
    pub label: String,
    pub spent: f64,
    pub limit: f64,
    pub pct: f64,
    pub status: BudgetStatus,
}

/// A line of the full spending table; limit-less keys carry no percentage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetTableRow {
    pub label: String,
    pub spent: f64,
    pub limit: Option<f64>,
    pub pct: Option<f64>,
    pub status: Option<BudgetStatus>,
}

/// Budget Status Report
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatusReport {
    pub month: Month,
    pub mode: AggregationMode,
    pub base_currency: String,
    /// Budgets with a limit, most consumed first
    pub rows: Vec<BudgetStatusRow>,
    /// Every key with spending or a limit, biggest spend first
    pub table: Vec<BudgetTableRow>,
    /// The month's expense breakdown in `mode`
    pub spending: Vec<Breakdown>,
}

impl BudgetStatusReport {
    /// Evaluate the budgets of `month`
    pub fn generate(
        config: &LedgerConfig,
        transactions: &[Transaction],
        budgets: &BudgetBook,
        month: Month,
        mode: AggregationMode,
    ) -> Self {
        let rates = RateResolver::new(config);

        let expenses: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.is_expense() && month.contains(tx.date))
            .collect();

        let spending = group_sum(
            &expenses,
            |tx| expense_key(tx, config, mode),
            |tx| rates.transaction_to_base(tx),
        );
        let spent_of = |label: &str| {
            spending
                .iter()
                .find(|b| b.key == label)
                .map_or(0.0, |b| b.value)
        };

        let limits = budgets.limits_for(month, budget_kind(mode));

        let mut rows: Vec<BudgetStatusRow> = limits
            .iter()
            .map(|(label, limit)| {
                let spent = spent_of(label);
                let pct = spent / limit * 100.0;
                BudgetStatusRow {
                    label: label.to_string(),
                    spent,
                    limit: *limit,
                    pct,
                    status: BudgetStatus::from_pct(pct),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.pct.total_cmp(&a.pct));

        let mut table: Vec<BudgetTableRow> = spending
            .iter()
            .map(|b| b.key.as_str())
            .chain(
                limits
                    .iter()
                    .map(|(label, _)| *label)
                    .filter(|label| spending.iter().all(|b| b.key != *label)),
            )
            .map(|label| {
                let spent = spent_of(label);
                let limit = limits.iter().find(|(l, _)| *l == label).map(|(_, v)| *v);
                let pct = limit.map(|limit| spent / limit * 100.0);
                BudgetTableRow {
                    label: label.to_string(),
                    spent,
                    limit,
                    pct,
                    status: pct.map(BudgetStatus::from_pct),
                }
            })
            .collect();
        table.sort_by(|a, b| b.spent.total_cmp(&a.spent));

        Self {
            month,
            mode,
            base_currency: config.base_currency.clone(),
            rows,
            table,
            spending,
        }
    }

    /// The `n` most consumed budgets
    pub fn worst(&self, n: usize) -> &[BudgetStatusRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Count of budgets at or over their limit
    pub fn exceeded_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.status == BudgetStatus::Danger)
            .count()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = format!("Budget Status - {} (by {:?})\n", self.month, self.mode);

        if self.rows.is_empty() {
            output.push_str(&format!("No budgets defined for {}.\n\n", self.month));
        } else {
            let rows = self.rows.iter().map(|r| {
                vec![
                    r.label.clone(),
                    format_amount(r.spent, &self.base_currency),
                    format_amount(r.limit, &self.base_currency),
                    format_percentage(r.pct),
                    r.status.to_string(),
                ]
            });
            output.push_str(&table(&["Budget", "Spent", "Limit", "%", "Status"], rows));
            output.push_str("\n\n");
        }

        output.push_str("Spending\n");
        let rows = self.table.iter().map(|r| {
            vec![
                r.label.clone(),
                format_amount(r.spent, &self.base_currency),
                r.limit
                    .map(|l| format_amount(l, &self.base_currency))
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                r.pct
                    .map(format_percentage)
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            ]
        });
        output.push_str(&table(&["Key", "Spent", "Limit", "%"], rows));
        output.push('\n');

        output
    }

    /// Export the spending table to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["month", "key", "spent", "limit", "pct", "status"])?;

        for row in &self.table {
            csv.write_record([
                self.month.to_string(),
                row.label.clone(),
                format!("{:.2}", row.spent),
                row.limit.map(|l| format!("{:.2}", l)).unwrap_or_default(),
                row.pct.map(|p| format!("{:.2}", p)).unwrap_or_default(),
                row.status.map(|s| s.to_string()).unwrap_or_default(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}
