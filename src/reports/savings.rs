//! Savings Report
//!
//! Tracks the running position held in non-base currencies from buy/sell
//! operations and values it in USD, both today and month by month.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use tracing::trace;

use crate::config::LedgerConfig;
use crate::display::{format_amount, format_percentage, table};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Month, Transaction, TransactionId, TransactionKind};
use crate::services::normalize::{BUY_FX_CATEGORY, SELL_FX_CATEGORY};
use crate::services::rates::USD;
use crate::services::{is_fx_category_tx, is_tracked_fx_tx, RateResolver};

/// Vendor label of operations recorded through [`fx_operation`]
pub const FX_OPERATION_VENDOR: &str = "Operación mensual de divisas";

/// Direction of an FX operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FxSide {
    Buy,
    Sell,
}

impl FxSide {
    /// Buys are stored as expenses, sells as income
    pub fn of(tx: &Transaction) -> Self {
        if tx.category == SELL_FX_CATEGORY {
            Self::Sell
        } else if tx.category == BUY_FX_CATEGORY || tx.is_expense() {
            Self::Buy
        } else {
            Self::Sell
        }
    }
}

impl fmt::Display for FxSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Build the transaction recording a monthly buy or sell of `currency`
///
/// The operation is dated on the first day of `month`.
pub fn fx_operation(
    side: FxSide,
    month: Month,
    currency: &str,
    amount: f64,
    notes: &str,
) -> LedgerResult<Transaction> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::Validation(format!(
            "FX amount must be a positive number, got {}",
            amount
        )));
    }
    let currency = currency.trim().to_uppercase();
    if currency.is_empty() {
        return Err(LedgerError::Validation("FX currency is required".into()));
    }

    let (kind, category, tag) = match side {
        FxSide::Buy => (TransactionKind::Expense, BUY_FX_CATEGORY, "compra"),
        FxSide::Sell => (TransactionKind::Income, SELL_FX_CATEGORY, "venta"),
    };

    let mut tx = Transaction::new(kind, month.start_date(), amount, currency, category)
        .with_payment_source(category);
    tx.vendor = FX_OPERATION_VENDOR.to_string();
    tx.notes = notes.trim().to_string();
    tx.description = tx.notes.clone();
    tx.tags = vec!["divisas".to_string(), tag.to_string()];
    Ok(tx)
}

/// Net holding of one currency, valued in USD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsRow {
    pub currency: String,
    /// Net quantity: buys minus sells
    pub qty: f64,
    pub usd_val: f64,
}

/// One month of the savings curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsPoint {
    pub month: Month,
    /// USD value added (or removed) by the month's operations
    pub delta_usd: f64,
    /// Running total up to and including this month
    pub total_usd: f64,
}

/// A single FX operation as listed for a month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FxOperation {
    pub id: TransactionId,
    pub date: chrono::NaiveDate,
    pub side: FxSide,
    pub currency: String,
    pub amount: f64,
    pub notes: String,
}

/// Savings Report
#[derive(Debug, Clone, Serialize)]
pub struct SavingsReport {
    /// Holdings, most valuable first
    pub rows: Vec<SavingsRow>,
    /// Sum of `rows[].usd_val`
    pub total_usd: f64,
    /// Chronological running total of monthly USD deltas
    pub cumulative: Vec<SavingsPoint>,
    /// Change of the last cumulative point against the previous one
    pub growth_pct: f64,
}

impl SavingsReport {
    /// Build the savings position from the whole transaction history
    pub fn generate(config: &LedgerConfig, transactions: &[Transaction]) -> Self {
        let rates = RateResolver::new(config);

        let mut holdings: Vec<(String, f64)> = Vec::new();
        let mut deltas: BTreeMap<Month, f64> = BTreeMap::new();

        for tx in transactions.iter().filter(|tx| is_tracked_fx_tx(tx, config)) {
            let signed = match tx.kind {
                TransactionKind::Expense => tx.amount,
                TransactionKind::Income => -tx.amount,
            };

            match holdings.iter_mut().find(|(c, _)| *c == tx.currency) {
                Some((_, qty)) => *qty += signed,
                None => holdings.push((tx.currency.clone(), signed)),
            }

            let usd_delta = signed * rates.resolve(&tx.currency, Some(tx.date), tx.fx_rate)
                / rates.resolve(USD, Some(tx.date), None);
            trace!(currency = %tx.currency, signed, usd_delta, "tracked FX movement");
            *deltas.entry(tx.month()).or_insert(0.0) += usd_delta;
        }

        let usd_rate = rates.resolve(USD, None, None);
        let mut rows: Vec<SavingsRow> = holdings
            .into_iter()
            .map(|(currency, qty)| {
                let usd_val = rates.to_base(qty, &currency, None, None) / usd_rate;
                SavingsRow {
                    currency,
                    qty,
                    usd_val,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.usd_val.total_cmp(&a.usd_val));
        let total_usd = rows.iter().map(|r| r.usd_val).sum();

        let mut running = 0.0;
        let cumulative: Vec<SavingsPoint> = deltas
            .into_iter()
            .map(|(month, delta_usd)| {
                running += delta_usd;
                SavingsPoint {
                    month,
                    delta_usd,
                    total_usd: running,
                }
            })
            .collect();
        let growth_pct = growth_pct(&cumulative);

        Self {
            rows,
            total_usd,
            cumulative,
            growth_pct,
        }
    }

    /// Quantity held of one currency; 0 when never traded
    pub fn quantity(&self, currency: &str) -> f64 {
        self.rows
            .iter()
            .find(|r| r.currency == currency)
            .map_or(0.0, |r| r.qty)
    }

    /// Cumulative point for a month, if that month saw any movement
    pub fn point(&self, month: Month) -> Option<&SavingsPoint> {
        self.cumulative.iter().find(|p| p.month == month)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::from("Savings\n");

        if self.rows.is_empty() {
            output.push_str("No FX operations recorded.\n");
            return output;
        }

        let rows = self.rows.iter().map(|r| {
            vec![
                r.currency.clone(),
                format!("{:.2}", r.qty),
                format_amount(r.usd_val, USD),
            ]
        });
        output.push_str(&table(&["Currency", "Quantity", "USD value"], rows));
        output.push_str(&format!("\nTotal: {}\n\n", format_amount(self.total_usd, USD)));

        let rows = self.cumulative.iter().map(|p| {
            vec![
                p.month.to_string(),
                format_amount(p.delta_usd, USD),
                format_amount(p.total_usd, USD),
            ]
        });
        output.push_str(&table(&["Month", "Delta", "Cumulative"], rows));
        output.push_str(&format!(
            "\nMonthly growth: {}\n",
            format_percentage(self.growth_pct)
        ));

        output
    }

    /// Export the cumulative series to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["month", "delta_usd", "total_usd"])?;
        for point in &self.cumulative {
            csv.write_record([
                point.month.to_string(),
                format!("{:.2}", point.delta_usd),
                format!("{:.2}", point.total_usd),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// `(current - previous) / |previous| * 100` over the last two points
fn growth_pct(points: &[SavingsPoint]) -> f64 {
    match points {
        [.., previous, current] if previous.total_usd != 0.0 => {
            (current.total_usd - previous.total_usd) / previous.total_usd.abs() * 100.0
        }
        _ => 0.0,
    }
}

/// FX-category operations dated in `month`, newest first
pub fn operations(transactions: &[Transaction], month: Month) -> Vec<FxOperation> {
    let mut ops: Vec<FxOperation> = transactions
        .iter()
        .filter(|tx| month.contains(tx.date) && is_fx_category_tx(tx))
        .map(|tx| FxOperation {
            id: tx.id.clone(),
            date: tx.date,
            side: FxSide::of(tx),
            currency: tx.currency.clone(),
            amount: tx.amount,
            notes: tx.notes.clone(),
        })
        .collect();
    ops.sort_by(|a, b| b.date.cmp(&a.date));
    ops
}
