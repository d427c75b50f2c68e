//! Normalization of raw records into canonical transactions
//!
//! All defaulting happens here, once. Downstream code works on
//! [`Transaction`] and never re-infers missing fields.

use chrono::NaiveDate;
use tracing::trace;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{RawTags, RawTransaction, Transaction, TransactionId, TransactionKind};

/// Category label of an FX buy
pub const BUY_FX_CATEGORY: &str = "Compra de divisas";

/// Category label of an FX sell
pub const SELL_FX_CATEGORY: &str = "Venta de divisas";

/// Maximum number of tags kept per record
pub const MAX_TAGS: usize = 12;

const DEFAULT_EXPENSE_CATEGORY: &str = "Otros";
const DEFAULT_INCOME_CATEGORY: &str = "Otros ingresos";
const DEFAULT_EXPENSE_SOURCE: &str = "Tarjeta";
const DEFAULT_INCOME_SOURCE: &str = "Transferencia";
const REENTRY_LABEL: &str = "Reintegro";

/// Split a comma-separated tag string: trim, drop empties, cap at 12
///
/// Duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    clean_tags(raw.split(','))
}

fn clean_tags<'a>(tags: impl Iterator<Item = &'a str>) -> Vec<String> {
    tags.map(str::trim)
        .filter(|t| !t.is_empty())
        .take(MAX_TAGS)
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidDate(raw.to_string()))
}

/// Turn a raw record into a canonical transaction
///
/// # Errors
///
/// Fails when the date is present but not ISO, or when the amount is
/// missing, non-numeric, or not > 0.
pub fn normalize(raw: RawTransaction, config: &LedgerConfig) -> LedgerResult<Transaction> {
    let legacy_reentry = raw.kind.as_deref() == Some("reentry");
    let kind = match raw.kind.as_deref() {
        Some("income") | Some("reentry") => TransactionKind::Income,
        _ => TransactionKind::Expense,
    };

    let date = match non_empty(raw.date) {
        Some(date) => parse_date(&date)?,
        None => chrono::Local::now().date_naive(),
    };

    let amount = raw
        .amount
        .as_ref()
        .and_then(|a| a.value())
        .filter(|a| *a > 0.0)
        .ok_or_else(|| {
            LedgerError::Validation(format!(
                "amount must be a number greater than zero (record {})",
                raw.id.as_deref().unwrap_or("<new>")
            ))
        })?;

    let (default_category, default_source) = match (kind, legacy_reentry) {
        (_, true) => (REENTRY_LABEL, REENTRY_LABEL),
        (TransactionKind::Income, false) => (DEFAULT_INCOME_CATEGORY, DEFAULT_INCOME_SOURCE),
        (TransactionKind::Expense, false) => (DEFAULT_EXPENSE_CATEGORY, DEFAULT_EXPENSE_SOURCE),
    };

    let tags = match raw.tags {
        Some(RawTags::List(list)) => clean_tags(list.iter().map(String::as_str)),
        Some(RawTags::Text(text)) => parse_tags(&text),
        None => Vec::new(),
    };

    let tx = Transaction {
        id: non_empty(raw.id)
            .map(TransactionId::from_external)
            .unwrap_or_default(),
        kind,
        date,
        amount,
        currency: non_empty(raw.currency).unwrap_or_else(|| config.base_currency.clone()),
        category: non_empty(raw.category).unwrap_or_else(|| default_category.to_string()),
        payment_source: non_empty(raw.payment_source)
            .unwrap_or_else(|| default_source.to_string()),
        vendor: raw.vendor.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        tags,
        notes: raw.notes.unwrap_or_default(),
        fx_rate: raw
            .fx_rate
            .and_then(|r| r.value())
            .filter(|r| *r > 0.0),
        include_in_net: raw.include_in_net != Some(false),
    };

    trace!(id = %tx.id, kind = %tx.kind, "normalized transaction");
    Ok(tx)
}

/// Normalize a list of raw records, stopping at the first invalid one
pub fn normalize_all(
    raws: impl IntoIterator<Item = RawTransaction>,
    config: &LedgerConfig,
) -> LedgerResult<Vec<Transaction>> {
    raws.into_iter().map(|raw| normalize(raw, config)).collect()
}

/// The category is one of the two fixed FX labels
pub fn is_fx_category_tx(tx: &Transaction) -> bool {
    tx.category == BUY_FX_CATEGORY || tx.category == SELL_FX_CATEGORY
}

/// Income whose source is a configured reentry label (money returned, not earned)
pub fn is_reentry_transfer(tx: &Transaction, config: &LedgerConfig) -> bool {
    tx.is_income() && config.is_reentry_label(&tx.payment_source)
}

/// Any FX-category record or any movement in a non-base currency
pub fn is_tracked_fx_tx(tx: &Transaction, config: &LedgerConfig) -> bool {
    is_fx_category_tx(tx) || tx.currency != config.base_currency
}
