//! Exchange rate resolution and base-currency conversion
//!
//! Rates are "units of base currency per unit of currency". Resolution order
//! for a (currency, date, pinned rate) triple:
//!
//! 1. the base currency is always 1
//! 2. a pinned rate that is finite and > 0
//! 3. the currency's own rate for the date's month
//! 4. for USD-pegged stablecoins, that month's USD rate
//! 5. the global fallback rate
//! 6. identity (1)
//!
//! Resolution never fails; unusable rates fall through to the next step.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::LedgerConfig;
use crate::models::{Month, Transaction};

/// Tokens that borrow the month's USD rate when they have none of their own
pub const USD_PEGGED: &[&str] = &["USDT", "USDC", "DJED"];

/// Currency code used as the savings valuation unit
pub const USD: &str = "USD";

fn usable(rate: f64) -> Option<f64> {
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Check whether a currency is pegged to USD
pub fn is_usd_pegged(currency: &str) -> bool {
    USD_PEGGED.contains(&currency)
}

/// Resolves rates against a read-only config snapshot
#[derive(Debug, Clone, Copy)]
pub struct RateResolver<'a> {
    config: &'a LedgerConfig,
}

impl<'a> RateResolver<'a> {
    pub fn new(config: &'a LedgerConfig) -> Self {
        Self { config }
    }

    /// The effective rate for `currency` on `date`
    ///
    /// `date` of `None` skips the per-month tables. `pinned` is the rate an
    /// FX transaction was executed at.
    pub fn resolve(&self, currency: &str, date: Option<NaiveDate>, pinned: Option<f64>) -> f64 {
        if currency == self.config.base_currency {
            return 1.0;
        }

        if let Some(rate) = pinned.and_then(usable) {
            return rate;
        }

        if let Some(month) = date.map(Month::of) {
            if let Some(rate) = self.month_rate(month, currency) {
                return rate;
            }

            if is_usd_pegged(currency) {
                if let Some(rate) = self.month_rate(month, USD) {
                    return rate;
                }
            }
        }

        if let Some(rate) = self.config.rates_to_base.get(currency).copied().and_then(usable) {
            return rate;
        }

        debug!(currency, ?date, "no usable rate, treating amount as base currency");
        1.0
    }

    /// The per-month rate for a currency, if one is configured and usable
    pub fn month_rate(&self, month: Month, currency: &str) -> Option<f64> {
        self.config
            .rates_by_month
            .get(&month.to_string())
            .and_then(|rates| rates.get(currency))
            .copied()
            .and_then(usable)
    }

    /// Convert an amount into the base currency. No rounding.
    pub fn to_base(
        &self,
        amount: f64,
        currency: &str,
        date: Option<NaiveDate>,
        pinned: Option<f64>,
    ) -> f64 {
        amount * self.resolve(currency, date, pinned)
    }

    /// A transaction's amount in base currency, at its own date and pinned rate
    pub fn transaction_to_base(&self, tx: &Transaction) -> f64 {
        self.to_base(tx.amount, &tx.currency, Some(tx.date), tx.fx_rate)
    }

    /// Convert an amount into approximate USD by dividing through USD's base rate
    pub fn to_usd(
        &self,
        amount: f64,
        currency: &str,
        date: Option<NaiveDate>,
        pinned: Option<f64>,
    ) -> f64 {
        self.to_base(amount, currency, date, pinned) / self.resolve(USD, date, None)
    }

    /// Rates for every configured currency on a date, as shown in a rates table
    pub fn table(&self, date: Option<NaiveDate>) -> Vec<(String, f64)> {
        self.config
            .currencies
            .iter()
            .map(|currency| (currency.clone(), self.resolve(currency, date, None)))
            .collect()
    }
}
