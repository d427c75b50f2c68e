//! Transaction model
//!
//! `Transaction` is the canonical record the engine works on. `RawTransaction`
//! is the loosely typed shape collaborators store; it only becomes a
//! `Transaction` by passing through [`crate::services::normalize`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::month::Month;

/// Direction of a transaction
///
/// Amounts are always positive; the kind carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, refunds, FX sells)
    Income,
    /// Money going out (spending, FX buys)
    #[default]
    Expense,
}

impl TransactionKind {
    /// Sort rank for same-day ordering (income first)
    pub fn rank(&self) -> u8 {
        match self {
            Self::Income => 0,
            Self::Expense => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Transaction date
    pub date: NaiveDate,

    /// Amount in `currency`, always > 0
    pub amount: f64,

    /// Currency code (e.g., "USD")
    pub currency: String,

    /// Category name
    pub category: String,

    /// Payment method for expenses, source for income
    #[serde(rename = "pay")]
    pub payment_source: String,

    /// Merchant or origin
    #[serde(default)]
    pub vendor: String,

    /// Short description
    #[serde(rename = "desc", default)]
    pub description: String,

    /// Short free-form tags (at most 12)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Notes
    #[serde(default)]
    pub notes: String,

    /// Rate actually executed at entry time, pinned for conversion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_rate: Option<f64>,

    /// Whether this record counts toward net totals
    #[serde(default = "default_include_in_net")]
    pub include_in_net: bool,
}

fn default_include_in_net() -> bool {
    true
}

impl Transaction {
    /// Create a transaction with the required fields and empty extras
    pub fn new(
        kind: TransactionKind,
        date: NaiveDate,
        amount: f64,
        currency: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            kind,
            date,
            amount,
            currency: currency.into(),
            category: category.into(),
            payment_source: String::new(),
            vendor: String::new(),
            description: String::new(),
            tags: Vec::new(),
            notes: String::new(),
            fx_rate: None,
            include_in_net: true,
        }
    }

    /// Set the payment source
    pub fn with_payment_source(mut self, payment_source: impl Into<String>) -> Self {
        self.payment_source = payment_source.into();
        self
    }

    /// Pin the execution rate
    pub fn with_fx_rate(mut self, rate: f64) -> Self {
        self.fx_rate = Some(rate);
        self
    }

    /// Exclude this record from net totals
    pub fn excluded_from_net(mut self) -> Self {
        self.include_in_net = false;
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// The calendar month this transaction falls in
    pub fn month(&self) -> Month {
        Month::of(self.date)
    }
}

/// A number that may have been stored as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// The numeric value, if it parses and is finite
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Tags as stored: either a list or a comma-separated string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    List(Vec<String>),
    Text(String),
}

/// A transaction as stored by a collaborator, with every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub amount: Option<RawNumber>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(rename = "pay", alias = "paymentSource", default)]
    pub payment_source: Option<String>,

    #[serde(default)]
    pub vendor: Option<String>,

    #[serde(rename = "desc", alias = "description", default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Option<RawTags>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub fx_rate: Option<RawNumber>,

    #[serde(default)]
    pub include_in_net: Option<bool>,
}

impl From<&Transaction> for RawTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: Some(tx.id.to_string()),
            kind: Some(tx.kind.as_str().to_string()),
            date: Some(tx.date.format("%Y-%m-%d").to_string()),
            amount: Some(RawNumber::Number(tx.amount)),
            currency: Some(tx.currency.clone()),
            category: Some(tx.category.clone()),
            payment_source: Some(tx.payment_source.clone()),
            vendor: Some(tx.vendor.clone()),
            description: Some(tx.description.clone()),
            tags: Some(RawTags::List(tx.tags.clone())),
            notes: Some(tx.notes.clone()),
            fx_rate: tx.fx_rate.map(RawNumber::Number),
            include_in_net: Some(tx.include_in_net),
        }
    }
}
