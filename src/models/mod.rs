//! Core data models for ledgerfx
//!
//! Transactions, month keys and budget limits. The ledger configuration
//! snapshot lives in [`crate::config`].

pub mod budget;
pub mod ids;
pub mod month;
pub mod transaction;

pub use budget::{BudgetBook, BudgetEntry, BudgetKey, BudgetKind};
pub use ids::TransactionId;
pub use month::Month;
pub use transaction::{RawNumber, RawTags, RawTransaction, Transaction, TransactionKind};
