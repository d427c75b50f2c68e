//! Transaction repository for JSON storage
//!
//! Records are stored in their loose raw shape and normalized on load, so a
//! file written by other tools (missing fields, legacy types, string tags)
//! still loads.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::models::{RawTransaction, Transaction, TransactionId};
use crate::services::{normalize_all, sort_transactions};

use super::file_io::{read_json, write_json_atomic};

/// On-disk shape of transactions.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TransactionData {
    #[serde(default)]
    transactions: Vec<RawTransaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: Vec<Transaction>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: Vec::new(),
        }
    }

    /// Load and normalize transactions from disk
    pub fn load(&mut self, config: &LedgerConfig) -> Result<(), LedgerError> {
        let file_data: TransactionData = read_json(&self.path)?;
        self.data = normalize_all(file_data.transactions, config)?;
        debug!(count = self.data.len(), path = %self.path.display(), "loaded transactions");
        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), LedgerError> {
        let transactions = sort_transactions(&self.data)
            .iter()
            .map(RawTransaction::from)
            .collect();
        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// All transactions, in load order
    pub fn all(&self) -> &[Transaction] {
        &self.data
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.data.iter().find(|tx| &tx.id == id)
    }

    pub fn insert(&mut self, transaction: Transaction) {
        self.data.push(transaction);
    }

    /// Remove a transaction, returning it if it existed
    pub fn remove(&mut self, id: &TransactionId) -> Option<Transaction> {
        let index = self.data.iter().position(|tx| &tx.id == id)?;
        Some(self.data.remove(index))
    }

    /// Replace every transaction (used by import)
    pub fn replace_all(&mut self, transactions: Vec<Transaction>) {
        self.data = transactions;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
