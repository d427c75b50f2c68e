//! Budget repository for JSON storage
//!
//! Manages loading and saving monthly limits to budgets.json

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{BudgetBook, BudgetKey, Month};

use super::file_io::{read_json, write_json_atomic};

/// On-disk shape of budgets.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: BudgetBook,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    book: BudgetBook,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            book: BudgetBook::new(),
        }
    }

    /// Load limits from disk
    pub fn load(&mut self) -> Result<(), LedgerError> {
        let file_data: BudgetData = read_json(&self.path)?;
        self.book = file_data.budgets;
        Ok(())
    }

    /// Save limits to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let file_data = BudgetData {
            budgets: self.book.clone(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn book(&self) -> &BudgetBook {
        &self.book
    }

    /// Set a limit; 0 clears it
    pub fn set_limit(&mut self, month: Month, key: BudgetKey, limit: f64) {
        self.book.set_limit(month, key, limit);
    }

    /// Replace every limit (used by import)
    pub fn replace_all(&mut self, book: BudgetBook) {
        self.book = book;
    }
}
