//! Storage layer for ledgerfx
//!
//! Loads the config, transaction and budget snapshots from the data
//! directory and writes them back atomically.

pub mod budget;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use budget::BudgetRepository;
pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use crate::config::paths::LedgerPaths;
use crate::config::settings::LedgerConfig;
use crate::error::LedgerError;

/// Main storage coordinator holding the loaded snapshots
pub struct Storage {
    paths: LedgerPaths,
    pub config: LedgerConfig,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
}

impl Storage {
    /// Load every snapshot; missing files yield defaults
    pub fn load(paths: LedgerPaths) -> Result<Self, LedgerError> {
        let config = LedgerConfig::load_or_create(&paths)?;

        let mut transactions = TransactionRepository::new(paths.transactions_file());
        transactions.load(&config)?;

        let mut budgets = BudgetRepository::new(paths.budgets_file());
        budgets.load()?;

        Ok(Self {
            paths,
            config,
            transactions,
            budgets,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.config.save(&self.paths)?;
        self.transactions.save()?;
        self.budgets.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetKey, Month, Transaction, TransactionKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_load_empty_directory_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let storage = Storage::load(paths).unwrap();
        assert_eq!(storage.config.base_currency, "ARS");
        assert!(storage.transactions.is_empty());
        assert!(storage.budgets.book().is_empty());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_all_then_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let march = Month::new(2026, 3).unwrap();

        let mut storage = Storage::load(paths.clone()).unwrap();
        storage.transactions.insert(Transaction::new(
            TransactionKind::Expense,
            NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
            99.0,
            "ARS",
            "Comida",
        ));
        storage
            .budgets
            .set_limit(march, BudgetKey::category("Comida"), 500.0);
        storage.save_all().unwrap();

        let reloaded = Storage::load(paths).unwrap();
        assert!(reloaded.is_initialized());
        assert_eq!(reloaded.transactions.len(), 1);
        assert_eq!(
            reloaded.budgets.book().limit(march, &BudgetKey::category("Comida")),
            Some(500.0)
        );
    }
}
