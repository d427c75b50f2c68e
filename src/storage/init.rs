//! Storage initialization
//!
//! Handles first-run setup: the default config and empty data files.

use tracing::info;

use crate::config::paths::LedgerPaths;
use crate::config::settings::LedgerConfig;
use crate::error::LedgerError;

use super::budget::BudgetRepository;
use super::transactions::TransactionRepository;

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    if !paths.config_file().exists() {
        LedgerConfig::default().save(paths)?;
        info!(path = %paths.config_file().display(), "wrote default config");
    }

    if !paths.transactions_file().exists() {
        TransactionRepository::new(paths.transactions_file()).save()?;
    }

    if !paths.budgets_file().exists() {
        BudgetRepository::new(paths.budgets_file()).save()?;
    }

    Ok(())
}
