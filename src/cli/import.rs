//! CLI command handler for JSON/YAML import
//!
//! Reads a full export (current or legacy payload), normalizes it and
//! replaces the matching parts of the stored ledger.

use std::path::Path;
use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::export::{import_from_json, import_from_yaml, ImportedData};
use crate::storage::Storage;

use super::export::ExportFormat;

/// Handle the import command
pub fn handle_import_command(
    storage: &mut Storage,
    file: &Path,
    format: Option<ExportFormat>,
) -> LedgerResult<()> {
    if !file.exists() {
        return Err(LedgerError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let format = format
        .or_else(|| ExportFormat::from_path(file))
        .unwrap_or(ExportFormat::Json);

    let content = std::fs::read_to_string(file)
        .map_err(|e| LedgerError::Import(format!("Failed to read file: {}", e)))?;

    let data = match format {
        ExportFormat::Json => import_from_json(&content, &storage.config)?,
        ExportFormat::Yaml => import_from_yaml(&content, &storage.config)?,
        ExportFormat::Csv => {
            return Err(LedgerError::Import(
                "CSV files cannot be imported; use a JSON or YAML export".into(),
            ))
        }
    };

    let summary = apply_import(storage, data);
    if summary.is_empty() {
        warn!(file = %file.display(), "import payload held no ledger data");
        println!("Nothing to import from {}.", file.display());
        return Ok(());
    }

    storage.save_all()?;
    info!(file = %file.display(), "import applied");

    println!("Imported from {}:", file.display());
    for line in summary {
        println!("  {}", line);
    }
    Ok(())
}

/// Replace the parts of storage present in `data`, describing each change
fn apply_import(storage: &mut Storage, data: ImportedData) -> Vec<String> {
    let mut summary = Vec::new();

    if let Some(config) = data.config {
        summary.push(format!("config (base currency {})", config.base_currency));
        storage.config = config;
    }
    if let Some(budgets) = data.budgets {
        summary.push(format!("{} budget limits", budgets.len()));
        storage.budgets.replace_all(budgets);
    }
    if let Some(transactions) = data.transactions {
        summary.push(format!("{} transactions", transactions.len()));
        storage.transactions.replace_all(transactions);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::{BudgetKey, Month, Transaction, TransactionKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn storage(temp_dir: &TempDir) -> Storage {
        Storage::load(LedgerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap()
    }

    #[test]
    fn test_import_replaces_only_present_parts() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = storage(&temp_dir);
        let march = Month::new(2026, 3).unwrap();
        storage
            .budgets
            .set_limit(march, BudgetKey::category("Comida"), 1000.0);

        let file = temp_dir.path().join("v1.json");
        std::fs::write(
            &file,
            r#"{"expenses": [{"date": "2026-03-02", "amount": 50, "category": "Ocio"}]}"#,
        )
        .unwrap();

        handle_import_command(&mut storage, &file, None).unwrap();

        let reloaded = Storage::load(storage.paths().clone()).unwrap();
        assert_eq!(reloaded.transactions.len(), 1);
        assert_eq!(reloaded.transactions.all()[0].kind, TransactionKind::Expense);
        assert_eq!(
            reloaded.budgets.book().limit(march, &BudgetKey::category("Comida")),
            Some(1000.0)
        );
    }

    #[test]
    fn test_import_yaml_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = storage(&temp_dir);
        let file = temp_dir.path().join("ledger.yaml");
        std::fs::write(
            &file,
            "config:\n  baseCurrency: USD\ntransactions:\n  - type: income\n    date: 2026-01-05\n    amount: 20\n",
        )
        .unwrap();

        handle_import_command(&mut storage, &file, None).unwrap();

        assert_eq!(storage.config.base_currency, "USD");
        let tx: &Transaction = &storage.transactions.all()[0];
        assert_eq!(tx.currency, "USD");
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn test_import_rejects_missing_file_and_csv() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = storage(&temp_dir);

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            handle_import_command(&mut storage, &missing, None),
            Err(LedgerError::Import(_))
        ));

        let csv = temp_dir.path().join("tx.csv");
        std::fs::write(&csv, "type,date\n").unwrap();
        assert!(matches!(
            handle_import_command(&mut storage, &csv, None),
            Err(LedgerError::Import(_))
        ));
    }
}
