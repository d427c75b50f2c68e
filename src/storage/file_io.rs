//! JSON snapshot files
//!
//! Reads tolerate a missing file where the caller has a sensible default.
//! Writes go through a sibling temp file and a rename, so a failed write
//! leaves the previous snapshot in place.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

/// A storage error naming the file and the step that failed
fn storage_err(action: &str, path: &Path, err: impl Display) -> LedgerError {
    LedgerError::Storage(format!("{} {}: {}", action, path.display(), err))
}

/// Read a snapshot, falling back to `T::default()` when the file is absent
pub fn read_json<T, P>(path: P) -> Result<T, LedgerError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.exists() {
        read_json_required(path)
    } else {
        Ok(T::default())
    }
}

/// Read a snapshot that must exist
pub fn read_json_required<T, P>(path: P) -> Result<T, LedgerError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| storage_err("Cannot open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_err("Cannot parse", path, e))
}

/// Write a snapshot as pretty JSON, replacing the file atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_err("Cannot create", parent, e))?;
    }

    let staged = path.with_extension("json.tmp");
    let result = stage(&staged, data).and_then(|()| {
        fs::rename(&staged, path).map_err(|e| storage_err("Cannot replace", path, e))
    });
    if result.is_err() {
        let _ = fs::remove_file(&staged);
    }
    result
}

fn stage<T: Serialize>(staged: &Path, data: &T) -> Result<(), LedgerError> {
    let file = File::create(staged).map_err(|e| storage_err("Cannot create", staged, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_err("Cannot serialize into", staged, e))?;
    writer
        .flush()
        .map_err(|e| storage_err("Cannot flush", staged, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_err("Cannot sync", staged, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetBook;
    use crate::models::{BudgetKey, Month};
    use tempfile::TempDir;

    fn book() -> BudgetBook {
        let mut book = BudgetBook::new();
        book.set_limit(Month::new(2026, 3).unwrap(), BudgetKey::category("Comida"), 1000.0);
        book
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: BudgetBook = read_json(&path).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");

        write_json_atomic(&path, &book()).unwrap();
        let loaded: BudgetBook = read_json(&path).unwrap();
        assert_eq!(loaded, book());
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");

        write_json_atomic(&path, &book()).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("budgets.json.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data").join("budgets.json");

        write_json_atomic(&path, &book()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_json_required() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");

        let missing = read_json_required::<BudgetBook, _>(&path).unwrap_err();
        assert!(missing.to_string().contains("Cannot open"));

        fs::write(&path, "not json").unwrap();
        let err = read_json_required::<BudgetBook, _>(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
        assert!(err.to_string().contains("budgets.json"));
    }

    #[test]
    fn test_failed_write_keeps_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        write_json_atomic(&path, &book()).unwrap();

        // A directory where the temp file should go makes staging fail
        fs::create_dir(temp_dir.path().join("budgets.json.tmp")).unwrap();
        assert!(write_json_atomic(&path, &BudgetBook::new()).is_err());

        let kept: BudgetBook = read_json(&path).unwrap();
        assert_eq!(kept, book());
    }
}
