//! JSON Export functionality
//!
//! Exports config, budgets and transactions as one versioned payload, and
//! reads it back. Older payloads are accepted: version 1 kept every record
//! in an `expenses` list, and budgets were once a month map whose group keys
//! carried a `__group__::` prefix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetBook, BudgetKey, Month, RawNumber, RawTransaction, Transaction};
use crate::services::normalize_all;
use crate::storage::Storage;

/// Current export payload version
pub const EXPORT_VERSION: u32 = 2;

/// Key prefix marking a group budget in the legacy month map
pub const LEGACY_GROUP_PREFIX: &str = "__group__::";

/// Full export payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullExport {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: LedgerConfig,
    pub budgets: BudgetBook,
    pub transactions: Vec<Transaction>,
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub budget_count: usize,
    pub earliest_transaction: Option<String>,
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Create a full export from loaded storage
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(
            &storage.config,
            storage.transactions.all(),
            storage.budgets.book(),
        )
    }

    pub fn new(config: &LedgerConfig, transactions: &[Transaction], budgets: &BudgetBook) -> Self {
        let metadata = ExportMetadata {
            transaction_count: transactions.len(),
            budget_count: budgets.len(),
            earliest_transaction: transactions.iter().map(|t| t.date).min().map(|d| d.to_string()),
            latest_transaction: transactions.iter().map(|t| t.date).max().map(|d| d.to_string()),
        };

        Self {
            version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            budgets: budgets.clone(),
            transactions: transactions.to_vec(),
            metadata,
        }
    }
}

/// Budgets as found in an import: the flat entry list or the legacy month map
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImportedBudgets {
    Book(BudgetBook),
    Legacy(BTreeMap<String, BTreeMap<String, RawNumber>>),
}

impl ImportedBudgets {
    /// Convert into a budget book, reading group prefixes in legacy maps
    pub fn into_book(self) -> LedgerResult<BudgetBook> {
        match self {
            Self::Book(book) => Ok(book),
            Self::Legacy(months) => {
                let mut book = BudgetBook::new();
                for (month, limits) in months {
                    let month = Month::parse(&month)
                        .map_err(|e| LedgerError::Import(format!("Bad budget month: {}", e)))?;
                    for (key, limit) in limits {
                        let key = match key.strip_prefix(LEGACY_GROUP_PREFIX) {
                            Some(group) => BudgetKey::group(group),
                            None => BudgetKey::category(key),
                        };
                        book.set_limit(month, key, limit.value().unwrap_or(0.0));
                    }
                }
                Ok(book)
            }
        }
    }
}

/// An import payload of any known version
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPayload {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub config: Option<LedgerConfig>,
    #[serde(default)]
    pub budgets: Option<ImportedBudgets>,
    #[serde(default)]
    pub transactions: Option<Vec<RawTransaction>>,
    /// Version 1 record list; every entry is an expense
    #[serde(default)]
    pub expenses: Option<Vec<RawTransaction>>,
}

/// Normalized contents of an import; `None` parts leave current data alone
#[derive(Debug, Clone, Default)]
pub struct ImportedData {
    pub config: Option<LedgerConfig>,
    pub budgets: Option<BudgetBook>,
    pub transactions: Option<Vec<Transaction>>,
}

impl ImportPayload {
    /// Validate and normalize the payload
    ///
    /// Records are normalized against the imported config when there is one,
    /// else against `current`.
    pub fn into_data(self, current: &LedgerConfig) -> LedgerResult<ImportedData> {
        if let Some(version) = self.version {
            if version > EXPORT_VERSION {
                return Err(LedgerError::Import(format!(
                    "Unsupported export version {} (newest known is {})",
                    version, EXPORT_VERSION
                )));
            }
        }

        let config = self.config.map(LedgerConfig::sanitized);
        let effective = config.as_ref().unwrap_or(current);

        let raws = match (self.transactions, self.expenses) {
            (Some(transactions), _) => Some(transactions),
            (None, Some(expenses)) => Some(
                expenses
                    .into_iter()
                    .map(|raw| RawTransaction {
                        kind: Some("expense".to_string()),
                        ..raw
                    })
                    .collect(),
            ),
            (None, None) => None,
        };
        let transactions = raws
            .map(|raws| normalize_all(raws, effective))
            .transpose()
            .map_err(|e| LedgerError::Import(e.to_string()))?;

        let budgets = self.budgets.map(ImportedBudgets::into_book).transpose()?;

        Ok(ImportedData {
            config,
            budgets,
            transactions,
        })
    }
}

/// Export the full payload to JSON
pub fn export_full_json<W: Write>(export: &FullExport, writer: W, pretty: bool) -> LedgerResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, export)
    } else {
        serde_json::to_writer(writer, export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))
}

/// Parse and normalize a JSON export of any known version
pub fn import_from_json(json_str: &str, current: &LedgerConfig) -> LedgerResult<ImportedData> {
    let payload: ImportPayload =
        serde_json::from_str(json_str).map_err(|e| LedgerError::Import(e.to_string()))?;
    payload.into_data(current)
}
