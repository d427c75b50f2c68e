//! Export module for ledgerfx
//!
//! - CSV: transactions with their base-currency amount, and budget limits
//! - JSON: the full versioned payload, importable again
//! - YAML: the same payload in human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_budgets_csv, export_transactions_csv};
pub use json::{
    export_full_json, import_from_json, FullExport, ImportPayload, ImportedBudgets, ImportedData,
    EXPORT_VERSION,
};
pub use yaml::{export_full_yaml, import_from_yaml};
