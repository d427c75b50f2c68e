//! YAML Export functionality
//!
//! The same payload as the JSON export, in a human-readable form.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::export::json::{FullExport, ImportPayload, ImportedData};
use std::io::Write;

/// Export the full payload to YAML format
pub fn export_full_yaml<W: Write>(export: &FullExport, mut writer: W) -> LedgerResult<()> {
    let header = format!(
        "# ledgerfx export\n# Generated: {}\n# Transactions: {}, budgets: {}\n\n",
        export.exported_at, export.metadata.transaction_count, export.metadata.budget_count
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| LedgerError::Export(e.to_string()))
}

/// Parse and normalize a YAML export
pub fn import_from_yaml(yaml_str: &str, current: &LedgerConfig) -> LedgerResult<ImportedData> {
    let payload: ImportPayload =
        serde_yaml::from_str(yaml_str).map_err(|e| LedgerError::Import(e.to_string()))?;
    payload.into_data(current)
}
