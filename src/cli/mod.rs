//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the report and storage layers.

pub mod budget;
pub mod export;
pub mod fx;
pub mod import;
pub mod rate;
pub mod report;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use export::{handle_export_command, ExportCommands, ExportFormat};
pub use fx::{handle_fx_command, FxCommands};
pub use import::handle_import_command;
pub use rate::{handle_rate_command, RateCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Month;

/// Parse a `YYYY-MM` argument, defaulting to the current month
pub(crate) fn parse_month_or_current(month: Option<&str>) -> LedgerResult<Month> {
    match month {
        Some(m) => Month::parse(m),
        None => Ok(Month::current()),
    }
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> LedgerResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Create `path` and hand a buffered writer to `write`, flushing afterwards
pub(crate) fn write_output<F>(path: &Path, write: F) -> LedgerResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> LedgerResult<()>,
{
    let file = File::create(path).map_err(|e| {
        LedgerError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}
