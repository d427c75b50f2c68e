//! CLI commands for data export
//!
//! Provides commands for exporting data in various formats.

use crate::error::LedgerResult;
use crate::export::{
    export_budgets_csv, export_full_json, export_full_yaml, export_transactions_csv, FullExport,
};
use crate::storage::Storage;
use clap::{Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use super::write_output;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (transactions only)
    Csv,
    /// JSON format (full payload)
    Json,
    /// YAML format (full payload, human-readable)
    Yaml,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export all data to a file
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export transactions to CSV
    Transactions {
        /// Output file path
        output: PathBuf,
    },

    /// Export budget limits to CSV
    Budgets {
        /// Output file path
        output: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> LedgerResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => handle_export_all(storage, output, format, pretty),
        ExportCommands::Transactions { output } => handle_export_transactions(storage, output),
        ExportCommands::Budgets { output } => {
            write_output(&output, |w| export_budgets_csv(storage.budgets.book(), w))?;
            println!(
                "Exported {} budget limits to: {}",
                storage.budgets.book().len(),
                output.display()
            );
            Ok(())
        }
    }
}

/// Handle full export
fn handle_export_all(
    storage: &Storage,
    output: PathBuf,
    format: ExportFormat,
    pretty: bool,
) -> LedgerResult<()> {
    match format {
        ExportFormat::Csv => {
            write_output(&output, |w| {
                export_transactions_csv(&storage.config, storage.transactions.all(), w)
            })?;
            println!("Transactions exported to: {}", output.display());
            println!("Note: CSV format exports transactions only. Use JSON or YAML for a full export.");
        }
        ExportFormat::Json => {
            let export = FullExport::from_storage(storage);
            write_output(&output, |w| export_full_json(&export, w, pretty))?;
            println!("Full ledger exported to: {}", output.display());
        }
        ExportFormat::Yaml => {
            let export = FullExport::from_storage(storage);
            write_output(&output, |w| export_full_yaml(&export, w))?;
            println!("Full ledger exported to: {}", output.display());
        }
    }

    Ok(())
}

/// Handle transactions export
fn handle_export_transactions(storage: &Storage, output: PathBuf) -> LedgerResult<()> {
    write_output(&output, |w| {
        export_transactions_csv(&storage.config, storage.transactions.all(), w)
    })?;

    println!(
        "Exported {} transactions to: {}",
        storage.transactions.len(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("backup.JSON")),
            Some(ExportFormat::Json)
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("dir/ledger.yml")),
            Some(ExportFormat::Yaml)
        );
        assert_eq!(ExportFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(ExportFormat::from_path(Path::new("no_extension")), None);
    }
}
