//! CLI commands for reports
//!
//! Each report prints to the terminal, or as JSON with `--json`, or to a CSV
//! file with `--output`.

use clap::Subcommand;
use std::path::PathBuf;

use crate::error::LedgerResult;
use crate::models::{Month, TransactionKind};
use crate::reports::monthly_comparison::DEFAULT_WINDOW;
use crate::reports::{
    BudgetStatusReport, CategoryBreakdownSeries, DashboardReport, DashboardScope,
    MonthlyComparison, SavingsReport,
};
use crate::services::{parse_date, AggregationMode, TransactionFilter};
use crate::storage::Storage;

use super::{parse_month_or_current, print_json, write_output};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// KPIs and breakdowns for a month, the whole history, or a filtered list
    Dashboard {
        /// Month to report on (YYYY-MM, defaults to the current month)
        #[arg(short, long, conflicts_with = "all")]
        month: Option<String>,

        /// Cover the whole history
        #[arg(long)]
        all: bool,

        /// Bucket expenses by category or group
        #[arg(long = "by", value_enum, default_value = "category")]
        mode: AggregationMode,

        /// Only records containing this text
        #[arg(long)]
        search: Option<String>,

        /// Only records of this type
        #[arg(long, value_parser = parse_kind)]
        kind: Option<TransactionKind>,

        /// Only records in this category
        #[arg(long)]
        category: Option<String>,

        /// Only records on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only records on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Export breakdowns to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Spending against the month's budget limits
    #[command(alias = "budgets")]
    Budget {
        /// Month to evaluate (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Evaluate category or group budgets
        #[arg(long = "by", value_enum, default_value = "category")]
        mode: AggregationMode,

        /// Show only the N most consumed budgets
        #[arg(long)]
        top: Option<usize>,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Export to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Foreign-currency holdings valued in USD
    Savings {
        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Export the cumulative series to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Income, expense and net over a rolling window of months
    Compare {
        /// Last month of the window (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        anchor: Option<String>,

        /// Number of months in the window
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_WINDOW as u16,
            value_parser = clap::value_parser!(u16).range(1..)
        )]
        window: u16,

        /// Bucket the spending series by category or group
        #[arg(long = "by", value_enum, default_value = "category")]
        mode: AggregationMode,

        /// Restrict the spending series to these labels (comma-separated)
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Export the comparison to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub(crate) fn parse_kind(s: &str) -> Result<TransactionKind, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "income" => Ok(TransactionKind::Income),
        "expense" => Ok(TransactionKind::Expense),
        other => Err(format!("unknown type '{}': use income or expense", other)),
    }
}

/// Handle report commands
pub fn handle_report_command(storage: &Storage, cmd: ReportCommands) -> LedgerResult<()> {
    let config = &storage.config;
    let transactions = storage.transactions.all();

    match cmd {
        ReportCommands::Dashboard {
            month,
            all,
            mode,
            search,
            kind,
            category,
            from,
            to,
            json,
            output,
        } => {
            let filter = TransactionFilter {
                search,
                kind,
                category,
                from: from.as_deref().map(parse_date).transpose()?,
                to: to.as_deref().map(parse_date).transpose()?,
            };
            let scope = if filter != TransactionFilter::default() {
                DashboardScope::Filtered(filter)
            } else if all {
                DashboardScope::All
            } else {
                DashboardScope::Month(parse_month_or_current(month.as_deref())?)
            };

            let report = DashboardReport::generate(config, transactions, &scope, mode);
            if json {
                print_json(&report)
            } else if let Some(path) = output {
                write_output(&path, |w| report.export_csv(w))?;
                println!("Dashboard exported to: {}", path.display());
                Ok(())
            } else {
                println!("{}", report.format_terminal());
                Ok(())
            }
        }

        ReportCommands::Budget {
            month,
            mode,
            top,
            json,
            output,
        } => {
            let month = parse_month_or_current(month.as_deref())?;
            let report = BudgetStatusReport::generate(
                config,
                transactions,
                storage.budgets.book(),
                month,
                mode,
            );

            if json {
                match top {
                    Some(n) => print_json(&report.worst(n)),
                    None => print_json(&report),
                }
            } else if let Some(path) = output {
                write_output(&path, |w| report.export_csv(w))?;
                println!("Budget report exported to: {}", path.display());
                Ok(())
            } else if let Some(n) = top {
                for row in report.worst(n) {
                    println!("{:<24} {:>6.0}%  {}", row.label, row.pct, row.status);
                }
                Ok(())
            } else {
                println!("{}", report.format_terminal());
                Ok(())
            }
        }

        ReportCommands::Savings { json, output } => {
            let report = SavingsReport::generate(config, transactions);
            if json {
                print_json(&report)
            } else if let Some(path) = output {
                write_output(&path, |w| report.export_csv(w))?;
                println!("Savings series exported to: {}", path.display());
                Ok(())
            } else {
                println!("{}", report.format_terminal());
                Ok(())
            }
        }

        ReportCommands::Compare {
            anchor,
            window,
            mode,
            labels,
            json,
            output,
        } => {
            let anchor: Month = parse_month_or_current(anchor.as_deref())?;
            let window = usize::from(window);
            let comparison = MonthlyComparison::build(config, transactions, anchor, window);
            let subset = (!labels.is_empty()).then_some(labels.as_slice());
            let series = CategoryBreakdownSeries::build(
                config,
                transactions,
                anchor,
                window,
                mode,
                subset,
            );

            if json {
                print_json(&serde_json::json!({
                    "comparison": comparison,
                    "breakdown": series,
                }))
            } else if let Some(path) = output {
                write_output(&path, |w| comparison.export_csv(w))?;
                println!("Comparison exported to: {}", path.display());
                Ok(())
            } else {
                println!("{}", comparison.format_terminal());
                println!("{}", series.format_terminal());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        cmd: ReportCommands,
    }

    fn compare_window(args: &[&str]) -> Result<u16, clap::Error> {
        let argv = ["ledgerfx", "compare"].iter().chain(args).copied();
        match Harness::try_parse_from(argv)?.cmd {
            ReportCommands::Compare { window, .. } => Ok(window),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_compare_window_is_bounded() {
        assert_eq!(compare_window(&[]).unwrap(), DEFAULT_WINDOW as u16);
        assert_eq!(compare_window(&["--window", "12"]).unwrap(), 12);
        assert!(compare_window(&["--window", "0"]).is_err());
        assert!(compare_window(&["--window", "4294967297"]).is_err());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("Income"), Ok(TransactionKind::Income));
        assert_eq!(parse_kind(" expense "), Ok(TransactionKind::Expense));
        assert!(parse_kind("reentry").is_err());
    }
}
