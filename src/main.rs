use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ledgerfx::cli::{
    handle_budget_command, handle_export_command, handle_fx_command, handle_import_command,
    handle_rate_command, handle_report_command, handle_transaction_command, BudgetCommands,
    ExportCommands, ExportFormat, FxCommands, RateCommands, ReportCommands, TransactionCommands,
};
use ledgerfx::config::LedgerPaths;
use ledgerfx::log::init_logging;
use ledgerfx::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "ledgerfx",
    author = "Kaylee Beyene",
    version,
    about = "Multi-currency personal ledger with budget and savings analytics",
    long_about = "ledgerfx records income, expenses and currency operations in any \
                  currency and reports budgets, savings and month-over-month trends \
                  in a single base currency."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report commands
    #[command(subcommand)]
    Report(ReportCommands),

    /// Budget limit commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Foreign-currency buy/sell operations
    #[command(subcommand)]
    Fx(FxCommands),

    /// Exchange rate commands
    #[command(subcommand)]
    Rate(RateCommands),

    /// Export data to CSV, JSON or YAML
    #[command(subcommand)]
    Export(ExportCommands),

    /// Import a JSON or YAML export
    Import {
        /// File to import
        file: PathBuf,

        /// Format, guessed from the extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        tracing::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = LedgerPaths::new()?;

    if let Some(Commands::Init) = cli.command {
        println!("Initializing ledgerfx at: {}", paths.base_dir().display());
        initialize_storage(&paths)?;
        println!("Initialization complete!");
        println!();
        println!("Run 'ledgerfx config' to see the base currency and categories.");
        return Ok(());
    }

    let mut storage = Storage::load(paths)?;

    match cli.command {
        Some(Commands::Report(cmd)) => handle_report_command(&storage, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&mut storage, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&mut storage, cmd)?,
        Some(Commands::Fx(cmd)) => handle_fx_command(&mut storage, cmd)?,
        Some(Commands::Rate(cmd)) => handle_rate_command(&mut storage, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Import { file, format }) => {
            handle_import_command(&mut storage, &file, format)?
        }
        Some(Commands::Config) => {
            let paths = storage.paths();
            let config = &storage.config;
            println!("ledgerfx Configuration");
            println!("======================");
            println!("Config file:      {}", paths.config_file().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Initialized:      {}", storage.is_initialized());
            println!();
            println!("Base currency:    {}", config.base_currency);
            println!("Currencies:       {}", config.currencies.join(", "));
            println!("Expense groups:   {}", config.expense_groups.join(", "));
            println!("Reentry labels:   {}", config.reentry_categories.join(", "));
            println!("Monthly rates:    {} months", config.rates_by_month.len());
        }
        Some(Commands::Init) => {}
        None => {
            println!("ledgerfx - Multi-currency personal ledger");
            println!();
            println!("Run 'ledgerfx --help' for usage information.");
        }
    }

    Ok(())
}
