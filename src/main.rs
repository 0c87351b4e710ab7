use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sitebudget::cli::{
    handle_budget_command, handle_export_command, handle_item_command, handle_realized_command,
    handle_report_command,
};
use sitebudget::config::{paths::SiteBudgetPaths, settings::Settings};
use sitebudget::storage::JsonBudgetStore;

#[derive(Parser)]
#[command(
    name = "sitebudget",
    version,
    about = "Hierarchical construction budgets with budgeted vs. realized tracking",
    long_about = "SiteBudget keeps construction budgets as ordered lists of sites, \
                  stages, substages and services. Codes, service totals, the \
                  administrative fee and the grand total are derived from the list, \
                  and approved budgets can be reconciled against realized amounts."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Budget management commands
    #[command(subcommand)]
    Budget(sitebudget::cli::BudgetCommands),

    /// Add, change and remove budget items
    #[command(subcommand)]
    Item(sitebudget::cli::ItemCommands),

    /// Record realized (invoiced) amounts
    #[command(subcommand)]
    Realized(sitebudget::cli::RealizedCommands),

    /// Reports
    #[command(subcommand)]
    Report(sitebudget::cli::ReportCommands),

    /// Export budgets and execution reports
    #[command(subcommand)]
    Export(sitebudget::cli::ExportCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = SiteBudgetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings);

    let Some(command) = cli.command else {
        println!("SiteBudget - hierarchical construction budgets");
        println!();
        println!("Run 'sitebudget --help' for usage information.");
        println!("Run 'sitebudget budget new' to start a budget.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            println!("Initializing SiteBudget at: {}", paths.base_dir().display());
            JsonBudgetStore::open(paths.clone())?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'sitebudget budget new' to create your first budget.");
        }
        Commands::Config => {
            println!("SiteBudget Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Default fee rate: {}", settings.default_fee_rate);
            println!("  Date format:      {}", settings.date_format);
            println!("  Log filter:       {}", settings.log_filter);
        }
        Commands::Budget(cmd) => {
            let store = JsonBudgetStore::open(paths)?;
            handle_budget_command(&store, &settings, cmd)?;
        }
        Commands::Item(cmd) => {
            let store = JsonBudgetStore::open(paths)?;
            handle_item_command(&store, &settings, cmd)?;
        }
        Commands::Realized(cmd) => {
            let store = JsonBudgetStore::open(paths)?;
            handle_realized_command(&store, &settings, cmd)?;
        }
        Commands::Report(cmd) => {
            let store = JsonBudgetStore::open(paths)?;
            handle_report_command(&store, &settings, cmd)?;
        }
        Commands::Export(cmd) => {
            let store = JsonBudgetStore::open(paths)?;
            handle_export_command(&store, cmd)?;
        }
    }

    Ok(())
}
