use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fleetcost::cli::{
    handle_buy_vs_rent_command, handle_cashflow_command, handle_config_command,
    handle_rollup_command, handle_value_command,
};
use fleetcost::config::{FleetPaths, Settings};

/// Environment variable overriding the log filter from settings
const LOG_ENV: &str = "FLEETCOST_LOG";

#[derive(Parser)]
#[command(
    name = "fleetcost",
    version,
    about = "Equipment cost recovery and budgeting",
    long_about = "fleetcost values a fleet of equipment, prices its annual cost \
                  recovery, compares buying against renting, projects cashflow and \
                  exports the budget rollup used by accounting templates."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-asset valuation
    #[command(subcommand)]
    Value(fleetcost::cli::ValueCommands),

    /// Budget rollup CSV export
    Rollup(fleetcost::cli::RollupArgs),

    /// Cashflow projection
    #[command(subcommand)]
    Cashflow(fleetcost::cli::CashflowCommands),

    /// Compare buying against renting
    BuyVsRent(fleetcost::cli::BuyVsRentArgs),

    /// Configuration and category defaults
    #[command(subcommand)]
    Config(fleetcost::cli::ConfigCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FleetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Value(cmd) => handle_value_command(&settings, cmd)?,
        Commands::Rollup(args) => handle_rollup_command(&settings, args)?,
        Commands::Cashflow(cmd) => handle_cashflow_command(&settings, cmd)?,
        Commands::BuyVsRent(args) => handle_buy_vs_rent_command(&settings, args)?,
        Commands::Config(cmd) => handle_config_command(&paths, &settings, cmd)?,
    }

    Ok(())
}
