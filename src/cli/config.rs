//! CLI commands for configuration

use clap::Subcommand;

use crate::config::{FleetPaths, Settings};
use crate::error::FleetResult;

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration and paths
    Show,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },

    /// List the category defaults table, overrides applied
    Categories,
}

/// Handle config commands
pub fn handle_config_command(
    paths: &FleetPaths,
    settings: &Settings,
    cmd: ConfigCommands,
) -> FleetResult<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("fleetcost Configuration");
            println!("=======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!(
                "Settings file:    {}{}",
                paths.settings_file().display(),
                if paths.is_initialized() { "" } else { " (not created)" }
            );
            println!();
            println!("Settings:");
            println!("  Usage days/year:    {}", settings.default_usage_days_per_year);
            println!("  Log level:          {}", settings.log_level);
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Category overrides: {}", settings.category_overrides.len());
        }
        ConfigCommands::Init { force } => {
            if paths.is_initialized() && !force {
                println!(
                    "Settings already exist at {} (use --force to overwrite)",
                    paths.settings_file().display()
                );
                return Ok(());
            }
            let settings = if force { Settings::default() } else { settings.clone() };
            settings.save(paths)?;
            println!("Settings written to: {}", paths.settings_file().display());
        }
        ConfigCommands::Categories => {
            let table = settings.category_table();
            println!(
                "{:<20} {:>5} {:>8} {:>8} {:>8} {:<6}",
                "Category", "Life", "Resale%", "Maint%", "Ins%", "Unit"
            );
            for (name, row) in table.iter() {
                let marker = if name == table.fallback_key() { " *" } else { "" };
                println!(
                    "{:<20} {:>5} {:>8.1} {:>8.1} {:>8.1} {:<6}{}",
                    name,
                    row.default_useful_life,
                    row.default_resale_percent,
                    row.maintenance_percent,
                    row.insurance_percent,
                    row.unit,
                    marker
                );
            }
            println!();
            println!("* fallback for unknown categories");
        }
    }

    Ok(())
}
