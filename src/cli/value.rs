//! CLI commands for per-asset valuation
//!
//! Lists valued equipment, shows one asset with its depreciation schedule,
//! and exports the valuation in CSV, JSON or YAML.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use super::{find_equipment, InputArgs};
use crate::config::Settings;
use crate::error::{FleetError, FleetResult};
use crate::export::{csv, json, yaml};
use crate::services::{depreciation_schedule, EquipmentCalculated};

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV, one row per asset
    Csv,
    /// JSON snapshot with rollup and cashflow
    Json,
    /// YAML snapshot, human-readable
    Yaml,
}

/// Valuation subcommands
#[derive(Subcommand, Debug)]
pub enum ValueCommands {
    /// List every asset with its cost basis and annual recovery
    List {
        #[command(flatten)]
        input: InputArgs,

        /// Include sold, retired and lost equipment
        #[arg(short, long)]
        all: bool,
    },

    /// Show one asset in detail
    Show {
        #[command(flatten)]
        input: InputArgs,

        /// Equipment ID or name
        equipment: String,
    },

    /// Export the valuation to a file (or stdout)
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Handle valuation commands
pub fn handle_value_command(settings: &Settings, cmd: ValueCommands) -> FleetResult<()> {
    match cmd {
        ValueCommands::List { input, all } => {
            let items = input.load_calculated(settings)?;
            print_list(&items, all, &settings.currency_symbol);
        }
        ValueCommands::Show { input, equipment } => {
            let items = input.load_calculated(settings)?;
            let item = find_equipment(&items, &equipment)?;
            print_detail(item, &settings.currency_symbol);
        }
        ValueCommands::Export {
            input,
            output,
            format,
            pretty,
        } => {
            let as_of = input.as_of()?;
            let items = input.load_calculated(settings)?;

            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
                    FleetError::Export(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?)),
                None => Box::new(io::stdout().lock()),
            };

            match format {
                ExportFormat::Csv => csv::export_equipment_csv(&items, &mut writer)?,
                ExportFormat::Json => {
                    let snapshot = json::FleetSnapshot::new(items, as_of);
                    json::export_snapshot_json(&snapshot, &mut writer, pretty)?;
                    writeln!(writer)?;
                }
                ExportFormat::Yaml => {
                    let snapshot = json::FleetSnapshot::new(items, as_of);
                    yaml::export_snapshot_yaml(&snapshot, &mut writer)?;
                }
            }
            writer.flush()?;

            if let Some(path) = output {
                println!("Valuation exported to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_list(items: &[EquipmentCalculated], all: bool, currency: &str) {
    let shown: Vec<&EquipmentCalculated> =
        items.iter().filter(|c| all || c.is_active()).collect();

    if shown.is_empty() {
        println!("No equipment found.");
        return;
    }

    println!(
        "{:<24} {:<16} {:<8} {:>14} {:>6} {:>6} {:>14}",
        "Name", "Category", "Method", "Cost Basis", "Life", "Left", "Recovery/yr"
    );
    println!("{}", "-".repeat(94));
    for c in shown {
        println!(
            "{:<24} {:<16} {:<8} {:>14} {:>6} {:>6} {:>14}",
            truncate(&c.equipment.name, 24),
            truncate(&c.equipment.category, 16),
            c.recovery_method,
            format!("{}{:.2}", currency, c.total_cost_basis),
            c.useful_life_used,
            c.estimated_years_left,
            format!("{}{:.2}", currency, c.annual_recovery),
        );
    }
}

fn print_detail(c: &EquipmentCalculated, currency: &str) {
    let eq = &c.equipment;
    println!("{}", eq);
    println!("  ID:               {}", eq.id);
    println!("  Status:           {}", eq.status);
    println!("  Financing:        {}", eq.financing_type);
    println!("  Allocation:       {}", eq.allocation_type);
    println!("  Recovery method:  {}", c.recovery_method);
    println!();
    println!("  Cost basis:       {}{:.2}", currency, c.total_cost_basis);
    println!(
        "  COGS / Overhead:  {}{:.2} / {}{:.2} ({:.0}% overhead)",
        currency, c.cogs_allocated_cost, currency, c.overhead_allocated_cost, c.overhead_percent
    );
    println!(
        "  Life:             {} years ({} - {}), {} left",
        c.useful_life_used, c.purchase_year, c.estimated_end_of_life_year, c.estimated_years_left
    );
    println!("  Replacement cost: {}{:.2}", currency, c.replacement_cost_used);
    println!("  Expected resale:  {}{:.2}", currency, c.expected_resale_used);
    println!("  Annual recovery:  {}{:.2}", currency, c.annual_recovery);
    if let Some(roi) = c.roi_percent {
        println!("  ROI:              {:.2}%", roi);
    }

    println!();
    println!("  Depreciation schedule");
    println!(
        "  {:>4} {:>6} {:>14} {:>14} {:>14}",
        "Year", "", "Beginning", "Depreciation", "Ending"
    );
    for row in depreciation_schedule(c) {
        println!(
            "  {:>4} {:>6} {:>14.2} {:>14.2} {:>14.2}",
            row.year_index,
            row.calendar_year,
            row.beginning_book_value,
            row.depreciation,
            row.ending_book_value
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
