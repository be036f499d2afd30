//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod buy_vs_rent;
pub mod cashflow;
pub mod config;
pub mod rollup;
pub mod value;

pub use buy_vs_rent::{handle_buy_vs_rent_command, BuyVsRentArgs};
pub use cashflow::{handle_cashflow_command, CashflowCommands};
pub use config::{handle_config_command, ConfigCommands};
pub use rollup::{handle_rollup_command, RollupArgs};
pub use value::{handle_value_command, ValueCommands};

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;

use crate::config::Settings;
use crate::error::{FleetError, FleetResult};
use crate::models::EquipmentId;
use crate::services::{load_equipment_file, EquipmentCalculated, ValuationService};

/// Equipment file and valuation date shared by most commands
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Equipment file (.json or .csv)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(long, env = "FLEETCOST_AS_OF")]
    pub as_of: Option<String>,
}

impl InputArgs {
    /// The valuation date; the only place the wall clock is read
    pub fn as_of(&self) -> FleetResult<NaiveDate> {
        match &self.as_of {
            Some(s) => parse_date(s),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }

    /// Load the equipment file and value every record
    pub fn load_calculated(&self, settings: &Settings) -> FleetResult<Vec<EquipmentCalculated>> {
        let as_of = self.as_of()?;
        let result = load_equipment_file(&self.input)?;

        for (row, message) in &result.error_messages {
            eprintln!("Skipped row {}: {}", row, message);
        }

        let table = settings.category_table();
        ValuationService::new(&table).calculate_all(&result.imported, as_of)
    }
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(s: &str) -> FleetResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        FleetError::Validation(format!("Invalid date format: {}. Use YYYY-MM-DD", s))
    })
}

/// Find a calculated record by ID, short display ID or exact name
/// (case-insensitive)
pub fn find_equipment<'a>(
    items: &'a [EquipmentCalculated],
    key: &str,
) -> FleetResult<&'a EquipmentCalculated> {
    if let Ok(id) = key.parse::<EquipmentId>() {
        if let Some(found) = items.iter().find(|c| c.equipment.id == id) {
            return Ok(found);
        }
    }

    let mut by_short = items.iter().filter(|c| c.equipment.id.matches_short(key));
    if let Some(found) = by_short.next() {
        if by_short.next().is_some() {
            return Err(FleetError::Validation(format!(
                "Equipment ID '{}' is ambiguous; use more digits",
                key
            )));
        }
        return Ok(found);
    }

    items
        .iter()
        .find(|c| c.equipment.name.eq_ignore_ascii_case(key.trim()))
        .ok_or_else(|| FleetError::Validation(format!("Equipment not found: {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryTable, Equipment};

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(matches!(
            parse_date("06/01/2025"),
            Err(FleetError::Validation(_))
        ));
    }

    #[test]
    fn test_find_equipment_by_id_or_name() {
        let table = CategoryTable::standard();
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let items = ValuationService::new(&table)
            .calculate_all(
                &[Equipment::new("Truck 7", "Truck"), Equipment::new("Mower 2", "Mower")],
                as_of,
            )
            .unwrap();

        let by_name = find_equipment(&items, "mower 2").unwrap();
        assert_eq!(by_name.equipment.category, "Mower");

        let short = items[0].equipment.id.to_string();
        let by_short = find_equipment(&items, &short).unwrap();
        assert_eq!(by_short.equipment.name, "Truck 7");

        let full = items[1].equipment.id.as_uuid().to_string();
        let by_full = find_equipment(&items, &full).unwrap();
        assert_eq!(by_full.equipment.name, "Mower 2");

        assert!(find_equipment(&items, "Chipper").is_err());
    }

    #[test]
    fn test_find_equipment_ambiguous_short_id() {
        let table = CategoryTable::standard();
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut first = Equipment::new("Truck 7", "Truck");
        first.id = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        let mut second = Equipment::new("Truck 8", "Truck");
        second.id = "550e8400-0000-41d4-a716-446655440000".parse().unwrap();
        let items = ValuationService::new(&table)
            .calculate_all(&[first, second], as_of)
            .unwrap();

        assert!(matches!(
            find_equipment(&items, "eq-550e8400"),
            Err(FleetError::Validation(_))
        ));
        let found = find_equipment(&items, "eq-550e8400-0000").unwrap();
        assert_eq!(found.equipment.name, "Truck 8");
    }
}
