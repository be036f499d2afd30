//! Export module for fleetcost
//!
//! - CSV: the budget rollup consumed by accounting tools, plus per-asset valuation rows
//! - JSON: machine-readable valuation snapshot
//! - YAML: human-readable valuation snapshot

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_equipment_csv, export_rollup_csv, rollup_to_csv};
pub use json::{export_snapshot_json, FleetSnapshot, EXPORT_SCHEMA_VERSION};
pub use yaml::export_snapshot_yaml;
