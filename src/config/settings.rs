//! User settings for fleetcost
//!
//! Holds category default overrides, the usage assumption for buy-vs-rent
//! analysis and the log filter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::paths::FleetPaths;
use crate::error::{FleetError, FleetResult};
use crate::models::{CategoryDefaultsOverride, CategoryTable};

/// User settings for fleetcost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Per-category overrides applied on top of the standard table.
    /// Unknown category names add new rows based on the fallback row.
    #[serde(default)]
    pub category_overrides: BTreeMap<String, CategoryDefaultsOverride>,

    /// Usage days per year assumed when none is given to buy-vs-rent
    #[serde(default = "default_usage_days")]
    pub default_usage_days_per_year: u32,

    /// `tracing` filter directive, e.g. "info" or "fleetcost=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Currency symbol for terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_usage_days() -> u32 {
    60
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            category_overrides: BTreeMap::new(),
            default_usage_days_per_year: default_usage_days(),
            log_level: default_log_level(),
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FleetPaths) -> FleetResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // caller decides when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FleetError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| FleetError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FleetPaths) -> FleetResult<()> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FleetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FleetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// The standard category table with this file's overrides applied
    pub fn category_table(&self) -> CategoryTable {
        CategoryTable::standard().with_overrides(&self.category_overrides)
    }
}
