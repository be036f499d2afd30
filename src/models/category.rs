//! Category defaults and the lookup table
//!
//! Every equipment record names a category. The category supplies the
//! assumptions used when the record carries no explicit override: useful
//! life, resale percentage, and the maintenance/insurance percentages used
//! to seed buy-vs-rent comparisons.
//!
//! Unknown categories resolve to a designated fallback row. That is a
//! policy, not an error: valuation must never fail because of a typo in a
//! category name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{FleetError, FleetResult};

/// How usage of a category is usually metered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UsageUnit {
    Hours,
    #[default]
    Days,
}

impl fmt::Display for UsageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hours => write!(f, "Hours"),
            Self::Days => write!(f, "Days"),
        }
    }
}

/// Assumptions shared by every asset in a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefaults {
    /// Expected productive life in years
    pub default_useful_life: u32,

    /// Resale value as a percentage (0-100) of replacement cost
    pub default_resale_percent: f64,

    /// Annual maintenance as a percentage of purchase price
    pub maintenance_percent: f64,

    /// Annual insurance as a percentage of purchase price
    pub insurance_percent: f64,

    /// Usage metering unit
    #[serde(default)]
    pub unit: UsageUnit,
}

impl CategoryDefaults {
    pub const fn new(
        default_useful_life: u32,
        default_resale_percent: f64,
        maintenance_percent: f64,
        insurance_percent: f64,
        unit: UsageUnit,
    ) -> Self {
        Self {
            default_useful_life,
            default_resale_percent,
            maintenance_percent,
            insurance_percent,
            unit,
        }
    }

    /// Apply the `Some` fields of an override on top of these defaults
    pub fn merged_with(&self, overrides: &CategoryDefaultsOverride) -> Self {
        Self {
            default_useful_life: overrides
                .default_useful_life
                .unwrap_or(self.default_useful_life),
            default_resale_percent: overrides
                .default_resale_percent
                .unwrap_or(self.default_resale_percent),
            maintenance_percent: overrides
                .maintenance_percent
                .unwrap_or(self.maintenance_percent),
            insurance_percent: overrides
                .insurance_percent
                .unwrap_or(self.insurance_percent),
            unit: overrides.unit.unwrap_or(self.unit),
        }
    }
}

/// Partial replacement for a category row, typically read from settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryDefaultsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_useful_life: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_resale_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<UsageUnit>,
}

/// Key of the fallback row in the standard table
pub const FALLBACK_CATEGORY: &str = "Other";

/// Immutable category → defaults table with a last-resort fallback row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    rows: BTreeMap<String, CategoryDefaults>,
    fallback_key: String,
}

impl CategoryTable {
    /// Build a table from explicit rows
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `fallback_key` has no row.
    pub fn new(
        rows: BTreeMap<String, CategoryDefaults>,
        fallback_key: impl Into<String>,
    ) -> FleetResult<Self> {
        let fallback_key = fallback_key.into();
        if !rows.contains_key(&fallback_key) {
            return Err(FleetError::Config(format!(
                "Fallback category '{}' is not present in the category table",
                fallback_key
            )));
        }
        Ok(Self { rows, fallback_key })
    }

    /// The built-in fleet table
    pub fn standard() -> Self {
        use UsageUnit::{Days, Hours};

        let rows: BTreeMap<String, CategoryDefaults> = [
            ("Truck", CategoryDefaults::new(7, 25.0, 8.0, 3.0, Days)),
            ("Trailer", CategoryDefaults::new(10, 20.0, 3.0, 1.0, Days)),
            ("Mower", CategoryDefaults::new(5, 15.0, 10.0, 2.0, Hours)),
            ("Skid Steer", CategoryDefaults::new(8, 30.0, 8.0, 2.0, Hours)),
            ("Excavator", CategoryDefaults::new(10, 30.0, 7.0, 2.0, Hours)),
            ("Loader", CategoryDefaults::new(10, 30.0, 7.0, 2.0, Hours)),
            ("Small Equipment", CategoryDefaults::new(3, 10.0, 12.0, 1.0, Hours)),
            (FALLBACK_CATEGORY, CategoryDefaults::new(7, 20.0, 5.0, 2.0, Days)),
        ]
        .into_iter()
        .map(|(key, defaults)| (key.to_string(), defaults))
        .collect();

        Self {
            rows,
            fallback_key: FALLBACK_CATEGORY.to_string(),
        }
    }

    /// Return a new table with per-category overrides applied
    ///
    /// Overrides for categories the table does not know become new rows,
    /// built on top of the fallback row.
    pub fn with_overrides(&self, overrides: &BTreeMap<String, CategoryDefaultsOverride>) -> Self {
        let mut rows = self.rows.clone();
        for (key, patch) in overrides {
            let (target_key, base) = match self.resolve(key) {
                Some((existing, defaults)) => (existing.to_string(), defaults),
                None => (key.trim().to_string(), self.fallback()),
            };
            rows.insert(target_key, base.merged_with(patch));
        }
        Self {
            rows,
            fallback_key: self.fallback_key.clone(),
        }
    }

    /// Look up the defaults for a category, falling back when unknown
    pub fn lookup(&self, category: &str) -> &CategoryDefaults {
        match self.resolve(category) {
            Some((_, defaults)) => defaults,
            None => {
                tracing::debug!(
                    category,
                    fallback = %self.fallback_key,
                    "unknown equipment category, using fallback defaults"
                );
                self.fallback()
            }
        }
    }

    /// Whether the category resolves to a row of its own
    pub fn contains(&self, category: &str) -> bool {
        self.resolve(category).is_some()
    }

    /// The fallback row
    pub fn fallback(&self) -> &CategoryDefaults {
        // `new` and `standard` guarantee the fallback row exists
        &self.rows[&self.fallback_key]
    }

    pub fn fallback_key(&self) -> &str {
        &self.fallback_key
    }

    /// Iterate over rows in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryDefaults)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact match first, then an ASCII case-insensitive match
    fn resolve(&self, category: &str) -> Option<(&str, &CategoryDefaults)> {
        let category = category.trim();
        if let Some((key, defaults)) = self.rows.get_key_value(category) {
            return Some((key.as_str(), defaults));
        }
        self.rows
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(category))
            .map(|(key, defaults)| (key.as_str(), defaults))
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}
