//! Equipment fact record
//!
//! An `Equipment` is the raw input to the engine: identification, purchase
//! cost facts, allocation split, optional valuation overrides, financing
//! terms and disposal facts. The engine never mutates it; every derived
//! number lives on `EquipmentCalculated`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EquipmentId;
use crate::error::{FleetError, FleetResult};

/// Lifecycle status of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    #[default]
    Active,
    Sold,
    Retired,
    Lost,
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Sold => write!(f, "Sold"),
            Self::Retired => write!(f, "Retired"),
            Self::Lost => write!(f, "Lost"),
        }
    }
}

/// How the asset was acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FinancingType {
    #[default]
    Owned,
    Financed,
    Leased,
}

impl FinancingType {
    /// Whether the asset is paid for through periodic payments
    pub fn has_payments(&self) -> bool {
        matches!(self, Self::Financed | Self::Leased)
    }
}

impl fmt::Display for FinancingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned => write!(f, "owned"),
            Self::Financed => write!(f, "financed"),
            Self::Leased => write!(f, "leased"),
        }
    }
}

/// Where the asset's cost is charged in the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AllocationType {
    /// Used on jobs; rolled up as field equipment
    #[default]
    Operational,
    /// Carried entirely as overhead
    OverheadOnly,
    /// Owner's personal-use asset, treated as overhead in rollups
    OwnerPerk,
}

impl AllocationType {
    pub fn is_field(&self) -> bool {
        matches!(self, Self::Operational)
    }
}

impl fmt::Display for AllocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operational => write!(f, "operational"),
            Self::OverheadOnly => write!(f, "overhead_only"),
            Self::OwnerPerk => write!(f, "owner_perk"),
        }
    }
}

/// Budget-export treatment of an asset, independent of its financing type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryMethod {
    #[default]
    Owned,
    Leased,
}

impl RecoveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::Leased => "leased",
        }
    }
}

impl fmt::Display for RecoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialOrd for RecoveryMethod {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered by name so rollup lines sort lexicographically
impl Ord for RecoveryMethod {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

fn default_cogs_percent() -> f64 {
    100.0
}

/// A capital asset as entered or imported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Unique identifier
    #[serde(default)]
    pub id: EquipmentId,

    /// Display name (required)
    pub name: String,

    /// Category key (required)
    pub category: String,

    #[serde(default)]
    pub status: EquipmentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    // Cost facts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,

    #[serde(default)]
    pub purchase_price: f64,

    #[serde(default)]
    pub sales_tax: f64,

    #[serde(default)]
    pub freight_setup: f64,

    #[serde(default)]
    pub other_capex: f64,

    /// Share of cost charged to jobs (0-100); the rest is overhead
    #[serde(default = "default_cogs_percent")]
    pub cogs_percent: f64,

    // Valuation overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub useful_life_override: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_resale_override: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_cost_new: Option<f64>,

    // Financing facts, informational only
    #[serde(default)]
    pub financing_type: FinancingType,

    #[serde(default)]
    pub deposit_amount: f64,

    #[serde(default)]
    pub financed_amount: f64,

    #[serde(default)]
    pub monthly_payment: f64,

    #[serde(default)]
    pub term_months: u32,

    #[serde(default)]
    pub buyout_amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing_start_date: Option<NaiveDate>,

    #[serde(default)]
    pub allocation_type: AllocationType,

    /// Explicit opt-in to lease-style recovery in budget rollups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lmn_recovery_method: Option<RecoveryMethod>,

    // Disposal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
}

impl Equipment {
    /// Create an active, owned, fully operational asset with no costs
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: EquipmentId::new(),
            name: name.into(),
            category: category.into(),
            status: EquipmentStatus::Active,
            make: None,
            model: None,
            year: None,
            serial_number: None,
            purchase_date: None,
            purchase_price: 0.0,
            sales_tax: 0.0,
            freight_setup: 0.0,
            other_capex: 0.0,
            cogs_percent: default_cogs_percent(),
            useful_life_override: None,
            expected_resale_override: None,
            replacement_cost_new: None,
            financing_type: FinancingType::Owned,
            deposit_amount: 0.0,
            financed_amount: 0.0,
            monthly_payment: 0.0,
            term_months: 0,
            buyout_amount: 0.0,
            financing_start_date: None,
            allocation_type: AllocationType::Operational,
            lmn_recovery_method: None,
            sale_date: None,
            sale_price: None,
        }
    }

    /// Check required identification fields
    pub fn validate(&self) -> FleetResult<()> {
        if self.name.trim().is_empty() {
            return Err(FleetError::missing_field(self.id.to_string(), "name"));
        }
        if self.category.trim().is_empty() {
            return Err(FleetError::missing_field(self.name.clone(), "category"));
        }
        Ok(())
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_equipment_defaults() {
        let eq = Equipment::new("Ford F-250", "Truck");
        assert_eq!(eq.status, EquipmentStatus::Active);
        assert_eq!(eq.financing_type, FinancingType::Owned);
        assert_eq!(eq.allocation_type, AllocationType::Operational);
        assert_eq!(eq.cogs_percent, 100.0);
        assert!(eq.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_fields() {
        let eq = Equipment::new("  ", "Truck");
        assert!(matches!(
            eq.validate(),
            Err(FleetError::MissingField { field: "name", .. })
        ));

        let eq = Equipment::new("Trailer 1", "");
        assert!(matches!(
            eq.validate(),
            Err(FleetError::MissingField {
                field: "category",
                ..
            })
        ));
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{
            "name": "Kubota SVL75",
            "category": "Skid Steer",
            "purchase_price": 62000,
            "financing_type": "leased",
            "allocation_type": "owner_perk",
            "lmn_recovery_method": "leased"
        }"#;
        let eq: Equipment = serde_json::from_str(json).unwrap();
        assert_eq!(eq.purchase_price, 62000.0);
        assert_eq!(eq.cogs_percent, 100.0);
        assert_eq!(eq.financing_type, FinancingType::Leased);
        assert_eq!(eq.allocation_type, AllocationType::OwnerPerk);
        assert_eq!(eq.lmn_recovery_method, Some(RecoveryMethod::Leased));
        assert_eq!(eq.status, EquipmentStatus::Active);
    }

    #[test]
    fn test_recovery_method_orders_by_name() {
        assert!(RecoveryMethod::Leased < RecoveryMethod::Owned);
    }

    #[test]
    fn test_allocation_partition() {
        assert!(AllocationType::Operational.is_field());
        assert!(!AllocationType::OverheadOnly.is_field());
        assert!(!AllocationType::OwnerPerk.is_field());
    }
}
