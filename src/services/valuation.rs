//! Valuation service
//!
//! Derives cost basis, COGS/overhead allocation, useful life, resale value
//! and ROI for a single asset. Results are pure projections of the input
//! `Equipment` and the category table; they are recomputed on demand and
//! never stored on their own.
//!
//! Financing fields are deliberately not read here. Cost basis and
//! depreciation depend only on purchase facts and category assumptions.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::FleetResult;
use crate::models::{
    CategoryTable, Equipment, EquipmentStatus, FinancingType, RecoveryMethod,
};

/// Longest useful life, in years, a valuation will use
pub const MAX_USEFUL_LIFE: u32 = 100;

/// Equipment plus every derived valuation field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCalculated {
    #[serde(flatten)]
    pub equipment: Equipment,

    /// purchase price + sales tax + freight/setup + other capex
    pub total_cost_basis: f64,

    /// 100 - cogs percent
    pub overhead_percent: f64,

    pub cogs_allocated_cost: f64,

    pub overhead_allocated_cost: f64,

    /// Override if present, otherwise the category default
    pub useful_life_used: u32,

    pub purchase_year: i32,

    pub estimated_end_of_life_year: i32,

    /// Never negative
    pub estimated_years_left: u32,

    pub age_years: u32,

    /// Replacement cost new when positive, otherwise the cost basis
    pub replacement_cost_used: f64,

    pub expected_resale_used: f64,

    /// Only present for sold assets with a sale price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi_percent: Option<f64>,

    /// Budget-export treatment resolved from financing type and the opt-in flag
    pub recovery_method: RecoveryMethod,

    /// (replacement cost - resale) / life, the amount priced into jobs each year
    pub annual_recovery: f64,

    /// Straight-line book depreciation of the cost basis down to resale
    pub annual_depreciation: f64,
}

impl EquipmentCalculated {
    pub fn is_active(&self) -> bool {
        self.equipment.status == EquipmentStatus::Active
    }

    /// Useful life as a divisor, never below one year
    pub fn life_divisor(&self) -> f64 {
        life_divisor(self.useful_life_used)
    }
}

/// One year of a straight-line depreciation schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationRow {
    /// 1-based year of ownership
    pub year_index: u32,
    pub calendar_year: i32,
    pub beginning_book_value: f64,
    pub depreciation: f64,
    pub ending_book_value: f64,
}

/// Service computing per-asset valuation against a category table
pub struct ValuationService<'a> {
    categories: &'a CategoryTable,
}

impl<'a> ValuationService<'a> {
    /// Create a new valuation service
    pub fn new(categories: &'a CategoryTable) -> Self {
        Self { categories }
    }

    /// Derive the calculated record for one asset as of a date
    ///
    /// # Errors
    ///
    /// Fails only when the record is missing its name or category. Every
    /// other malformed value is clamped.
    pub fn calculate(&self, equipment: &Equipment, as_of: NaiveDate) -> FleetResult<EquipmentCalculated> {
        equipment.validate()?;

        let defaults = self.categories.lookup(&equipment.category);

        let total_cost_basis = total_cost_basis(equipment);

        let cogs_percent = equipment.cogs_percent.clamp(0.0, 100.0);
        let overhead_percent = 100.0 - cogs_percent;
        let cogs_allocated_cost = total_cost_basis * cogs_percent / 100.0;
        let overhead_allocated_cost = total_cost_basis * overhead_percent / 100.0;

        let useful_life_used = equipment
            .useful_life_override
            .unwrap_or(defaults.default_useful_life)
            .min(MAX_USEFUL_LIFE);

        let current_year = as_of.year();
        let purchase_year = equipment
            .purchase_date
            .map(|d| d.year())
            .unwrap_or(current_year);
        let estimated_end_of_life_year = purchase_year.saturating_add(useful_life_used as i32);
        let estimated_years_left =
            estimated_end_of_life_year.saturating_sub(current_year).max(0) as u32;
        let age_years = current_year.saturating_sub(purchase_year).max(0) as u32;

        let replacement_cost_used = match equipment.replacement_cost_new {
            Some(cost) if cost > 0.0 => cost,
            _ => total_cost_basis,
        };

        let expected_resale_used = equipment
            .expected_resale_override
            .unwrap_or(replacement_cost_used * defaults.default_resale_percent / 100.0)
            .max(0.0);

        let divisor = life_divisor(useful_life_used);
        let annual_recovery = (replacement_cost_used - expected_resale_used) / divisor;
        let annual_depreciation = (total_cost_basis - expected_resale_used).max(0.0) / divisor;

        Ok(EquipmentCalculated {
            equipment: equipment.clone(),
            total_cost_basis,
            overhead_percent,
            cogs_allocated_cost,
            overhead_allocated_cost,
            useful_life_used,
            purchase_year,
            estimated_end_of_life_year,
            estimated_years_left,
            age_years,
            replacement_cost_used,
            expected_resale_used,
            roi_percent: roi_percent(equipment, total_cost_basis),
            recovery_method: resolve_recovery_method(equipment),
            annual_recovery,
            annual_depreciation,
        })
    }

    /// Calculate every record, stopping at the first structurally invalid one
    pub fn calculate_all(
        &self,
        equipment: &[Equipment],
        as_of: NaiveDate,
    ) -> FleetResult<Vec<EquipmentCalculated>> {
        let calculated = equipment
            .iter()
            .map(|eq| self.calculate(eq, as_of))
            .collect::<FleetResult<Vec<_>>>()?;

        tracing::debug!(count = calculated.len(), %as_of, "calculated equipment valuations");
        Ok(calculated)
    }
}

/// Year-by-year straight-line schedule from cost basis down to resale value
pub fn depreciation_schedule(calculated: &EquipmentCalculated) -> Vec<DepreciationRow> {
    let years = calculated.useful_life_used.max(1);
    let depreciation = calculated.annual_depreciation;
    let final_value = calculated.total_cost_basis - depreciation * years as f64;

    let mut rows = Vec::with_capacity(years as usize);
    let mut book_value = calculated.total_cost_basis;

    for year_index in 1..=years {
        let ending_book_value = if year_index == years {
            final_value
        } else {
            book_value - depreciation
        };
        rows.push(DepreciationRow {
            year_index,
            calendar_year: calculated.purchase_year + year_index as i32 - 1,
            beginning_book_value: book_value,
            depreciation,
            ending_book_value,
        });
        book_value = ending_book_value;
    }

    rows
}

/// Sum of the capitalized cost components, each floored at zero
pub fn total_cost_basis(equipment: &Equipment) -> f64 {
    let components = [
        equipment.purchase_price,
        equipment.sales_tax,
        equipment.freight_setup,
        equipment.other_capex,
    ];
    if components.iter().any(|c| *c < 0.0) {
        tracing::debug!(equipment = %equipment.name, "negative cost component clamped to zero");
    }
    components.iter().map(|c| c.max(0.0)).sum()
}

/// Useful life as a divisor, never below one year
pub fn life_divisor(useful_life: u32) -> f64 {
    useful_life.max(1) as f64
}

fn roi_percent(equipment: &Equipment, total_cost_basis: f64) -> Option<f64> {
    if equipment.status != EquipmentStatus::Sold || total_cost_basis <= 0.0 {
        return None;
    }
    equipment
        .sale_price
        .map(|sale| (sale - total_cost_basis) / total_cost_basis * 100.0)
}

/// Leased rollup treatment needs both the financing type and the opt-in flag
fn resolve_recovery_method(equipment: &Equipment) -> RecoveryMethod {
    if equipment.financing_type == FinancingType::Leased
        && equipment.lmn_recovery_method == Some(RecoveryMethod::Leased)
    {
        RecoveryMethod::Leased
    } else {
        RecoveryMethod::Owned
    }
}
