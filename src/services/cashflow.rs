//! Financing cashflow projection
//!
//! Compares what an asset costs the business each month in financing
//! payments against the recovery priced into jobs. These figures are
//! informational: nothing here feeds back into cost basis, depreciation or
//! budget rollups.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{EquipmentId, FinancingType};
use crate::services::valuation::{EquipmentCalculated, MAX_USEFUL_LIFE};

/// Outflow/recovery ratio below which an asset runs a surplus
pub const SURPLUS_RATIO: f64 = 0.9;

/// Outflow/recovery ratio above which an asset runs a shortfall
pub const SHORTFALL_RATIO: f64 = 1.1;

/// Minimum timeline length in months
pub const MIN_TIMELINE_MONTHS: u32 = 60;

/// Maximum timeline length in months
pub const MAX_TIMELINE_MONTHS: u32 = MAX_USEFUL_LIFE * 12;

/// Whether recovery covers the financing outflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashflowStatus {
    Surplus,
    Neutral,
    Shortfall,
}

impl fmt::Display for CashflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surplus => write!(f, "Surplus"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Shortfall => write!(f, "Shortfall"),
        }
    }
}

/// Financing recovery metrics for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCashflow {
    pub equipment_id: EquipmentId,
    pub name: String,
    pub category: String,
    pub financing_type: FinancingType,
    pub deposit_amount: f64,
    pub monthly_payment: f64,
    pub term_months: u32,
    pub payments_completed: u32,
    pub payments_remaining: u32,
    /// Everything the asset will have cost in cash once fully paid
    pub total_outlay: f64,
    pub cash_outlay_to_date: f64,
    pub remaining_obligation: f64,
    /// Payments over the amount financed, for financed assets only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_interest: Option<f64>,
    /// Payment currently due each month (zero once paid off)
    pub monthly_outflow: f64,
    pub monthly_recovery: f64,
    /// Recovery minus outflow
    pub monthly_net: f64,
    /// `None` when there is no recovery to compare against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outflow_recovery_ratio: Option<f64>,
    pub status: CashflowStatus,
}

/// Financing recovery metrics for a set of active assets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioCashflow {
    pub as_of: NaiveDate,
    pub assets: Vec<EquipmentCashflow>,
    pub total_monthly_outflow: f64,
    pub total_monthly_recovery: f64,
    pub net_monthly: f64,
    pub total_cash_outlay_to_date: f64,
    pub total_remaining_obligation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outflow_recovery_ratio: Option<f64>,
    pub status: CashflowStatus,
    pub surplus_count: usize,
    pub neutral_count: usize,
    pub shortfall_count: usize,
}

/// Cumulative position at one month of the payback timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaybackTimelinePoint {
    pub month: u32,
    pub cumulative_outlay: f64,
    pub cumulative_recovery: f64,
    /// Recovery minus outlay
    pub net_position: f64,
}

/// Month-by-month outlay against recovery for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaybackTimeline {
    /// Number of months covered; points run from month 0 to this value
    pub months: u32,
    pub points: Vec<PaybackTimelinePoint>,
    /// First month where recovery catches up with a non-zero outlay
    pub payback_month: Option<u32>,
    /// Where `as_of` falls on the timeline, if it does
    pub current_month: Option<u32>,
}

/// Whole months from `start` to `as_of`, zero if `as_of` is earlier
pub fn months_elapsed(start: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of <= start {
        return 0;
    }
    let mut months = (as_of.year() - start.year()) * 12 + as_of.month() as i32 - start.month() as i32;
    if as_of.day() < start.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Payments made as of a date, clamped to the term
///
/// A record without a financing start date has made no payments.
pub fn payments_completed(calculated: &EquipmentCalculated, as_of: NaiveDate) -> u32 {
    let equipment = &calculated.equipment;
    if !equipment.financing_type.has_payments() {
        return 0;
    }
    equipment
        .financing_start_date
        .map(|start| months_elapsed(start, as_of).min(equipment.term_months))
        .unwrap_or(0)
}

/// Classify an outflow against a recovery using the 10% tolerance band
pub fn classify(outflow: f64, recovery: f64) -> (Option<f64>, CashflowStatus) {
    if recovery <= 0.0 {
        let status = if outflow > 0.0 {
            CashflowStatus::Shortfall
        } else {
            CashflowStatus::Neutral
        };
        return (None, status);
    }

    let ratio = outflow / recovery;
    let status = if ratio < SURPLUS_RATIO {
        CashflowStatus::Surplus
    } else if ratio > SHORTFALL_RATIO {
        CashflowStatus::Shortfall
    } else {
        CashflowStatus::Neutral
    };
    (Some(ratio), status)
}

/// Monthly recovery priced into jobs, never negative
fn monthly_recovery(calculated: &EquipmentCalculated) -> f64 {
    calculated.annual_recovery.max(0.0) / 12.0
}

/// Cashflow metrics for one asset as of a date
pub fn per_asset(calculated: &EquipmentCalculated, as_of: NaiveDate) -> EquipmentCashflow {
    let equipment = &calculated.equipment;
    let term = equipment.term_months;
    let monthly_payment = equipment.monthly_payment.max(0.0);
    let deposit = equipment.deposit_amount.max(0.0);
    let buyout = equipment.buyout_amount.max(0.0);

    let completed = payments_completed(calculated, as_of);
    let (payments_remaining, total_outlay, cash_outlay_to_date, remaining_obligation, monthly_outflow) =
        if equipment.financing_type.has_payments() {
            let remaining = term - completed;
            let buyout_paid = term > 0 && completed >= term;
            let buyout_to_date = if buyout_paid { buyout } else { 0.0 };
            (
                remaining,
                deposit + monthly_payment * term as f64 + buyout,
                deposit + monthly_payment * completed as f64 + buyout_to_date,
                monthly_payment * remaining as f64 + (buyout - buyout_to_date),
                if remaining > 0 { monthly_payment } else { 0.0 },
            )
        } else {
            let basis = calculated.total_cost_basis;
            (0, basis, basis, 0.0, 0.0)
        };

    let total_interest = (equipment.financing_type == FinancingType::Financed
        && equipment.financed_amount > 0.0)
        .then(|| (monthly_payment * term as f64 + buyout - equipment.financed_amount).max(0.0));

    let monthly_recovery = monthly_recovery(calculated);
    let (outflow_recovery_ratio, status) = classify(monthly_outflow, monthly_recovery);

    EquipmentCashflow {
        equipment_id: equipment.id,
        name: equipment.name.clone(),
        category: equipment.category.clone(),
        financing_type: equipment.financing_type,
        deposit_amount: deposit,
        monthly_payment,
        term_months: term,
        payments_completed: completed,
        payments_remaining,
        total_outlay,
        cash_outlay_to_date,
        remaining_obligation,
        total_interest,
        monthly_outflow,
        monthly_recovery,
        monthly_net: monthly_recovery - monthly_outflow,
        outflow_recovery_ratio,
        status,
    }
}

/// Cashflow metrics across all active assets
pub fn portfolio(items: &[EquipmentCalculated], as_of: NaiveDate) -> PortfolioCashflow {
    let assets: Vec<EquipmentCashflow> = items
        .iter()
        .filter(|item| item.is_active())
        .map(|item| per_asset(item, as_of))
        .collect();

    let total_monthly_outflow: f64 = assets.iter().map(|a| a.monthly_outflow).sum();
    let total_monthly_recovery: f64 = assets.iter().map(|a| a.monthly_recovery).sum();
    let total_cash_outlay_to_date: f64 = assets.iter().map(|a| a.cash_outlay_to_date).sum();
    let total_remaining_obligation: f64 = assets.iter().map(|a| a.remaining_obligation).sum();
    let count = |status: CashflowStatus| assets.iter().filter(|a| a.status == status).count();

    let (outflow_recovery_ratio, status) = classify(total_monthly_outflow, total_monthly_recovery);

    tracing::info!(
        assets = assets.len(),
        outflow = total_monthly_outflow,
        recovery = total_monthly_recovery,
        %status,
        "portfolio cashflow projected"
    );

    PortfolioCashflow {
        as_of,
        surplus_count: count(CashflowStatus::Surplus),
        neutral_count: count(CashflowStatus::Neutral),
        shortfall_count: count(CashflowStatus::Shortfall),
        assets,
        total_monthly_outflow,
        total_monthly_recovery,
        net_monthly: total_monthly_recovery - total_monthly_outflow,
        total_cash_outlay_to_date,
        total_remaining_obligation,
        outflow_recovery_ratio,
        status,
    }
}

/// Month-by-month payback timeline for one asset
///
/// Covers `max(term, life × 12, 60)` months, capped at
/// [`MAX_TIMELINE_MONTHS`], so short-lived assets still show a recovery tail
/// after payback.
pub fn timeline(calculated: &EquipmentCalculated, as_of: NaiveDate) -> PaybackTimeline {
    let equipment = &calculated.equipment;
    let term = equipment.term_months;
    let months = term
        .max(calculated.useful_life_used.saturating_mul(12))
        .max(MIN_TIMELINE_MONTHS)
        .min(MAX_TIMELINE_MONTHS);

    let monthly_recovery = monthly_recovery(calculated);
    let monthly_payment = equipment.monthly_payment.max(0.0);
    let deposit = equipment.deposit_amount.max(0.0);
    let buyout = equipment.buyout_amount.max(0.0);
    let financed = equipment.financing_type.has_payments();

    let outlay_at = |month: u32| {
        if financed {
            let buyout_due = if term > 0 && month >= term { buyout } else { 0.0 };
            deposit + monthly_payment * month.min(term) as f64 + buyout_due
        } else {
            calculated.total_cost_basis
        }
    };

    let points: Vec<PaybackTimelinePoint> = (0..=months)
        .map(|month| {
            let cumulative_outlay = outlay_at(month);
            let cumulative_recovery = monthly_recovery * month as f64;
            PaybackTimelinePoint {
                month,
                cumulative_outlay,
                cumulative_recovery,
                net_position: cumulative_recovery - cumulative_outlay,
            }
        })
        .collect();

    let payback_month = points
        .iter()
        .find(|p| {
            p.month > 0 && p.cumulative_outlay > 0.0 && p.cumulative_recovery >= p.cumulative_outlay
        })
        .map(|p| p.month);

    let anchor = if financed {
        equipment.financing_start_date
    } else {
        equipment.purchase_date
    };
    let current_month = anchor
        .filter(|start| *start <= as_of)
        .map(|start| months_elapsed(start, as_of))
        .filter(|month| *month <= months);

    PaybackTimeline {
        months,
        points,
        payback_month,
        current_month,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CategoryDefaults, CategoryTable, Equipment, EquipmentStatus, UsageUnit,
    };
    use crate::services::valuation::ValuationService;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn as_of() -> NaiveDate {
        date(2025, 6, 1)
    }

    /// Ten-year life, no resale: a 60 000 asset recovers exactly 500 a month
    fn table() -> CategoryTable {
        let mut rows = BTreeMap::new();
        rows.insert(
            "Loader".to_string(),
            CategoryDefaults::new(10, 0.0, 7.0, 2.0, UsageUnit::Hours),
        );
        CategoryTable::new(rows, "Loader").unwrap()
    }

    fn loader() -> Equipment {
        let mut eq = Equipment::new("Wheel Loader", "Loader");
        eq.purchase_price = 60000.0;
        eq.purchase_date = Some(date(2024, 1, 15));
        eq
    }

    fn financed_loader() -> Equipment {
        let mut eq = loader();
        eq.financing_type = FinancingType::Financed;
        eq.deposit_amount = 6000.0;
        eq.financed_amount = 32000.0;
        eq.monthly_payment = 1000.0;
        eq.term_months = 36;
        eq.financing_start_date = Some(date(2024, 1, 15));
        eq
    }

    fn calc(eq: &Equipment) -> EquipmentCalculated {
        let table = table();
        ValuationService::new(&table).calculate(eq, as_of()).unwrap()
    }

    #[test]
    fn test_months_elapsed() {
        assert_eq!(months_elapsed(date(2024, 1, 15), date(2025, 6, 1)), 16);
        assert_eq!(months_elapsed(date(2024, 1, 15), date(2025, 6, 15)), 17);
        assert_eq!(months_elapsed(date(2025, 7, 1), date(2025, 6, 1)), 0);
        assert_eq!(months_elapsed(date(2025, 5, 31), date(2025, 6, 30)), 0);
    }

    #[test]
    fn test_payments_completed_clamped() {
        let mut eq = financed_loader();
        assert_eq!(payments_completed(&calc(&eq), as_of()), 16);

        eq.term_months = 12;
        assert_eq!(payments_completed(&calc(&eq), as_of()), 12);

        eq.financing_start_date = None;
        assert_eq!(payments_completed(&calc(&eq), date(2040, 1, 1)), 0);
    }

    #[test]
    fn test_financed_asset_cashflow() {
        let cf = per_asset(&calc(&financed_loader()), as_of());
        assert_eq!(cf.payments_completed, 16);
        assert_eq!(cf.payments_remaining, 20);
        assert_eq!(cf.total_outlay, 42000.0);
        assert_eq!(cf.cash_outlay_to_date, 22000.0);
        assert_eq!(cf.remaining_obligation, 20000.0);
        assert_eq!(cf.cash_outlay_to_date + cf.remaining_obligation, cf.total_outlay);
        assert_eq!(cf.total_interest, Some(4000.0));
        assert_eq!(cf.monthly_outflow, 1000.0);
        assert_eq!(cf.monthly_recovery, 500.0);
        assert_eq!(cf.monthly_net, -500.0);
        assert_eq!(cf.outflow_recovery_ratio, Some(2.0));
        assert_eq!(cf.status, CashflowStatus::Shortfall);
    }

    #[test]
    fn test_buyout_moves_to_outlay_at_term_end() {
        let mut eq = financed_loader();
        eq.financing_type = FinancingType::Leased;
        eq.buyout_amount = 5000.0;
        eq.term_months = 12;
        let cf = per_asset(&calc(&eq), as_of());
        assert_eq!(cf.payments_remaining, 0);
        assert_eq!(cf.cash_outlay_to_date, 6000.0 + 12000.0 + 5000.0);
        assert_eq!(cf.remaining_obligation, 0.0);
        assert_eq!(cf.monthly_outflow, 0.0);
        assert_eq!(cf.status, CashflowStatus::Surplus);
        assert_eq!(cf.total_interest, None);
    }

    #[test]
    fn test_owned_asset_cashflow() {
        let cf = per_asset(&calc(&loader()), as_of());
        assert_eq!(cf.payments_completed, 0);
        assert_eq!(cf.total_outlay, 60000.0);
        assert_eq!(cf.cash_outlay_to_date, 60000.0);
        assert_eq!(cf.monthly_outflow, 0.0);
        assert_eq!(cf.outflow_recovery_ratio, Some(0.0));
        assert_eq!(cf.status, CashflowStatus::Surplus);
    }

    #[test]
    fn test_classification_band() {
        assert_eq!(classify(449.0, 500.0).1, CashflowStatus::Surplus);
        assert_eq!(classify(450.0, 500.0).1, CashflowStatus::Neutral);
        assert_eq!(classify(525.0, 500.0).1, CashflowStatus::Neutral);
        assert_eq!(classify(550.0, 500.0).1, CashflowStatus::Neutral);
        assert_eq!(classify(551.0, 500.0).1, CashflowStatus::Shortfall);
        assert_eq!(classify(100.0, 0.0), (None, CashflowStatus::Shortfall));
        assert_eq!(classify(0.0, 0.0), (None, CashflowStatus::Neutral));
    }

    #[test]
    fn test_portfolio_only_counts_active() {
        let mut sold = loader();
        sold.status = EquipmentStatus::Sold;
        let items = vec![calc(&loader()), calc(&financed_loader()), calc(&sold)];

        let pf = portfolio(&items, as_of());
        assert_eq!(pf.assets.len(), 2);
        assert_eq!(pf.total_monthly_outflow, 1000.0);
        assert_eq!(pf.total_monthly_recovery, 1000.0);
        assert_eq!(pf.net_monthly, 0.0);
        assert_eq!(pf.outflow_recovery_ratio, Some(1.0));
        assert_eq!(pf.status, CashflowStatus::Neutral);
        assert_eq!(pf.surplus_count, 1);
        assert_eq!(pf.shortfall_count, 1);
        assert_eq!(pf.neutral_count, 0);
        assert_eq!(pf.total_remaining_obligation, 20000.0);
    }

    #[test]
    fn test_owned_timeline_payback() {
        let tl = timeline(&calc(&loader()), as_of());
        assert_eq!(tl.months, 120);
        assert_eq!(tl.points.len(), 121);
        assert_eq!(tl.points[0].cumulative_outlay, 60000.0);
        assert_eq!(tl.payback_month, Some(120));
        assert_eq!(tl.current_month, Some(16));
    }

    #[test]
    fn test_financed_timeline_payback() {
        let tl = timeline(&calc(&financed_loader()), as_of());
        assert_eq!(tl.points[36].cumulative_outlay, 42000.0);
        assert_eq!(tl.points[100].cumulative_outlay, 42000.0);
        assert_eq!(tl.payback_month, Some(84));
    }

    #[test]
    fn test_timeline_minimum_length() {
        let mut eq = loader();
        eq.useful_life_override = Some(2);
        let tl = timeline(&calc(&eq), as_of());
        assert_eq!(tl.months, 60);

        let mut eq = financed_loader();
        eq.useful_life_override = Some(1);
        eq.term_months = 72;
        assert_eq!(timeline(&calc(&eq), as_of()).months, 72);
    }

    #[test]
    fn test_timeline_length_is_capped() {
        let mut eq = financed_loader();
        eq.useful_life_override = Some(u32::MAX);
        eq.term_months = u32::MAX;

        let tl = timeline(&calc(&eq), as_of());
        assert_eq!(tl.months, MAX_TIMELINE_MONTHS);
        assert_eq!(tl.points.len(), MAX_TIMELINE_MONTHS as usize + 1);
    }

    #[test]
    fn test_zero_outlay_never_pays_back() {
        let mut eq = loader();
        eq.purchase_price = 0.0;
        eq.replacement_cost_new = Some(12000.0);
        let tl = timeline(&calc(&eq), as_of());
        assert!(tl.points.iter().all(|p| p.cumulative_outlay == 0.0));
        assert_eq!(tl.payback_month, None);
    }

    #[test]
    fn test_current_month_outside_timeline() {
        let mut eq = loader();
        eq.purchase_date = Some(date(2030, 1, 1));
        assert_eq!(timeline(&calc(&eq), as_of()).current_month, None);
    }
}
