//! Buy-vs-rent analysis
//!
//! Compares the annualized cost of owning an asset against renting it for
//! the same number of working days. The input is a self-contained
//! hypothetical so that assets the fleet does not own yet can be modeled.
//!
//! Rental pricing follows the usual rental-house conventions: a week bills
//! 5 working days and a month bills 22. The renter is assumed rational and
//! always picks the cheapest achievable plan.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FleetError, FleetResult};
use crate::models::CategoryDefaults;

/// Working days billed by a weekly rental
pub const WORKING_DAYS_PER_WEEK: u32 = 5;

/// Working days billed by a monthly rental
pub const WORKING_DAYS_PER_MONTH: u32 = 22;

/// Relative cost gap at or below which neither option is recommended
pub const CLOSE_CALL_THRESHOLD: f64 = 0.15;

/// Rental billing granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalRate {
    Daily,
    Weekly,
    Monthly,
}

impl RentalRate {
    /// Working days covered by one billing period
    pub const fn working_days(&self) -> u32 {
        match self {
            Self::Daily => 1,
            Self::Weekly => WORKING_DAYS_PER_WEEK,
            Self::Monthly => WORKING_DAYS_PER_MONTH,
        }
    }

    /// Number of billing periods needed to cover `days` of use
    pub const fn periods_for(&self, days: u32) -> u32 {
        let span = self.working_days();
        days.div_ceil(span)
    }
}

impl fmt::Display for RentalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// Hypothetical ownership and rental facts for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyVsRentInput {
    pub purchase_price: f64,
    /// Years of ownership
    pub useful_life: u32,
    pub resale_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_rate_daily: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_rate_weekly: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_rate_monthly: Option<f64>,
    pub usage_days_per_year: u32,
    #[serde(default)]
    pub annual_maintenance: f64,
    #[serde(default)]
    pub annual_insurance: f64,
}

impl BuyVsRentInput {
    /// Seed an input from category assumptions
    ///
    /// Life and resale come from the category defaults; maintenance and
    /// insurance are the category percentages applied to the purchase price.
    /// Rental rates are left empty for the caller to fill in.
    pub fn from_category(defaults: &CategoryDefaults, purchase_price: f64, usage_days_per_year: u32) -> Self {
        Self {
            purchase_price,
            useful_life: defaults.default_useful_life,
            resale_value: purchase_price * defaults.default_resale_percent / 100.0,
            rental_rate_daily: None,
            rental_rate_weekly: None,
            rental_rate_monthly: None,
            usage_days_per_year,
            annual_maintenance: purchase_price * defaults.maintenance_percent / 100.0,
            annual_insurance: purchase_price * defaults.insurance_percent / 100.0,
        }
    }

    /// The usable rate for a billing granularity, if present and positive
    pub fn rate(&self, rate: RentalRate) -> Option<f64> {
        let value = match rate {
            RentalRate::Daily => self.rental_rate_daily,
            RentalRate::Weekly => self.rental_rate_weekly,
            RentalRate::Monthly => self.rental_rate_monthly,
        };
        value.filter(|v| *v > 0.0)
    }
}

/// Break-even usage (days per year) under each rental rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenAnalysis {
    pub daily_days: Option<f64>,
    pub weekly_days: Option<f64>,
    pub monthly_days: Option<f64>,
    /// The break-even shown to users
    pub primary_days: f64,
    /// Rate the primary break-even was computed from
    pub primary_basis: RentalRate,
}

/// Outcome of the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Buy,
    Rent,
    CloseCall,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Rent => write!(f, "RENT"),
            Self::CloseCall => write!(f, "CLOSE_CALL"),
        }
    }
}

/// Cumulative cost of each option after a number of years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyComparison {
    pub year: u32,
    pub cumulative_ownership_cost: f64,
    pub cumulative_rental_cost: f64,
    /// Rental minus ownership; positive when owning is ahead
    pub difference: f64,
}

/// Full buy-vs-rent result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyVsRentResult {
    pub annual_depreciation: f64,
    pub annual_ownership_cost: f64,
    /// Cheapest achievable annual rental cost
    pub annual_rental_cost: f64,
    /// Plan that produced `annual_rental_cost`
    pub rental_basis: RentalRate,
    pub break_even: BreakEvenAnalysis,
    pub recommendation: Recommendation,
    /// |own - rent| / max(own, rent)
    pub percent_difference: f64,
    /// |own - rent|
    pub annual_savings: f64,
    pub yearly_comparison: Vec<YearlyComparison>,
}

/// Run the buy-vs-rent comparison
///
/// # Errors
///
/// Returns `FleetError::BreakEvenUndefined` when none of the three rental
/// rates is present and positive.
pub fn analyze(input: &BuyVsRentInput) -> FleetResult<BuyVsRentResult> {
    let life = input.useful_life.max(1);
    let annual_depreciation = (input.purchase_price - input.resale_value) / life as f64;
    let annual_ownership_cost =
        annual_depreciation + input.annual_maintenance + input.annual_insurance;

    let (rental_basis, annual_rental_cost) =
        cheapest_rental(input).ok_or(FleetError::BreakEvenUndefined)?;
    let break_even = break_even(input, annual_ownership_cost).ok_or(FleetError::BreakEvenUndefined)?;

    let gap = (annual_ownership_cost - annual_rental_cost).abs();
    let larger = annual_ownership_cost.max(annual_rental_cost);
    let percent_difference = if larger > 0.0 { gap / larger } else { 0.0 };

    let recommendation = if percent_difference <= CLOSE_CALL_THRESHOLD {
        Recommendation::CloseCall
    } else if annual_ownership_cost < annual_rental_cost {
        Recommendation::Buy
    } else {
        Recommendation::Rent
    };

    let yearly_comparison = (1..=life)
        .map(|year| {
            let cumulative_ownership_cost = annual_ownership_cost * year as f64;
            let cumulative_rental_cost = annual_rental_cost * year as f64;
            YearlyComparison {
                year,
                cumulative_ownership_cost,
                cumulative_rental_cost,
                difference: cumulative_rental_cost - cumulative_ownership_cost,
            }
        })
        .collect();

    tracing::debug!(
        own = annual_ownership_cost,
        rent = annual_rental_cost,
        basis = %rental_basis,
        %recommendation,
        "buy-vs-rent analysis complete"
    );

    Ok(BuyVsRentResult {
        annual_depreciation,
        annual_ownership_cost,
        annual_rental_cost,
        rental_basis,
        break_even,
        recommendation,
        percent_difference,
        annual_savings: gap,
        yearly_comparison,
    })
}

/// Annual rental cost under one rate, if that rate is usable
pub fn annual_rental_cost(input: &BuyVsRentInput, rate: RentalRate) -> Option<f64> {
    input
        .rate(rate)
        .map(|price| price * rate.periods_for(input.usage_days_per_year) as f64)
}

/// Cheapest plan; on a tie the coarser granularity wins
fn cheapest_rental(input: &BuyVsRentInput) -> Option<(RentalRate, f64)> {
    [RentalRate::Monthly, RentalRate::Weekly, RentalRate::Daily]
        .into_iter()
        .filter_map(|rate| annual_rental_cost(input, rate).map(|cost| (rate, cost)))
        .fold(None, |best, candidate| match best {
            Some((_, best_cost)) if best_cost <= candidate.1 => best,
            _ => Some(candidate),
        })
}

/// Break-even days under every usable rate, primary chosen monthly > weekly > daily
fn break_even(input: &BuyVsRentInput, annual_ownership_cost: f64) -> Option<BreakEvenAnalysis> {
    let days_for = |rate: RentalRate| {
        input.rate(rate).map(|price| {
            let effective_daily = price / rate.working_days() as f64;
            (annual_ownership_cost / effective_daily).max(0.0)
        })
    };

    let daily_days = days_for(RentalRate::Daily);
    let weekly_days = days_for(RentalRate::Weekly);
    let monthly_days = days_for(RentalRate::Monthly);

    let (primary_basis, primary_days) = monthly_days
        .map(|d| (RentalRate::Monthly, d))
        .or_else(|| weekly_days.map(|d| (RentalRate::Weekly, d)))
        .or_else(|| daily_days.map(|d| (RentalRate::Daily, d)))?;

    Some(BreakEvenAnalysis {
        daily_days,
        weekly_days,
        monthly_days,
        primary_days,
        primary_basis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UsageUnit;

    fn base_input() -> BuyVsRentInput {
        BuyVsRentInput {
            purchase_price: 40000.0,
            useful_life: 5,
            resale_value: 8000.0,
            rental_rate_daily: Some(300.0),
            rental_rate_weekly: None,
            rental_rate_monthly: None,
            usage_days_per_year: 60,
            annual_maintenance: 2000.0,
            annual_insurance: 800.0,
        }
    }

    #[test]
    fn test_worked_example_recommends_buy() {
        let result = analyze(&base_input()).unwrap();
        assert_eq!(result.annual_depreciation, 6400.0);
        assert_eq!(result.annual_ownership_cost, 9200.0);
        assert_eq!(result.annual_rental_cost, 18000.0);
        assert_eq!(result.rental_basis, RentalRate::Daily);
        assert!((result.percent_difference - 8800.0 / 18000.0).abs() < 1e-12);
        assert_eq!(result.recommendation, Recommendation::Buy);
        assert_eq!(result.annual_savings, 8800.0);
        assert_eq!(result.break_even.primary_basis, RentalRate::Daily);
        assert!((result.break_even.primary_days - 9200.0 / 300.0).abs() < 1e-9);
        assert_eq!(result.yearly_comparison.len(), 5);
        assert_eq!(result.yearly_comparison[4].cumulative_ownership_cost, 46000.0);
        assert_eq!(result.yearly_comparison[4].cumulative_rental_cost, 90000.0);
        assert_eq!(result.yearly_comparison[4].difference, 44000.0);
    }

    #[test]
    fn test_cheapest_rate_is_selected() {
        let mut input = base_input();
        input.rental_rate_weekly = Some(1200.0);
        input.rental_rate_monthly = Some(4000.0);
        assert_eq!(annual_rental_cost(&input, RentalRate::Weekly), Some(14400.0));
        assert_eq!(annual_rental_cost(&input, RentalRate::Monthly), Some(12000.0));

        let result = analyze(&input).unwrap();
        assert_eq!(result.annual_rental_cost, 12000.0);
        assert_eq!(result.rental_basis, RentalRate::Monthly);
    }

    #[test]
    fn test_primary_break_even_prefers_monthly_not_smallest() {
        let mut input = base_input();
        input.rental_rate_weekly = Some(1200.0);
        input.rental_rate_monthly = Some(4000.0);
        let be = analyze(&input).unwrap().break_even;

        let daily = be.daily_days.unwrap();
        let weekly = be.weekly_days.unwrap();
        let monthly = be.monthly_days.unwrap();
        assert!((weekly - 9200.0 / 240.0).abs() < 1e-9);
        assert!((monthly - 9200.0 / (4000.0 / 22.0)).abs() < 1e-9);
        assert!(daily < monthly);
        assert_eq!(be.primary_basis, RentalRate::Monthly);
        assert_eq!(be.primary_days, monthly);

        input.rental_rate_monthly = None;
        let be = analyze(&input).unwrap().break_even;
        assert_eq!(be.primary_basis, RentalRate::Weekly);
        assert_eq!(be.monthly_days, None);
    }

    #[test]
    fn test_partial_periods_bill_in_full() {
        let mut input = base_input();
        input.rental_rate_daily = None;
        input.rental_rate_weekly = Some(1000.0);
        input.usage_days_per_year = 11;
        assert_eq!(annual_rental_cost(&input, RentalRate::Weekly), Some(3000.0));
        input.usage_days_per_year = 0;
        assert_eq!(annual_rental_cost(&input, RentalRate::Weekly), Some(0.0));
    }

    #[test]
    fn test_close_call_buffer() {
        let mut input = base_input();
        // 9200 own vs 10000 rent: 8% apart
        input.rental_rate_daily = Some(10000.0 / 60.0);
        let result = analyze(&input).unwrap();
        assert_eq!(result.recommendation, Recommendation::CloseCall);

        // rent cheaper but still inside the buffer
        input.rental_rate_daily = Some(8500.0 / 60.0);
        let result = analyze(&input).unwrap();
        assert!(result.annual_rental_cost < result.annual_ownership_cost);
        assert_eq!(result.recommendation, Recommendation::CloseCall);
    }

    #[test]
    fn test_rent_recommended_for_low_usage() {
        let mut input = base_input();
        input.usage_days_per_year = 10;
        let result = analyze(&input).unwrap();
        assert_eq!(result.annual_rental_cost, 3000.0);
        assert_eq!(result.recommendation, Recommendation::Rent);
    }

    #[test]
    fn test_no_rates_is_undefined() {
        let mut input = base_input();
        input.rental_rate_daily = None;
        input.rental_rate_weekly = Some(0.0);
        assert!(matches!(analyze(&input), Err(FleetError::BreakEvenUndefined)));
    }

    #[test]
    fn test_break_even_monotonic_in_ownership_cost() {
        let mut input = base_input();
        input.rental_rate_monthly = Some(4000.0);
        let mut previous = 0.0;
        for maintenance in [0.0, 500.0, 2000.0, 5000.0, 20000.0] {
            input.annual_maintenance = maintenance;
            let days = analyze(&input).unwrap().break_even.primary_days;
            assert!(days >= previous);
            previous = days;
        }
    }

    #[test]
    fn test_zero_life_is_clamped() {
        let mut input = base_input();
        input.useful_life = 0;
        let result = analyze(&input).unwrap();
        assert_eq!(result.annual_depreciation, 32000.0);
        assert_eq!(result.yearly_comparison.len(), 1);
    }

    #[test]
    fn test_from_category() {
        let defaults = CategoryDefaults::new(8, 25.0, 10.0, 2.0, UsageUnit::Hours);
        let input = BuyVsRentInput::from_category(&defaults, 40000.0, 90);
        assert_eq!(input.useful_life, 8);
        assert_eq!(input.resale_value, 10000.0);
        assert_eq!(input.annual_maintenance, 4000.0);
        assert_eq!(input.annual_insurance, 800.0);
        assert!(matches!(analyze(&input), Err(FleetError::BreakEvenUndefined)));
    }
}
