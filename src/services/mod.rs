//! Service layer for fleetcost
//!
//! Per-asset valuation, buy-vs-rent comparison, financing cashflow
//! projection and equipment import. Every time-dependent operation takes an
//! explicit `as_of` date; nothing here reads the system clock.

pub mod buy_vs_rent;
pub mod cashflow;
pub mod import;
pub mod valuation;

pub use buy_vs_rent::{
    analyze, BreakEvenAnalysis, BuyVsRentInput, BuyVsRentResult, Recommendation, RentalRate,
    YearlyComparison,
};
pub use cashflow::{
    CashflowStatus, EquipmentCashflow, PaybackTimeline, PaybackTimelinePoint, PortfolioCashflow,
};
pub use import::{load_equipment_file, ImportResult};
pub use valuation::{depreciation_schedule, DepreciationRow, EquipmentCalculated, ValuationService};
