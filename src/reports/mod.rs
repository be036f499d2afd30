//! Reports module for fleetcost
//!
//! Aggregated views over calculated equipment. The budget rollup is the
//! input to the CSV export consumed by external accounting tools.

pub mod rollup;

pub use rollup::{RollupLine, RollupReport, RollupSection, RollupTotals};
