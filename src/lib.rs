//! fleetcost - equipment cost recovery and budgeting
//!
//! Values owned, financed and leased equipment, prices the annual recovery
//! each asset must earn back through job pricing, compares buying against
//! renting, projects financing cashflow and aggregates everything into the
//! budget rollup consumed by external accounting templates.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Equipment records and the category defaults table
//! - `services`: Valuation, buy-vs-rent, cashflow and import
//! - `reports`: Budget rollup aggregation
//! - `export`: CSV, JSON and YAML output
//! - `cli`: Command handlers for the `fleetcost` binary
//!
//! The engine never reads the clock: every time-dependent operation takes an
//! explicit `as_of` date.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fleetcost::models::{CategoryTable, Equipment};
//! use fleetcost::reports::RollupReport;
//! use fleetcost::services::ValuationService;
//!
//! let table = CategoryTable::standard();
//! let mut truck = Equipment::new("Truck 7", "Truck");
//! truck.purchase_price = 42000.0;
//!
//! let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! let items = ValuationService::new(&table).calculate_all(&[truck], as_of)?;
//! let csv = fleetcost::export::rollup_to_csv(&RollupReport::generate(&items));
//! assert!(csv.starts_with("Field Equipment - Owned"));
//! # Ok::<(), fleetcost::FleetError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{FleetError, FleetResult};
