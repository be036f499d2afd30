//! JSON Export functionality
//!
//! Exports a versioned snapshot of a fleet valuation: every calculated
//! record, the budget rollup and the portfolio cashflow, all as of a single
//! date. The snapshot carries the `as_of` date instead of a wall-clock
//! timestamp so identical inputs export identical bytes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{FleetError, FleetResult};
use crate::reports::RollupReport;
use crate::services::cashflow::{self, PortfolioCashflow};
use crate::services::valuation::EquipmentCalculated;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full valuation snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Valuation date
    pub as_of: NaiveDate,

    /// Application version that created the export
    pub app_version: String,

    pub equipment: Vec<EquipmentCalculated>,

    pub rollup: RollupReport,

    pub cashflow: PortfolioCashflow,

    pub metadata: SnapshotMetadata,
}

/// Snapshot metadata for reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub equipment_count: usize,
    pub active_count: usize,
    pub total_cost_basis: f64,
    pub total_annual_recovery: f64,
}

impl FleetSnapshot {
    /// Build a snapshot from calculated equipment
    pub fn new(equipment: Vec<EquipmentCalculated>, as_of: NaiveDate) -> Self {
        let rollup = RollupReport::generate(&equipment);
        let cashflow = cashflow::portfolio(&equipment, as_of);

        let metadata = SnapshotMetadata {
            equipment_count: equipment.len(),
            active_count: equipment.iter().filter(|e| e.is_active()).count(),
            total_cost_basis: equipment.iter().map(|e| e.total_cost_basis).sum(),
            total_annual_recovery: rollup.grand_totals.total_annual_recovery,
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            as_of,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            equipment,
            rollup,
            cashflow,
            metadata,
        }
    }

    /// Validate the snapshot structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        if self.metadata.equipment_count != self.equipment.len() {
            return Err(format!(
                "Metadata lists {} equipment records but the snapshot holds {}",
                self.metadata.equipment_count,
                self.equipment.len()
            ));
        }

        if self.rollup.grand_totals.total_qty != self.metadata.active_count {
            return Err(format!(
                "Rollup covers {} assets but {} are active",
                self.rollup.grand_totals.total_qty, self.metadata.active_count
            ));
        }

        Ok(())
    }
}

/// Export a snapshot to JSON
pub fn export_snapshot_json<W: Write>(
    snapshot: &FleetSnapshot,
    writer: &mut W,
    pretty: bool,
) -> FleetResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, snapshot)
    } else {
        serde_json::to_writer(writer, snapshot)
    }
    .map_err(|e| FleetError::Export(e.to_string()))?;

    Ok(())
}

/// Read a snapshot back from JSON
pub fn import_snapshot_json(json_str: &str) -> FleetResult<FleetSnapshot> {
    let snapshot: FleetSnapshot =
        serde_json::from_str(json_str).map_err(|e| FleetError::Import(e.to_string()))?;

    snapshot.validate().map_err(FleetError::Import)?;

    Ok(snapshot)
}
