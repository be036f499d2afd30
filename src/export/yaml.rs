//! YAML Export functionality
//!
//! Writes the same snapshot as the JSON export in a human-readable form.

use std::io::Write;

use crate::error::{FleetError, FleetResult};
use crate::export::json::FleetSnapshot;

/// Export a snapshot to YAML format
pub fn export_snapshot_yaml<W: Write>(snapshot: &FleetSnapshot, writer: &mut W) -> FleetResult<()> {
    let export_err = |e: std::io::Error| FleetError::Export(e.to_string());

    writeln!(writer, "# fleetcost valuation snapshot").map_err(export_err)?;
    writeln!(writer, "# As of: {}", snapshot.as_of).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", snapshot.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, snapshot).map_err(|e| FleetError::Export(e.to_string()))?;

    Ok(())
}

/// Read a snapshot back from YAML
pub fn import_snapshot_yaml(yaml_str: &str) -> FleetResult<FleetSnapshot> {
    let snapshot: FleetSnapshot =
        serde_yaml::from_str(yaml_str).map_err(|e| FleetError::Import(e.to_string()))?;

    snapshot.validate().map_err(FleetError::Import)?;

    Ok(snapshot)
}
