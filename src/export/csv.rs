//! CSV Export functionality
//!
//! The rollup export is imported by budgeting templates in external
//! accounting tools, so its layout is fixed: section order, header rows,
//! total rows, blank-line separators and quoting must not change.

use std::io::Write;

use crate::error::{FleetError, FleetResult};
use crate::reports::{RollupReport, RollupSection};
use crate::services::valuation::EquipmentCalculated;

const OWNED_HEADER: &str =
    "Category,Qty,Avg Replacement Value,Avg Useful Life,Avg End Value,Annual Recovery,COGS,Overhead";

const LEASED_HEADER: &str = "Category,Qty,Monthly Payment,Annual Recovery,COGS,Overhead";

const EQUIPMENT_HEADER: &str = "ID,Name,Category,Status,Allocation,Recovery Method,\
Total Cost Basis,COGS Allocated,Overhead Allocated,Useful Life,End of Life Year,Years Left,\
Replacement Cost,Expected Resale,Annual Recovery,ROI %";

/// Export a rollup report to CSV
///
/// Sections are written in the order Field Owned, Field Leased, Overhead
/// Owned, Overhead Leased. Leased sections are omitted when they have no
/// lines; owned sections are always written.
pub fn export_rollup_csv<W: Write>(report: &RollupReport, writer: &mut W) -> FleetResult<()> {
    writer
        .write_all(rollup_to_csv(report).as_bytes())
        .map_err(|e| FleetError::Export(e.to_string()))
}

/// Render a rollup report as CSV text
pub fn rollup_to_csv(report: &RollupReport) -> String {
    let mut sections: Vec<String> = Vec::with_capacity(4);

    sections.push(owned_section("Field Equipment - Owned", &report.field_owned));
    if !report.field_leased.is_empty() {
        sections.push(leased_section("Field Equipment - Leased", &report.field_leased));
    }
    sections.push(owned_section("Overhead Equipment - Owned", &report.overhead_owned));
    if !report.overhead_leased.is_empty() {
        sections.push(leased_section(
            "Overhead Equipment - Leased",
            &report.overhead_leased,
        ));
    }

    sections.join("\n")
}

fn owned_section(title: &str, section: &RollupSection) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(OWNED_HEADER);
    out.push('\n');

    for line in &section.lines {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            escape_csv(&line.category),
            line.qty,
            format_amount(line.avg_replacement_value),
            format_years(line.avg_useful_life),
            format_amount(line.avg_end_value),
            format_amount(line.total_annual_recovery),
            format_amount(line.total_cogs),
            format_amount(line.total_overhead),
        ));
    }

    let totals = &section.totals;
    out.push_str(&format!(
        "Total,{},,,,{},{},{}\n",
        totals.total_qty,
        format_amount(totals.total_annual_recovery),
        format_amount(totals.total_cogs),
        format_amount(totals.total_overhead),
    ));
    out
}

fn leased_section(title: &str, section: &RollupSection) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(LEASED_HEADER);
    out.push('\n');

    for line in &section.lines {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            escape_csv(&line.category),
            line.qty,
            format_amount(line.avg_monthly_payment()),
            format_amount(line.total_annual_recovery),
            format_amount(line.total_cogs),
            format_amount(line.total_overhead),
        ));
    }

    let totals = &section.totals;
    out.push_str(&format!(
        "Total,{},{},{},{},{}\n",
        totals.total_qty,
        format_amount(totals.total_monthly_payment),
        format_amount(totals.total_annual_recovery),
        format_amount(totals.total_cogs),
        format_amount(totals.total_overhead),
    ));
    out
}

/// Export per-asset valuation rows to CSV
pub fn export_equipment_csv<W: Write>(
    items: &[EquipmentCalculated],
    writer: &mut W,
) -> FleetResult<()> {
    writeln!(writer, "{}", EQUIPMENT_HEADER).map_err(|e| FleetError::Export(e.to_string()))?;

    for item in items {
        let eq = &item.equipment;
        let roi = item
            .roi_percent
            .map(|roi| format!("{:.2}", roi))
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{},{},{},{:.2},{:.2},{:.2},{},{},{},{:.2},{:.2},{:.2},{}",
            eq.id.as_uuid(),
            escape_csv(&eq.name),
            escape_csv(&eq.category),
            eq.status,
            eq.allocation_type,
            item.recovery_method,
            item.total_cost_basis,
            item.cogs_allocated_cost,
            item.overhead_allocated_cost,
            item.useful_life_used,
            item.estimated_end_of_life_year,
            item.estimated_years_left,
            item.replacement_cost_used,
            item.expected_resale_used,
            item.annual_recovery,
            roi
        )
        .map_err(|e| FleetError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Whole currency units, rounded half away from zero
fn format_amount(value: f64) -> String {
    let rounded = value.round();
    if rounded == 0.0 {
        // avoid "-0"
        "0".to_string()
    } else {
        format!("{}", rounded as i64)
    }
}

fn format_years(value: f64) -> String {
    format!("{:.1}", value)
}

/// Escape a string for CSV format
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
