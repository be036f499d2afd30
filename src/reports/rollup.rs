//! Budget rollup report
//!
//! Groups active equipment into budget lines by category and recovery
//! method, separately for field equipment (operational allocation) and
//! overhead equipment (overhead-only and owner-perk allocation). Section
//! totals are always summed from the lines, never from the raw items, so a
//! section total equals the sum of its lines by construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{EquipmentId, RecoveryMethod};
use crate::services::valuation::EquipmentCalculated;

/// One budget line: all active assets sharing a category and recovery method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupLine {
    pub category: String,
    pub recovery_method: RecoveryMethod,
    pub qty: usize,
    /// Simple mean of replacement cost used
    pub avg_replacement_value: f64,
    /// Simple mean of useful life used
    pub avg_useful_life: f64,
    /// Simple mean of expected resale used
    pub avg_end_value: f64,
    pub total_replacement_value: f64,
    pub total_annual_recovery: f64,
    pub total_cogs: f64,
    pub total_overhead: f64,
    pub total_monthly_payment: f64,
    pub equipment_ids: Vec<EquipmentId>,
}

impl RollupLine {
    /// Average monthly payment per unit, used by the leased export
    pub fn avg_monthly_payment(&self) -> f64 {
        if self.qty == 0 {
            0.0
        } else {
            self.total_monthly_payment / self.qty as f64
        }
    }
}

/// Totals over a set of lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollupTotals {
    pub total_qty: usize,
    pub total_replacement_value: f64,
    pub total_annual_recovery: f64,
    pub total_cogs: f64,
    pub total_overhead: f64,
    pub total_monthly_payment: f64,
}

impl RollupTotals {
    /// Sum line-level aggregates
    pub fn from_lines(lines: &[RollupLine]) -> Self {
        lines.iter().fold(Self::default(), |acc, line| Self {
            total_qty: acc.total_qty + line.qty,
            total_replacement_value: acc.total_replacement_value + line.total_replacement_value,
            total_annual_recovery: acc.total_annual_recovery + line.total_annual_recovery,
            total_cogs: acc.total_cogs + line.total_cogs,
            total_overhead: acc.total_overhead + line.total_overhead,
            total_monthly_payment: acc.total_monthly_payment + line.total_monthly_payment,
        })
    }

    /// Combine two sets of totals
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            total_qty: self.total_qty + other.total_qty,
            total_replacement_value: self.total_replacement_value + other.total_replacement_value,
            total_annual_recovery: self.total_annual_recovery + other.total_annual_recovery,
            total_cogs: self.total_cogs + other.total_cogs,
            total_overhead: self.total_overhead + other.total_overhead,
            total_monthly_payment: self.total_monthly_payment + other.total_monthly_payment,
        }
    }
}

/// Lines of one (field/overhead, owned/leased) section and their totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollupSection {
    pub lines: Vec<RollupLine>,
    pub totals: RollupTotals,
}

impl RollupSection {
    fn from_lines(lines: Vec<RollupLine>) -> Self {
        let totals = RollupTotals::from_lines(&lines);
        Self { lines, totals }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Budget rollup of a fleet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollupReport {
    pub field_owned: RollupSection,
    pub field_leased: RollupSection,
    pub overhead_owned: RollupSection,
    pub overhead_leased: RollupSection,
    pub grand_totals: RollupTotals,
}

/// Grouping key: category then recovery method
pub type GroupKey = (String, RecoveryMethod);

/// Group items by category and recovery method
pub fn group_items<'a, I>(items: I) -> BTreeMap<GroupKey, Vec<&'a EquipmentCalculated>>
where
    I: IntoIterator<Item = &'a EquipmentCalculated>,
{
    items.into_iter().fold(BTreeMap::new(), |mut groups, item| {
        let key = (item.equipment.category.trim().to_string(), item.recovery_method);
        groups.entry(key).or_insert_with(Vec::new).push(item);
        groups
    })
}

/// Build one line from a non-empty group
pub fn build_line(key: &GroupKey, items: &[&EquipmentCalculated]) -> RollupLine {
    let qty = items.len();
    let count = qty.max(1) as f64;
    let sum = |f: fn(&EquipmentCalculated) -> f64| items.iter().map(|item| f(item)).sum::<f64>();

    let total_replacement_value = sum(|i| i.replacement_cost_used);
    let total_useful_life = sum(|i| i.useful_life_used as f64);
    let total_end_value = sum(|i| i.expected_resale_used);

    RollupLine {
        category: key.0.clone(),
        recovery_method: key.1,
        qty,
        avg_replacement_value: total_replacement_value / count,
        avg_useful_life: total_useful_life / count,
        avg_end_value: total_end_value / count,
        total_replacement_value,
        total_annual_recovery: sum(|i| {
            (i.replacement_cost_used - i.expected_resale_used) / i.life_divisor()
        }),
        total_cogs: sum(|i| i.cogs_allocated_cost),
        total_overhead: sum(|i| i.overhead_allocated_cost),
        total_monthly_payment: sum(|i| i.equipment.monthly_payment),
        equipment_ids: items.iter().map(|i| i.equipment.id).collect(),
    }
}

/// Build sorted lines for a set of items, split into (owned, leased)
fn build_sections<'a, I>(items: I) -> (RollupSection, RollupSection)
where
    I: IntoIterator<Item = &'a EquipmentCalculated>,
{
    let lines: Vec<RollupLine> = group_items(items)
        .iter()
        .map(|(key, group)| build_line(key, group))
        .collect();

    let (leased, owned): (Vec<_>, Vec<_>) = lines
        .into_iter()
        .partition(|line| line.recovery_method == RecoveryMethod::Leased);

    (RollupSection::from_lines(owned), RollupSection::from_lines(leased))
}

impl RollupReport {
    /// Roll up calculated equipment; non-active assets are ignored
    pub fn generate(items: &[EquipmentCalculated]) -> Self {
        let active = || items.iter().filter(|item| item.is_active());

        let (field_owned, field_leased) =
            build_sections(active().filter(|item| item.equipment.allocation_type.is_field()));
        let (overhead_owned, overhead_leased) =
            build_sections(active().filter(|item| !item.equipment.allocation_type.is_field()));

        let grand_totals = field_owned
            .totals
            .combine(&field_leased.totals)
            .combine(&overhead_owned.totals)
            .combine(&overhead_leased.totals);

        tracing::info!(
            items = items.len(),
            rolled_up = grand_totals.total_qty,
            lines = field_owned.lines.len()
                + field_leased.lines.len()
                + overhead_owned.lines.len()
                + overhead_leased.lines.len(),
            "generated equipment rollup"
        );

        Self {
            field_owned,
            field_leased,
            overhead_owned,
            overhead_leased,
            grand_totals,
        }
    }

    /// Whether any leased lines exist in either section
    pub fn has_leased(&self) -> bool {
        !self.field_leased.is_empty() || !self.overhead_leased.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Equipment Budget Rollup\n");
        output.push_str(&"=".repeat(80));
        output.push('\n');

        let sections = [
            ("FIELD - OWNED", &self.field_owned),
            ("FIELD - LEASED", &self.field_leased),
            ("OVERHEAD - OWNED", &self.overhead_owned),
            ("OVERHEAD - LEASED", &self.overhead_leased),
        ];

        for (title, section) in sections {
            if section.is_empty() {
                continue;
            }
            output.push_str(&format!("\n{}\n", title));
            output.push_str(&format!(
                "  {:<28} {:>5} {:>14} {:>14} {:>14}\n",
                "Category", "Qty", "Recovery/yr", "COGS", "Overhead"
            ));
            for line in &section.lines {
                output.push_str(&format!(
                    "  {:<28} {:>5} {:>14.2} {:>14.2} {:>14.2}\n",
                    line.category,
                    line.qty,
                    line.total_annual_recovery,
                    line.total_cogs,
                    line.total_overhead
                ));
            }
            output.push_str(&format!(
                "  {:<28} {:>5} {:>14.2} {:>14.2} {:>14.2}\n",
                "Section Total:",
                section.totals.total_qty,
                section.totals.total_annual_recovery,
                section.totals.total_cogs,
                section.totals.total_overhead
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>5} {:>14.2} {:>14.2} {:>14.2}\n",
            "TOTAL",
            self.grand_totals.total_qty,
            self.grand_totals.total_annual_recovery,
            self.grand_totals.total_cogs,
            self.grand_totals.total_overhead
        ));

        output
    }
}
