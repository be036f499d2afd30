//! CLI commands for cashflow projection

use clap::Subcommand;

use super::{find_equipment, InputArgs};
use crate::config::Settings;
use crate::error::FleetResult;
use crate::services::cashflow;

/// Cashflow subcommands
#[derive(Subcommand, Debug)]
pub enum CashflowCommands {
    /// Monthly outflow vs. recovery across all active equipment
    Portfolio {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Month-by-month payback timeline for one asset
    Timeline {
        #[command(flatten)]
        input: InputArgs,

        /// Equipment ID or name
        equipment: String,

        /// Print every Nth month
        #[arg(long, default_value = "12")]
        step: u32,
    },
}

/// Handle cashflow commands
pub fn handle_cashflow_command(settings: &Settings, cmd: CashflowCommands) -> FleetResult<()> {
    let currency = &settings.currency_symbol;

    match cmd {
        CashflowCommands::Portfolio { input } => {
            let as_of = input.as_of()?;
            let items = input.load_calculated(settings)?;
            let portfolio = cashflow::portfolio(&items, as_of);

            println!("Equipment Cashflow as of {}", portfolio.as_of);
            println!("{}", "=".repeat(86));
            println!(
                "{:<24} {:<9} {:>12} {:>12} {:>12} {:>7} {:<9}",
                "Name", "Financing", "Outflow/mo", "Recovery/mo", "Net/mo", "Ratio", "Status"
            );
            for asset in &portfolio.assets {
                println!(
                    "{:<24} {:<9} {:>12.2} {:>12.2} {:>12.2} {:>7} {:<9}",
                    asset.name,
                    asset.financing_type,
                    asset.monthly_outflow,
                    asset.monthly_recovery,
                    asset.monthly_net,
                    format_ratio(asset.outflow_recovery_ratio),
                    asset.status
                );
            }
            println!("{}", "-".repeat(86));
            println!(
                "Monthly outflow:  {}{:.2}",
                currency, portfolio.total_monthly_outflow
            );
            println!(
                "Monthly recovery: {}{:.2}",
                currency, portfolio.total_monthly_recovery
            );
            println!("Net monthly:      {}{:.2}", currency, portfolio.net_monthly);
            println!(
                "Outlay to date:   {}{:.2}",
                currency, portfolio.total_cash_outlay_to_date
            );
            println!(
                "Remaining owed:   {}{:.2}",
                currency, portfolio.total_remaining_obligation
            );
            println!(
                "Status:           {} (ratio {}; {} surplus, {} neutral, {} shortfall)",
                portfolio.status,
                format_ratio(portfolio.outflow_recovery_ratio),
                portfolio.surplus_count,
                portfolio.neutral_count,
                portfolio.shortfall_count
            );
        }
        CashflowCommands::Timeline {
            input,
            equipment,
            step,
        } => {
            let as_of = input.as_of()?;
            let items = input.load_calculated(settings)?;
            let item = find_equipment(&items, &equipment)?;
            let timeline = cashflow::timeline(item, as_of);
            let step = step.max(1);

            println!("Payback timeline: {}", item.equipment);
            println!(
                "{:>6} {:>14} {:>14} {:>14}",
                "Month", "Outlay", "Recovery", "Net"
            );
            for point in timeline
                .points
                .iter()
                .filter(|p| p.month % step == 0 || Some(p.month) == timeline.payback_month)
            {
                let marker = if Some(point.month) == timeline.current_month {
                    " <- now"
                } else {
                    ""
                };
                println!(
                    "{:>6} {:>14.2} {:>14.2} {:>14.2}{}",
                    point.month,
                    point.cumulative_outlay,
                    point.cumulative_recovery,
                    point.net_position,
                    marker
                );
            }

            match timeline.payback_month {
                Some(month) => println!("Payback reached in month {}", month),
                None => println!("Payback not reached within {} months", timeline.months),
            }
        }
    }

    Ok(())
}

fn format_ratio(ratio: Option<f64>) -> String {
    ratio
        .map(|r| format!("{:.2}", r))
        .unwrap_or_else(|| "-".to_string())
}
