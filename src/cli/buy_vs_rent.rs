//! CLI command for buy-vs-rent analysis
//!
//! Life, resale, maintenance and insurance can be given explicitly or seeded
//! from a category row; explicit values win.

use clap::Args;

use crate::config::Settings;
use crate::error::FleetResult;
use crate::services::{analyze, BuyVsRentInput};

/// Arguments for `fleetcost buy-vs-rent`
#[derive(Args, Debug)]
pub struct BuyVsRentArgs {
    /// Purchase price
    #[arg(long)]
    pub price: f64,

    /// Seed life, resale, maintenance and insurance from this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Years of ownership
    #[arg(long)]
    pub life: Option<u32>,

    /// Resale value at end of life
    #[arg(long)]
    pub resale: Option<f64>,

    #[arg(long)]
    pub daily: Option<f64>,

    #[arg(long)]
    pub weekly: Option<f64>,

    #[arg(long)]
    pub monthly: Option<f64>,

    /// Working days of use per year (defaults to the settings value)
    #[arg(long)]
    pub days: Option<u32>,

    #[arg(long)]
    pub maintenance: Option<f64>,

    #[arg(long)]
    pub insurance: Option<f64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl BuyVsRentArgs {
    /// Build the analysis input from arguments and settings
    pub fn to_input(&self, settings: &Settings) -> BuyVsRentInput {
        let table = settings.category_table();
        let category = self.category.as_deref().unwrap_or(table.fallback_key());
        let days = self.days.unwrap_or(settings.default_usage_days_per_year);

        let mut input = BuyVsRentInput::from_category(table.lookup(category), self.price, days);
        if let Some(life) = self.life {
            input.useful_life = life;
        }
        if let Some(resale) = self.resale {
            input.resale_value = resale;
        }
        if let Some(maintenance) = self.maintenance {
            input.annual_maintenance = maintenance;
        }
        if let Some(insurance) = self.insurance {
            input.annual_insurance = insurance;
        }
        input.rental_rate_daily = self.daily;
        input.rental_rate_weekly = self.weekly;
        input.rental_rate_monthly = self.monthly;
        input
    }
}

/// Handle the buy-vs-rent command
pub fn handle_buy_vs_rent_command(settings: &Settings, args: BuyVsRentArgs) -> FleetResult<()> {
    let input = args.to_input(settings);
    let result = analyze(&input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let currency = &settings.currency_symbol;
    println!("Buy vs. Rent");
    println!("{}", "=".repeat(48));
    println!(
        "Annual ownership cost: {}{:.2}",
        currency, result.annual_ownership_cost
    );
    println!(
        "Annual rental cost:    {}{:.2} ({})",
        currency, result.annual_rental_cost, result.rental_basis
    );
    println!(
        "Break-even:            {:.1} days/year ({} rate)",
        result.break_even.primary_days, result.break_even.primary_basis
    );
    println!(
        "Recommendation:        {} (saves {}{:.2}/yr, {:.1}%)",
        result.recommendation,
        currency,
        result.annual_savings,
        result.percent_difference * 100.0
    );

    println!();
    println!("{:>4} {:>14} {:>14} {:>14}", "Year", "Own", "Rent", "Difference");
    for year in &result.yearly_comparison {
        println!(
            "{:>4} {:>14.2} {:>14.2} {:>14.2}",
            year.year, year.cumulative_ownership_cost, year.cumulative_rental_cost, year.difference
        );
    }

    Ok(())
}
