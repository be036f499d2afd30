//! CLI command for the budget rollup

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;

use super::InputArgs;
use crate::config::Settings;
use crate::error::{FleetError, FleetResult};
use crate::export::export_rollup_csv;
use crate::reports::RollupReport;

/// Arguments for `fleetcost rollup`
#[derive(Args, Debug)]
pub struct RollupArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the CSV export to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a terminal summary instead of CSV
    #[arg(long, conflicts_with = "output")]
    pub summary: bool,
}

/// Handle the rollup command
pub fn handle_rollup_command(settings: &Settings, args: RollupArgs) -> FleetResult<()> {
    let items = args.input.load_calculated(settings)?;
    let report = RollupReport::generate(&items);

    if args.summary {
        println!("{}", report.format_terminal());
        return Ok(());
    }

    match args.output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                FleetError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            export_rollup_csv(&report, &mut writer)?;
            writer.flush()?;
            println!("Rollup exported to: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            export_rollup_csv(&report, &mut stdout)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
