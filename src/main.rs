//! # Comanda command line
//!
//! ```bash
//! comanda report --workbook restaurant.xlsx --year 2024 --view sales
//! comanda export menu --output menu.csv
//! comanda check
//! ```
//!
//! The workbook path comes from `--workbook`, then `COMANDA_WORKBOOK`, then
//! `workbook_path` in the config file.

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::Result;
use clap::Parser as _;
use comanda::config::DashboardConfig;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let (config, config_error) = match DashboardConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (DashboardConfig::default(), Some(e)),
    };

    comanda::logging::init(config.log_to_file)?;
    if let Some(e) = config_error {
        tracing::warn!("Using default configuration: {e}");
    }

    cli::run(cli, &config)
}
