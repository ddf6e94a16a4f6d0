use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use comanda::config::DashboardConfig;
use comanda::export::ExportKind;
use comanda::report::{View, render_load_failure, render_markdown, render_normalization};
use comanda::snapshot::{Snapshot, SnapshotStore};
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "comanda",
    version,
    about = "Restaurant sales, menu and staffing reports from a workbook"
)]
pub struct Cli {
    /// Path to the workbook (.xlsx). Falls back to the config file.
    #[arg(long, global = true, env = "COMANDA_WORKBOOK")]
    pub workbook: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Table {
    Sales,
    Menu,
}

impl From<Table> for ExportKind {
    fn from(table: Table) -> Self {
        match table {
            Table::Sales => Self::Sales,
            Table::Menu => Self::Menu,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the dashboard views for one year as Markdown
    Report {
        /// Year to report on. Defaults to the config, then the latest year in the workbook.
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(long, value_enum, default_value_t = View::All)]
        view: View,

        /// Print the metrics as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// Export a normalized table as CSV
    Export {
        #[arg(value_enum)]
        table: Table,

        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load and normalize the workbook, then summarise what was kept and dropped
    Check,
}

pub fn run(cli: Cli, config: &DashboardConfig) -> Result<()> {
    let path = config.resolve_workbook(cli.workbook)?;
    let snapshot = load(&path, config)?;

    match cli.command {
        Commands::Report { year, view, json } => handle_report(&snapshot, config, year, view, json),
        Commands::Export { table, output } => handle_export(&snapshot, table.into(), output),
        Commands::Check => {
            let summary = render_normalization(snapshot.report());
            write!(std::io::stdout().lock(), "{summary}")?;
            Ok(())
        }
    }
}

fn load(path: &std::path::Path, config: &DashboardConfig) -> Result<Arc<Snapshot>> {
    let mut store = SnapshotStore::new();
    store.reload(path, &config.sheets).map_err(|e| {
        print_guidance(std::io::stderr().lock(), &e);
        anyhow::Error::new(e).context(format!("Failed to load {}", path.display()))
    })
}

/// Writes the fix-it guidance for a failed load. A broken stream is logged,
/// the load error itself is still returned by the caller.
fn print_guidance(mut out: impl std::io::Write, err: &comanda::error::ComandaError) {
    let guidance = render_load_failure(&err.to_failure());
    if let Err(e) = write!(out, "{guidance}") {
        tracing::warn!("Failed to print load guidance: {e}");
    }
}

fn handle_report(
    snapshot: &Snapshot,
    config: &DashboardConfig,
    year: Option<i32>,
    view: View,
    json: bool,
) -> Result<()> {
    let years = snapshot.years();
    let Some(year) = year.or(config.default_year).or_else(|| years.last().copied()) else {
        bail!("The workbook has no sales years");
    };
    if !years.contains(&year) {
        bail!(
            "No sales data for {year}; available years: {}",
            years.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        );
    }

    let today = chrono::Local::now().date_naive();
    let bundle = snapshot.metrics(year, &config.metrics_options(today));

    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &bundle).context("Failed to serialize metrics")?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_markdown(&bundle, view))?;
    }
    Ok(())
}

fn handle_export(snapshot: &Snapshot, kind: ExportKind, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            kind.write_to_path(snapshot.tables(), &path)?;
            writeln!(std::io::stderr().lock(), "Wrote {}", path.display())?;
        }
        None => kind.write(snapshot.tables(), std::io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report() {
        let cli = Cli::try_parse_from([
            "comanda",
            "report",
            "--workbook",
            "r.xlsx",
            "--year",
            "2024",
            "--view",
            "financials",
        ])
        .unwrap();
        assert_eq!(cli.workbook, Some(PathBuf::from("r.xlsx")));
        match cli.command {
            Commands::Report { year, view, json } => {
                assert_eq!(year, Some(2024));
                assert_eq!(view, View::Financials);
                assert!(!json);
            }
            _ => panic!("expected report"),
        }
    }

    struct ClosedStream;

    impl std::io::Write for ClosedStream {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_print_guidance() {
        let err = comanda::error::ComandaError::MissingSheet {
            sheet: "FoodItems".to_owned(),
        };

        let mut out = Vec::new();
        print_guidance(&mut out, &err);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("FoodItems"));

        // A closed stderr must not panic or replace the load error.
        print_guidance(ClosedStream, &err);
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from(["comanda", "export", "menu", "-o", "menu.csv"]).unwrap();
        match cli.command {
            Commands::Export { table, output } => {
                assert_eq!(table, Table::Menu);
                assert_eq!(output, Some(PathBuf::from("menu.csv")));
            }
            _ => panic!("expected export"),
        }
    }
}
