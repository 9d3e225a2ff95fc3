// Sales dashboard entry point: loads the sales CSV, applies the month and
// channel filters and renders the report to stdout.
use anyhow::Context;
use clap::Parser;
use engine::config::DashboardSettings;
use engine::data::{BrazilianCsvParser, DatasetCache};
use engine::presentation::{renderer_for, OutputFormat};
use engine::services::DashboardSession;
use std::io::Write;
use std::path::PathBuf;

/// Sales dashboard: revenue KPIs by month and sales channel
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Sales CSV (`;` delimited, `,` decimals). Overrides the config file
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Month to report, e.g. 3/2024. Defaults to the first month in the data
    #[arg(long, value_name = "M/YYYY")]
    month: Option<String>,

    /// Sales channel ("Ramo") to include; repeat for several. Defaults to all
    #[arg(long = "channel", value_name = "NAME")]
    channels: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the filtered rows to this file in the source CSV format
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Only list the available months and channels
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(args, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run(args: Args, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut settings = match &args.config {
        Some(path) => DashboardSettings::load(path)
            .with_context(|| format!("Failed to load settings from '{}'", path.display()))?,
        None => DashboardSettings::default(),
    };
    if let Some(data) = args.data {
        settings.data_file = data;
    }

    let mut cache = DatasetCache::new(BrazilianCsvParser::new(settings.date_formats.clone()));
    let data_file = settings.data_file.clone();
    let session = DashboardSession::open(&mut cache, settings)
        .with_context(|| format!("Failed to load sales data from '{}'", data_file.display()))?;

    if args.list {
        writeln!(out, "Meses: {}", session.dataset().month_keys().join(", "))?;
        writeln!(out, "Canais de venda: {}", session.dataset().channels().join(", "))?;
        return Ok(());
    }

    let selection = session.default_selection().with_overrides(args.month, args.channels);
    let view = session.view(&selection)?;
    renderer_for(args.format).render(&view, out)?;

    if let Some(path) = args.export {
        view.write_export(&path)
            .with_context(|| format!("Failed to write export to '{}'", path.display()))?;
    }

    Ok(())
}
