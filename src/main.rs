use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use sales_conform::ingestion::{DataLayout, ExcelSheetSelection, IngestionOptions};
use sales_conform::observability::{
    CompositeObserver, FileObserver, PipelineObserver, Severity, TracingObserver,
};
use sales_conform::processing::ConformRules;
use sales_conform::{run_with, PipelineError, PipelineOptions, PipelineResult};

#[derive(Parser, Debug)]
#[command(name = "sales-conform")]
#[command(about = "Normalize a raw sales export into the canonical sales CSV")]
#[command(version)]
struct Cli {
    /// Raw input file; defaults to the first compatible file in <root>/data/raw
    #[arg(long)]
    source: Option<PathBuf>,

    /// Output CSV; defaults to <root>/data/processed/ventas_lacteos_2024.csv
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Project root used for the default locations
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// JSON file overriding the conform rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Spreadsheet sheet to read (first sheet when omitted)
    #[arg(long)]
    sheet: Option<String>,

    /// Also append run events to this file
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt::Subscriber::builder().with_env_filter(env).init();

    report(&execute(&cli))
}

/// Why a run failed.
#[derive(Debug)]
enum Failure {
    /// Options could not be built; nothing has logged it yet.
    Setup(PipelineError),
    /// The pipeline failed; its observer already logged the error.
    Pipeline,
}

fn report(outcome: &Result<PathBuf, Failure>) -> ExitCode {
    match outcome {
        Ok(path) => {
            info!(path = %path.display(), "done");
            ExitCode::SUCCESS
        }
        Err(Failure::Setup(e)) => {
            error!(error = %e, "invalid configuration");
            ExitCode::FAILURE
        }
        Err(Failure::Pipeline) => ExitCode::FAILURE,
    }
}

fn execute(cli: &Cli) -> Result<PathBuf, Failure> {
    let layout = DataLayout::under(&cli.root);
    let options = build_options(cli).map_err(Failure::Setup)?;

    run_with(
        cli.source.as_deref(),
        cli.destination.as_deref(),
        &layout,
        &options,
    )
    .map_err(|_| Failure::Pipeline)
}

fn build_options(cli: &Cli) -> PipelineResult<PipelineOptions> {
    let rules = match &cli.rules {
        Some(path) => ConformRules::from_json_path(path)?,
        None => ConformRules::default(),
    };

    let ingestion = IngestionOptions {
        excel_sheet_selection: cli
            .sheet
            .clone()
            .map(ExcelSheetSelection::Sheet)
            .unwrap_or_default(),
        ..Default::default()
    };

    let observer: Arc<dyn PipelineObserver> = match &cli.event_log {
        Some(path) => Arc::new(CompositeObserver::new(vec![
            Arc::new(TracingObserver),
            Arc::new(FileObserver::new(path)),
        ])),
        None => Arc::new(TracingObserver),
    };

    Ok(PipelineOptions {
        ingestion,
        rules,
        observer: Some(observer),
        alert_at_or_above: Severity::Critical,
    })
}
