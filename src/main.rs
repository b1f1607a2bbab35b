//! CLI entry point for the incident report tool.
//!
//! Provides subcommands for producing the aggregate result bundle from a
//! workbook, inspecting how each year sheet loaded, and exporting yearly
//! totals to CSV.

use anyhow::Result;
use clap::{Parser, Subcommand};
use incident_report::config::PipelineConfig;
use incident_report::loader::SheetOutcome;
use incident_report::output::{append_yearly, print_pretty, write_json, write_json_file};
use incident_report::pipeline::{self, PipelineOutcome, load_dataset};
use incident_report::workbook::{Workbook, XlsxWorkbook};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Exit status when no sheet produced usable rows.
const NO_DATA_EXIT: u8 = 2;

#[derive(Parser)]
#[command(name = "incident-report")]
#[command(about = "Reconcile yearly transit incident sheets and compute aggregates", long_about = None)]
struct Cli {
    /// JSON config file; missing fields use defaults
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Workbook to read (overrides config and INCIDENT_WORKBOOK)
    #[arg(short, long, global = true, value_name = "WORKBOOK")]
    workbook: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the result bundle as JSON
    Report {
        /// File to write the JSON bundle to (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Load the year sheets and report how each one fared
    Sheets,
    /// Append yearly totals to a CSV file
    ExportYearly {
        /// CSV file to append to
        #[arg(short, long, default_value = "yearly_totals.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/incident_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("incident_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    }
    .with_env_overrides()
    .with_workbook(cli.workbook.clone());
    config.validate()?;

    info!(
        workbook = %config.workbook_path.display(),
        years = ?config.years,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Report { output, pretty } => report(&config, output.as_deref(), pretty),
        Commands::Sheets => sheets(&config),
        Commands::ExportYearly { output } => export_yearly(&config, &output),
    }
}

/// Runs the pipeline and emits the bundle, or reports that no data was found.
fn report(config: &PipelineConfig, output: Option<&Path>, pretty: bool) -> Result<ExitCode> {
    match pipeline::run(config)? {
        PipelineOutcome::Report(bundle) => {
            print_pretty(&bundle);
            info!(
                grand_total = bundle.aggregates.summary.grand_total,
                first_year = bundle.aggregates.summary.first_year,
                last_year = bundle.aggregates.summary.last_year,
                coefficient = bundle.aggregates.correlation.coefficient,
                trend = %bundle.aggregates.correlation.trend,
                strength = %bundle.aggregates.correlation.strength,
                "Report ready"
            );

            match output {
                Some(path) => write_json_file(path, &bundle, pretty)?,
                None => write_json(std::io::stdout().lock(), &bundle, pretty)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        PipelineOutcome::NoData { sheets } => {
            error!(sheets = sheets.len(), "No valid data found in the workbook");
            Ok(ExitCode::from(NO_DATA_EXIT))
        }
    }
}

/// Loads the year sheets only and logs each sheet's outcome.
fn sheets(config: &PipelineConfig) -> Result<ExitCode> {
    let mut workbook = XlsxWorkbook::open(&config.workbook_path)?;
    info!(
        path = %workbook.path().display(),
        sheets = ?workbook.sheet_names(),
        "Workbook sheets"
    );

    let (dataset, statuses) = load_dataset(&mut workbook, config);

    for status in &statuses {
        match &status.outcome {
            SheetOutcome::Loaded {
                rows_read,
                rows_kept,
                rows_dropped,
                coerced_counts,
            } => info!(
                sheet = %status.sheet,
                rows_read,
                rows_kept,
                rows_dropped,
                coerced_counts,
                "Loaded"
            ),
            SheetOutcome::Skipped { reason } => {
                warn!(sheet = %status.sheet, reason = %reason, "Skipped")
            }
        }
    }

    let loaded = statuses.iter().filter(|s| s.is_loaded()).count();
    info!(
        loaded,
        skipped = statuses.len() - loaded,
        records = dataset.len(),
        "Sheet summary"
    );

    if dataset.is_empty() {
        error!("No valid data found in the workbook");
        return Ok(ExitCode::from(NO_DATA_EXIT));
    }
    Ok(ExitCode::SUCCESS)
}

/// Appends the yearly totals of a full run to `output`.
fn export_yearly(config: &PipelineConfig, output: &Path) -> Result<ExitCode> {
    match pipeline::run(config)? {
        PipelineOutcome::Report(bundle) => {
            append_yearly(output, &bundle.aggregates.yearly)?;
            info!(
                path = %output.display(),
                rows = bundle.aggregates.yearly.len(),
                "Yearly totals exported"
            );
            Ok(ExitCode::SUCCESS)
        }
        PipelineOutcome::NoData { .. } => {
            error!("No valid data found in the workbook");
            Ok(ExitCode::from(NO_DATA_EXIT))
        }
    }
}
