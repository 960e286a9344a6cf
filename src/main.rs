//! CLI entry point for the media intelligence recap tool.
//!
//! Provides subcommands for running the full analysis on a CSV export and for
//! checking how a file's headers and rows will be read.

use anyhow::Result;
use clap::{Parser, Subcommand};
use media_intel::config::Settings;
use media_intel::output::to_json;
use media_intel::pipeline::{PipelineError, inspect_file, run_file};
use media_intel::report::write_report;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "media_intel")]
#[command(about = "Charts and an insight recap from a media engagement CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean and aggregate a CSV, then write charts, recap and summary
    Analyze {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Directory to write charts and recap into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also print the full run summary as JSON to stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve headers and clean rows without writing anything
    Inspect {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let cli = Cli::parse();

    let settings = match &cli.command {
        Commands::Analyze { output_dir, .. } => Settings::from_env().with_output_dir(output_dir.clone()),
        Commands::Inspect { .. } => Settings::from_env(),
    };

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("media_intel.log"));

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

    match cli.command {
        Commands::Analyze { input, json, .. } => {
            let report = match run_file(&input) {
                Ok(report) => report,
                Err(e) => {
                    report_failure(&e);
                    return Err(e.into());
                }
            };

            for (field, column) in report.mapping.iter() {
                info!(field = %field, header = %column.header, column = column.index, "Column resolved");
            }
            for (reason, count) in report.skipped.iter().filter(|(_, c)| *c > 0) {
                warn!(reason = %reason, count, "Rows skipped");
            }
            info!(
                rows_read = report.rows_read,
                rows_kept = report.rows_kept,
                "Data successfully processed"
            );

            if json {
                print!("{}", to_json(&report)?);
            }

            let written = write_report(&report, &settings.output_dir)?;
            for path in &written {
                info!(path = %path.display(), "Artifact written");
            }
            info!(output_dir = %settings.output_dir.display(), "Analysis complete");
        }
        Commands::Inspect { input } => match inspect_file(&input) {
            Ok(inspection) => {
                for (field, column) in inspection.mapping.iter() {
                    info!(field = %field, header = %column.header, column = column.index, "Column resolved");
                }
                info!(
                    rows_read = inspection.rows_read,
                    rows_kept = inspection.rows_kept,
                    skipped = %inspection.skipped,
                    "Inspection complete"
                );
            }
            Err(e) => {
                report_failure(&e);
                return Err(e.into());
            }
        },
    }

    Ok(())
}

/// Logs the structured detail of a fatal pipeline error.
fn report_failure(err: &PipelineError) {
    match err {
        PipelineError::Schema(schema) => {
            for field in &schema.missing {
                error!(field = %field, "Required column not found");
            }
            for ambiguous in &schema.ambiguous {
                error!(field = %ambiguous.field, headers = ?ambiguous.headers, "Column matched by several headers");
            }
        }
        PipelineError::EmptyDataset(empty) => {
            for (reason, count) in empty.skipped.iter() {
                error!(reason = %reason, count, "Rows skipped");
            }
            error!(rows_read = empty.rows_read, "No valid rows left after cleaning");
        }
        PipelineError::Io { path, source } => {
            error!(path = %path.display(), error = %source, "Input file could not be read");
        }
        PipelineError::Csv(e) => {
            error!(error = %e, "Input is not valid CSV");
        }
    }
}
