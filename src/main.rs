//! CLI entry point for the survey rater.
//!
//! Loads a survey export, runs the cleaning and aggregation pipeline, and
//! writes the cleaned table and aggregate report for charting.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use survey_rater::{
    analyzers::analyzer::run,
    config::{AnalysisConfig, Preset},
    output::{export_table, log_report, print_json, write_report},
    parser::load_table,
};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "survey_rater")]
#[command(about = "Clean and aggregate training survey responses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cleaning and aggregation pipeline over a survey CSV
    Analyze {
        /// Survey responses exported as CSV
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Built-in analysis to run
        #[arg(short, long, value_enum, default_value_t = Preset::EndOfYear)]
        preset: Preset,

        /// JSON analysis config, overrides --preset
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where to write the cleaned numeric table
        #[arg(short, long, default_value = "df_cleaned.csv")]
        export: PathBuf,

        /// Where to write the aggregate report
        #[arg(short, long, default_value = "report.json")]
        report: PathBuf,

        /// Also log the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print a built-in analysis config as JSON
    Config {
        #[arg(short, long, value_enum, default_value_t = Preset::EndOfYear)]
        preset: Preset,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/survey_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("survey_rater.log"));

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

    match cli.command {
        Commands::Analyze {
            source,
            preset,
            config,
            export,
            report,
            json,
        } => {
            let config = match config {
                Some(path) => AnalysisConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => AnalysisConfig::preset(preset),
            };
            analyze(&source, &config, &export, &report, json)?;
        }
        Commands::Config { preset } => {
            println!(
                "{}",
                serde_json::to_string_pretty(&AnalysisConfig::preset(preset))?
            );
        }
    }

    Ok(())
}

/// Loads, transforms and exports one survey file. A failed load stops the
/// run before any aggregate is produced.
#[tracing::instrument(skip(config), fields(analysis = %config.name))]
fn analyze(
    source: &Path,
    config: &AnalysisConfig,
    export: &Path,
    report: &Path,
    json: bool,
) -> Result<()> {
    let table = match load_table(source) {
        Ok(table) => table,
        Err(e) => {
            error!(error = %e, "Survey data could not be loaded");
            return Err(e.into());
        }
    };

    let output = run(table, config).context("survey pipeline failed")?;

    log_report(&output.report);
    if json {
        print_json(&output.report)?;
    }
    if !output.report.diagnostics.is_empty() {
        info!(
            count = output.report.diagnostics.len(),
            "Unmapped answers were treated as missing"
        );
    }

    export_table(export, &output.cleaned).context("exporting cleaned table")?;
    write_report(report, &output.report).context("writing report")?;

    info!(
        export = %export.display(),
        report = %report.display(),
        "Analysis complete"
    );
    Ok(())
}
