use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use payroll_consolidator::config::ConfigLoader;
use payroll_consolidator::io::OutputFormat;
use payroll_consolidator::pipeline::{Consolidator, RunPaths};

/// Consolidate a payroll liquidation report with employee master data.
#[derive(Parser, Debug)]
#[command(name = "payroll-consolidator", version, about)]
struct Cli {
    /// Liquidation report exported as fixed-width text
    #[arg(long)]
    report: PathBuf,

    /// Master data file (csv, xlsx, xlsm, xlsb, xls or ods)
    #[arg(long)]
    master: PathBuf,

    /// Output path (defaults to a timestamped name in the current directory)
    #[arg(long)]
    output: Option<PathBuf>,

    /// YAML configuration overriding the built-in layout
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Xlsx)]
    format: Format,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    summary: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Xlsx,
    Csv,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Xlsx => OutputFormat::Xlsx,
            Format::Csv => OutputFormat::Csv,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "payroll_consolidator=debug,info"
    } else {
        "payroll_consolidator=info,warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let loader = match &cli.config {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => ConfigLoader::default(),
    };
    let consolidator = Consolidator::new(loader)?;

    let format = OutputFormat::from(cli.format);
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(consolidator.default_output_name(format)));

    info!(
        report = %cli.report.display(),
        master = %cli.master.display(),
        "Starting consolidation"
    );
    let summary = consolidator
        .run(&RunPaths {
            report: cli.report,
            master: cli.master,
            output,
            format,
        })
        .context("Consolidation failed")?;

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if let Some(path) = &summary.output_path {
        eprintln!("Wrote {}", path);
    }
    Ok(())
}
