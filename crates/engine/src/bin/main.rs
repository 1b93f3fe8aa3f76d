// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sql_coldoc_engine::{AnalyzerConfig, BatchAnalyzer, ExportFormat, write_report};
use sql_coldoc_ir::Dialect;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(
    name = "sql-coldoc",
    version,
    about = "Column lineage, transformation tags and descriptions for SQL batches"
)]
struct Cli {
    /// SQL file with one or more semicolon-terminated statements
    input: PathBuf,

    /// YAML configuration file
    #[arg(long, env = "SQL_COLDOC_CONFIG")]
    config: Option<PathBuf>,

    /// SQL dialect, overrides the configuration file
    #[arg(long)]
    dialect: Option<Dialect>,

    /// Statements analyzed concurrently
    #[arg(long)]
    workers: Option<usize>,

    /// Report format [default: output extension, or table on stdout]
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the report can be piped
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AnalyzerConfig::default(),
    }
    .with_process_env();
    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
    }
    if let Some(workers) = cli.workers {
        config.worker_count = workers;
    }

    let sql = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let analyzer = BatchAnalyzer::from_config(&config)?;
    let output = analyzer.analyze_batch(&sql).await?;
    if output.columns.is_empty() {
        tracing::warn!(input = %cli.input.display(), "No lineage found");
    }

    let report = output.columns.report();
    match &cli.output {
        Some(path) => {
            let format = cli.format.unwrap_or_else(|| ExportFormat::from_path(path));
            write_report(&report, path, format)?;
        }
        None => {
            let format = cli.format.unwrap_or_default();
            print!("{}", format.render(&report)?);
        }
    }

    Ok(())
}
