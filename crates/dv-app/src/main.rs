//! `dashly` command-line entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dv_core::ChartKind;
use dv_data::ImportConfig;
use dv_views::{ExportFormat, ExportOptions};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "dashly",
    version,
    about = "Inspect, chart, query and export tabular data files (CSV, Excel, SQL scripts)"
)]
struct Cli {
    /// Import settings (JSON): format and delimiter overrides, missing-value patterns
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CSV delimiter override
    #[arg(long, global = true)]
    delimiter: Option<char>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show metadata, inferred column types and data-quality issues
    Inspect {
        file: PathBuf,
        /// Rows to include in the preview
        #[arg(long, default_value_t = 5)]
        preview: usize,
    },
    /// Per-column summary statistics
    Stats { file: PathBuf },
    /// Chart-ready labels and values
    Chart {
        file: PathBuf,
        /// pie, bar, scatter or line
        #[arg(long)]
        kind: ChartKind,
        #[arg(short, long)]
        x: String,
        #[arg(short, long)]
        y: Option<String>,
        /// Colors to attach instead of the default palette
        #[arg(long, value_delimiter = ',')]
        colors: Vec<String>,
    },
    /// Run a SELECT query against the file
    Query { file: PathBuf, sql: String },
    /// Correlations, distribution and insights for a target column
    Analyze {
        file: PathBuf,
        #[arg(short, long)]
        target: String,
        /// Candidate factor columns; defaults to every other numeric column
        #[arg(long, value_delimiter = ',')]
        factors: Vec<String>,
        /// Check the student stress survey structure and default to its factor columns
        #[arg(long)]
        student_stress: bool,
    },
    /// Export the file or a query result as JSON, CSV or TXT
    Export {
        file: PathBuf,
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,
        /// Export the result of this query instead of the whole table
        #[arg(long)]
        query: Option<String>,
        /// Output file; printed to stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        metadata: bool,
        #[arg(long)]
        no_headers: bool,
    },
}

impl Command {
    fn file(&self) -> &PathBuf {
        match self {
            Command::Inspect { file, .. }
            | Command::Stats { file }
            | Command::Chart { file, .. }
            | Command::Query { file, .. }
            | Command::Analyze { file, .. }
            | Command::Export { file, .. } => file,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn import_config(cli: &Cli) -> Result<ImportConfig> {
    let mut config = match &cli.config {
        Some(path) => ImportConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ImportConfig::default(),
    };
    if let Some(delimiter) = cli.delimiter {
        config.delimiter = Some(delimiter);
        config.validate()?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = import_config(&cli)?;
    let table = commands::load(cli.command.file(), &config).await?;

    match &cli.command {
        Command::Inspect { preview, .. } => print_json(&commands::inspect(&table, &config, *preview))?,
        Command::Stats { .. } => print_json(&commands::stats(&table, &config))?,
        Command::Chart { kind, x, y, colors, .. } => {
            print_json(&commands::chart(&table, *kind, x, y.as_deref(), colors))?
        }
        Command::Query { sql, .. } => print_json(&commands::query(&table, sql)?)?,
        Command::Analyze {
            target,
            factors,
            student_stress,
            ..
        } => print_json(&commands::analyze(&table, &config, target, factors, *student_stress))?,
        Command::Export {
            format,
            query,
            output,
            metadata,
            no_headers,
            ..
        } => {
            let name = output
                .as_ref()
                .and_then(|p| p.file_stem())
                .or_else(|| cli.command.file().file_stem())
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned();
            let options = ExportOptions::new(*format, name)
                .with_headers(!no_headers)
                .with_metadata(*metadata);
            let content = commands::export(&table, query.as_deref(), &options)?;

            match output {
                Some(path) => {
                    tokio::fs::write(path, &content)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {} ({} bytes)", path.display(), content.len());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}
