use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use citydash::analytics::DiagonalPolicy;
use citydash::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "citydash",
    version,
    about = "Turn regional indicator API responses into dashboard chart data",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML config file (defaults to CITYDASH_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true, default_value = "false")]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a city comparison response
    Compare {
        /// Comparison response JSON ("-" or omitted for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// First year of the summary range
        #[arg(long)]
        start: Option<i32>,

        /// Last year of the summary range
        #[arg(long)]
        end: Option<i32>,
    },

    /// Build the correlation heatmap from a pairwise response
    Correlate {
        /// Correlation response JSON ("-" or omitted for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Fill for unset diagonal cells (zero, unit)
        #[arg(long)]
        diagonal: Option<String>,
    },

    /// Compose forecast chart series from a prediction response
    Predict {
        /// Prediction response JSON ("-" or omitted for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Include the naive error diagnostic over the training window
        #[arg(long, default_value = "false")]
        with_diagnostic: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    if cli.pretty {
        config.output.pretty = true;
    }
    config.validate().context("Invalid configuration")?;

    // Initialize tracing/logging
    setup_tracing(&config.logging.level, &config.logging.format, cli.verbose)?;

    tracing::debug!(config = ?config, "Configuration loaded");

    match cli.command {
        Commands::Compare { input, start, end } => {
            tracing::info!(input = ?input, start = ?start, end = ?end, "Starting compare command");
            commands::compare(commands::CompareParams {
                input,
                start,
                end,
                tolerance: config.analysis.aggregate_tolerance,
                pretty: config.output.pretty,
            })?;
        }

        Commands::Correlate { input, diagonal } => {
            let diagonal = match diagonal {
                Some(text) => DiagonalPolicy::parse(&text)
                    .with_context(|| format!("Unknown diagonal policy: {text}"))?,
                None => config.analysis.diagonal,
            };
            tracing::info!(input = ?input, diagonal = diagonal.as_str(), "Starting correlate command");
            commands::correlate(commands::CorrelateParams {
                input,
                diagonal,
                decimals: config.output.decimals,
                pretty: config.output.pretty,
            })?;
        }

        Commands::Predict {
            input,
            with_diagnostic,
        } => {
            tracing::info!(
                input = ?input,
                with_diagnostic = %with_diagnostic,
                "Starting predict command"
            );
            commands::predict(commands::PredictParams {
                input,
                with_diagnostic,
                pretty: config.output.pretty,
            })?;
        }
    }

    Ok(())
}

fn setup_tracing(level: &str, format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("citydash=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new(format!("citydash={level},warn"))
    };

    // stdout carries the JSON result, logs go to stderr
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
