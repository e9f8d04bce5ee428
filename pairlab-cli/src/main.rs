//! PairLab CLI: correlation report for a pair of tickers.
//!
//! Commands:
//! - `analyze`: fetch both series, align them, print correlation and stats
//! - `tickers`: list the configured ticker catalog
//!
//! Failed analyses exit with 2 (invalid input), 3 (data unavailable) or
//! 4 (insufficient data).

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use pairlab_runner::{
    build_provider, default_range, logging, run_analysis, AnalysisError, AnalysisReport,
    AnalysisRequest, AppConfig, Correlation, ProviderKind,
};

#[derive(Parser)]
#[command(
    name = "pairlab",
    about = "Correlation and summary statistics for two stocks"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to <config dir>/pairlab/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correlate the closing prices of two tickers.
    Analyze {
        /// First ticker (code or catalog label).
        first: String,

        /// Second ticker (code or catalog label).
        second: String,

        /// Start date (YYYY-MM-DD). Defaults to end minus the configured lookback.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Print the full report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Use the synthetic random-walk provider instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Accept tickers outside the catalog for this run.
        #[arg(long, default_value_t = false)]
        allow_custom: bool,
    },
    /// List the ticker catalog.
    Tickers,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    logging::init_stderr(&config.log_level);

    match cli.command {
        Commands::Analyze {
            first,
            second,
            start,
            end,
            json,
            synthetic,
            allow_custom,
        } => {
            let mut config = config;
            if synthetic {
                config.provider.source = ProviderKind::Synthetic;
            }
            config.allow_custom_tickers |= allow_custom;

            match run_analyze_cmd(&config, &first, &second, start, end) {
                Ok(report) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        print_report(&report);
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("Error: {}: {e}", e.kind());
                    std::process::exit(e.kind().exit_code());
                }
            }
        }
        Commands::Tickers => {
            print_catalog(&config);
            Ok(())
        }
    }
}

fn parse_date(flag: &str, value: Option<String>) -> Result<Option<NaiveDate>, AnalysisError> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                AnalysisError::InvalidInput(format!("--{flag} '{s}' is not a YYYY-MM-DD date"))
            })
        })
        .transpose()
}

fn run_analyze_cmd(
    config: &AppConfig,
    first: &str,
    second: &str,
    start: Option<String>,
    end: Option<String>,
) -> Result<AnalysisReport, AnalysisError> {
    let end = parse_date("end", end)?.unwrap_or_else(|| chrono::Local::now().date_naive());
    let start = match parse_date("start", start)? {
        Some(start) => start,
        None => default_range(end, config.default_lookback_days).0,
    };

    let request = AnalysisRequest::new(
        first,
        second,
        start,
        end,
        &config.catalog,
        config.allow_custom_tickers,
    )?;

    tracing::info!(
        first = %request.first,
        second = %request.second,
        start = %request.start,
        end = %request.end,
        source = ?config.provider.source,
        "running analysis"
    );

    let provider = build_provider(&config.provider).map_err(|source| {
        AnalysisError::DataUnavailable {
            ticker: request.first.clone(),
            source,
        }
    })?;

    run_analysis(provider.as_ref(), &request)
}

fn print_report(report: &AnalysisReport) {
    println!();
    println!("=== {} ===", report.title());
    println!("Period:         {} to {}", report.start, report.end);
    println!("Source:         {}", report.source.label());
    println!("Shared days:    {}", report.row_count());
    match &report.correlation {
        Correlation::Defined { value } => println!("Correlation:    {value:.2}"),
        Correlation::Undefined { reason } => println!("Correlation:    undefined ({reason})"),
    }
    println!();
    println!("--- Summary Statistics ---");
    println!(
        "{:<20}{:>14}{:>14}",
        "",
        report.first.as_str(),
        report.second.as_str()
    );
    let rows = [
        ("Mean", report.first_summary.mean, report.second_summary.mean),
        (
            "Standard Deviation",
            report.first_summary.std_dev,
            report.second_summary.std_dev,
        ),
        ("Minimum", report.first_summary.min, report.second_summary.min),
        ("Maximum", report.first_summary.max, report.second_summary.max),
    ];
    for (label, a, b) in rows {
        println!("{label:<20}{a:>14.2}{b:>14.2}");
    }

    let dropped = report.first_only_dropped + report.second_only_dropped;
    if dropped > 0 {
        println!();
        println!(
            "NOTE: {dropped} dates dropped ({} only {}, {} only {})",
            report.first_only_dropped, report.first, report.second_only_dropped, report.second
        );
    }
    println!();
}

fn print_catalog(config: &AppConfig) {
    println!("Tickers:");
    for entry in config.catalog.entries() {
        println!("  {:<8} {}", entry.ticker.as_str(), entry.label);
    }
    println!();
    if config.allow_custom_tickers {
        println!("Custom tickers: allowed");
    } else {
        println!("Custom tickers: disabled (set allow_custom_tickers = true or pass --allow-custom)");
    }
}
