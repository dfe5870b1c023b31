//! Pulse CLI - dashboard analytics over a daily price history.
//!
//! Each subcommand mirrors one dashboard page and prints its data as JSON
//! for the presentation layer.

use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pulse_core::analytics::{
    available_months, bottom_n, build_return_matrix, correlation_matrix, market_summary,
    monthly_returns, sector_performance, select_month, top_gainers, top_losers, top_n,
    top_volatility, yearly_summaries,
};
use pulse_core::returns::{cumulative_table, top_cumulative};
use pulse_core::{ApiResponse, Dataset, MonthKey};

#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "Pulse analytics CLI - returns, volatility, correlation and sector rollups")]
#[command(version)]
struct Cli {
    /// Path to the dataset JSON file (defaults to PULSE_DATA_FILE or
    /// ~/.pulse/dataset.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Market summary with top and bottom yearly movers
    Overview {
        /// How many gainers/losers to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
    /// Most volatile tickers by std dev of daily returns
    Volatility {
        /// How many tickers to list
        #[arg(long, default_value = "20")]
        top: usize,
    },
    /// Cumulative return leaders and their plottable series
    Cumulative {
        /// How many tickers to plot
        #[arg(long, default_value = "5")]
        top: usize,
    },
    /// Average final cumulative return per sector
    Sector,
    /// Ticker correlation matrix of daily returns
    Correlation,
    /// Monthly movers; lists available months when no month is given
    Monthly {
        /// Month to inspect (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// How many gainers/losers to list
        #[arg(long, default_value = "5")]
        top: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let path = cli.data.unwrap_or_else(Dataset::default_path);
    let dataset = match Dataset::load(&path) {
        Ok(dataset) => dataset,
        Err(e) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string())).unwrap()
            );
            return;
        }
    };

    let output = match cli.command {
        Commands::Overview { top } => handle_overview(&dataset, top),
        Commands::Volatility { top } => handle_volatility(&dataset, top),
        Commands::Cumulative { top } => handle_cumulative(&dataset, top),
        Commands::Sector => handle_sector(&dataset),
        Commands::Correlation => handle_correlation(&dataset),
        Commands::Monthly { month, top } => handle_monthly(&dataset, month, top),
    };

    println!("{}", output);
}

fn handle_overview(dataset: &Dataset, top: usize) -> String {
    let summaries = yearly_summaries(&dataset.prices);
    serde_json::to_string_pretty(&ApiResponse::ok(json!({
        "market": market_summary(&summaries),
        "top_gainers": top_n(&summaries, top),
        "top_losers": bottom_n(&summaries, top),
    })))
    .unwrap()
}

fn handle_volatility(dataset: &Dataset, top: usize) -> String {
    serde_json::to_string_pretty(&ApiResponse::ok(json!({
        "most_volatile": top_volatility(&dataset.prices, top),
    })))
    .unwrap()
}

fn handle_cumulative(dataset: &Dataset, top: usize) -> String {
    let leaders = top_cumulative(&dataset.prices, top);
    let tickers: Vec<String> = leaders.iter().map(|(t, _)| t.clone()).collect();
    serde_json::to_string_pretty(&ApiResponse::ok(json!({
        "leaders": leaders,
        "table": cumulative_table(&dataset.prices, &tickers),
    })))
    .unwrap()
}

fn handle_sector(dataset: &Dataset) -> String {
    serde_json::to_string_pretty(&ApiResponse::ok(json!({
        "sectors": sector_performance(&dataset.prices, &dataset.stocks),
    })))
    .unwrap()
}

fn handle_correlation(dataset: &Dataset) -> String {
    let matrix = build_return_matrix(&dataset.prices);
    serde_json::to_string_pretty(&ApiResponse::ok(json!({
        "correlation": correlation_matrix(&matrix),
    })))
    .unwrap()
}

fn handle_monthly(dataset: &Dataset, month: Option<String>, top: usize) -> String {
    let rows = monthly_returns(&dataset.prices);

    let Some(month) = month else {
        return serde_json::to_string_pretty(&ApiResponse::ok(json!({
            "months": available_months(&rows)
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>(),
        })))
        .unwrap();
    };

    let key: MonthKey = match month.parse() {
        Ok(key) => key,
        Err(e) => {
            return serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string())).unwrap()
        }
    };

    // An absent month is empty output, not an error.
    let selected = select_month(&rows, key);
    serde_json::to_string_pretty(&ApiResponse::ok(json!({
        "month": key.to_string(),
        "row_count": selected.len(),
        "gainers": top_gainers(&selected, top),
        "losers": top_losers(&selected, top),
    })))
    .unwrap()
}
