//! Trip settlement CLI
//!
//! Reads a trip document and prints spending totals, the transfers that
//! settle every shared expense, and any records that had to be skipped.

use clap::Parser;
use expense_settlement::{Config, SettlementEngine, SettlementReport};
use std::path::PathBuf;
use tracing::info;
use trip_planner::{spending_totals, Trip};

#[derive(Parser, Debug)]
#[command(name = "trip-settle")]
#[command(about = "Settle a trip's shared expenses")]
struct Cli {
    /// Trip document (JSON)
    trip: PathBuf,

    /// Settlement config (TOML); defaults and SETTLEMENT_* variables otherwise
    #[arg(long, env = "SETTLEMENT_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    info!(
        tolerance = %config.netting.tolerance,
        decimal_places = config.netting.decimal_places,
        "Configuration loaded"
    );

    let trip = Trip::load(&cli.trip)?;
    let engine = SettlementEngine::new(&config);
    let report = trip.settle(&engine);

    print_summary(&trip, &report);

    Ok(())
}

fn print_summary(trip: &Trip, report: &SettlementReport) {
    let settings = trip.settings();
    println!(
        "Trip {} .. {} ({} members)",
        settings.start_date,
        settings.end_date,
        trip.members().len()
    );

    println!();
    println!("Spending");
    for (currency, total) in spending_totals(trip.expenses()) {
        println!("  {} {}{}", currency, currency.symbol(), total);
    }

    println!();
    println!("Settlement");
    if report.transfers.is_empty() {
        println!("  All settled");
    }
    for transfer in &report.transfers {
        println!("  {}", transfer);
    }

    if !report.excluded.is_empty() {
        println!();
        println!("Excluded");
        for excluded in &report.excluded {
            println!("  {}: {}", excluded.expense_id, excluded.reason);
        }
    }
}
