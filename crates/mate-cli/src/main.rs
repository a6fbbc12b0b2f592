//! Mate CLI - Personal finance analytics
//!
//! Usage:
//!   mate summary                       Totals, monthly table, categories
//!   mate forecast --periods 6          Savings and income/expense forecasts
//!   mate anomalies --sensitivity high  Unusual expenses
//!   mate report --json                 Full insight report
//!   mate serve --port 3000             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    // Serve takes its data per request; everything else reads input files
    let load = || -> Result<mate_core::AnalysisInput> {
        let as_of = commands::resolve_as_of(cli.as_of.as_deref())?;
        commands::load_input(&cli.transactions, cli.budgets.as_deref(), as_of)
    };

    match cli.command {
        Commands::Summary => commands::cmd_summary(&config, &load()?, cli.json),
        Commands::Forecast { periods } => {
            commands::cmd_forecast(&config, &load()?, periods, cli.json)
        }
        Commands::Anomalies {
            ref sensitivity,
            limit,
        } => commands::cmd_anomalies(&config, &load()?, sensitivity.as_deref(), limit, cli.json),
        Commands::Behavior => commands::cmd_behavior(&config, &load()?, cli.json),
        Commands::Budgets => commands::cmd_budgets(&config, &load()?, cli.json),
        Commands::Recommend => commands::cmd_recommend(&config, &load()?, cli.json),
        Commands::Report => commands::cmd_report(&config, &load()?, cli.json),
        Commands::Serve {
            port,
            ref host,
            ref allowed_origins,
        } => commands::cmd_serve(config, host, port, allowed_origins.clone()).await,
    }
}
