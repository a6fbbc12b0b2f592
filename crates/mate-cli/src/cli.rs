//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mate - Understand where your money goes
#[derive(Parser)]
#[command(name = "mate")]
#[command(about = "Personal finance analytics: trends, forecasts, anomalies and budget advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transactions file (CSV or JSON)
    #[arg(short, long, default_value = "transactions.csv", global = true)]
    pub transactions: PathBuf,

    /// Budgets file (CSV or JSON)
    #[arg(short, long, global = true)]
    pub budgets: Option<PathBuf>,

    /// Insights config file (defaults to the user config, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reference date for month keys and forecasts (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    pub as_of: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show totals, monthly income/expenses and the category breakdown
    Summary,

    /// Forecast savings, income and expenses
    Forecast {
        /// Number of months to project (defaults to the config value)
        #[arg(short, long)]
        periods: Option<usize>,
    },

    /// List unusually large or small expenses
    Anomalies {
        /// Detection sensitivity: low, medium, high
        #[arg(short, long)]
        sensitivity: Option<String>,

        /// Maximum number of anomalies to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show the spending behavior profile
    Behavior,

    /// Show budget progress and suggested adjustments
    Budgets,

    /// Show prioritized recommendations
    Recommend,

    /// Run every analysis and print the full report
    Report,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable; none means same-origin only)
        #[arg(long = "allowed-origin")]
        allowed_origins: Vec<String>,
    },
}
