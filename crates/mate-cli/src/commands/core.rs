//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve the insights config
//! - `resolve_as_of` - Parse the reference date
//! - `load_input` - Read transactions and budgets into pipeline input
//! - `print_json` - Pretty-print any serializable result

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use mate_core::{load_budgets, load_transactions, AnalysisInput, InsightsConfig};

/// Load the insights config from `path`, the user config, or built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<InsightsConfig> {
    InsightsConfig::resolve(path).context("Failed to load insights config")
}

/// Parse `--as-of`, defaulting to today
pub fn resolve_as_of(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .context("Invalid --as-of date format (use YYYY-MM-DD)"),
        None => Ok(Utc::now().date_naive()),
    }
}

/// Read the transactions file (and budgets file, if any)
pub fn load_input(
    transactions: &Path,
    budgets: Option<&Path>,
    as_of: NaiveDate,
) -> Result<AnalysisInput> {
    let records = load_transactions(transactions).with_context(|| {
        format!("Failed to load transactions from {}", transactions.display())
    })?;

    let mut input = AnalysisInput::new(records, as_of);
    if let Some(path) = budgets {
        let budgets = load_budgets(path)
            .with_context(|| format!("Failed to load budgets from {}", path.display()))?;
        input = input.with_budgets(budgets);
    }

    tracing::debug!(
        transactions = input.transactions.len(),
        budgets = input.budgets.len(),
        %as_of,
        "Loaded input"
    );
    Ok(input)
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
