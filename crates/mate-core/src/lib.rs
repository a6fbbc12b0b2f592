//! Mate Core Library
//!
//! Shared functionality for the Mate personal finance dashboard:
//! - Domain models for transactions and budgets
//! - Lenient import and normalization of CSV/JSON records
//! - Insights configuration with embedded defaults
//! - The insights pipeline: aggregation, forecasting, anomaly detection,
//!   behavior analysis, budget optimization and recommendations

pub mod config;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;

pub use config::InsightsConfig;
pub use error::{Error, Result};
pub use import::{
    load_budgets, load_transactions, normalize_budgets, normalize_transactions, RawBudget,
    RawTransaction,
};
pub use insights::{AnalysisInput, InsightEngine, InsightReport};
pub use models::{
    ActualSpend, BudgetMap, CategoryBudget, Totals, Transaction, TransactionType, UNCATEGORIZED,
};
