//! Insights - spending analytics over a transaction set
//!
//! Everything here is a pure function of its inputs: no I/O, no wall clock
//! (callers pass an `as_of` date), no state carried between calls. Too little
//! data never produces an error, only an empty or absent result.
//!
//! ## Components
//!
//! - **Aggregator** ([`aggregate`]) - monthly and per-category totals, trends
//! - **Forecaster** ([`forecast`]) - exponential smoothing and drift projections
//! - **Anomaly Detector** ([`anomaly`]) - per-category IQR outliers
//! - **Behavior Analyzer** ([`behavior`]) - timing, category mix, impulse buys
//! - **Budget Optimizer** ([`budget_optimizer`]) - budget adjustment suggestions
//! - **Recommendation Engine** ([`recommend`]) - prioritized advice
//!
//! [`InsightEngine`] runs all of them over one [`AnalysisInput`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mate_core::insights::{AnalysisInput, InsightEngine};
//!
//! let engine = InsightEngine::with_config(InsightsConfig::load()?);
//! let input = AnalysisInput::new(transactions, today).with_budgets(budgets);
//! let report = engine.analyze(&input);
//! ```

pub mod aggregate;
pub mod anomaly;
pub mod behavior;
pub mod budget_optimizer;
pub mod engine;
pub mod forecast;
pub mod recommend;
pub mod types;

pub use engine::{AnalysisInput, BudgetReport, Forecasts, InsightEngine, InsightReport, Summary};
pub use recommend::RecommendationInput;
pub use types::{
    Anomaly, AnomalyKind, BehaviorProfile, BudgetProgress, CategoryAggregate, CategoryFrequency,
    CategorySlice, ForecastPoint, ImpulseTransaction, IncomeExpenseForecast, MonthOverMonth,
    MonthlyAggregate, OptimizationSuggestion, Priority, Recommendation, RecommendationType,
    ScoreBand, Sensitivity, SeriesPoint, SpendSource, SuggestionAction, Trend,
};
