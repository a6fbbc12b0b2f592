//! Insight handlers
//!
//! Every endpoint takes the same [`AnalysisRequest`] body and runs part (or
//! all) of the pipeline over it.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{AppError, AppState, MAX_TRANSACTIONS};
use mate_core::import::{normalize_budgets, normalize_transactions, RawBudget, RawTransaction};
use mate_core::insights::{
    AnalysisInput, Anomaly, BehaviorProfile, BudgetReport, Forecasts, InsightReport,
    Recommendation, Sensitivity, Summary,
};

/// Request body shared by all insight endpoints
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
    /// Budgets keyed by category
    #[serde(default)]
    pub budgets: BTreeMap<String, RawBudget>,
    /// Reference date (YYYY-MM-DD), defaults to today
    #[serde(default, alias = "asOf")]
    pub as_of: Option<String>,
    /// Anomaly sensitivity: low, medium, high
    #[serde(default)]
    pub sensitivity: Option<String>,
}

impl AnalysisRequest {
    /// Validate and normalize into pipeline input
    pub fn into_input(self) -> Result<AnalysisInput, AppError> {
        if self.transactions.len() > MAX_TRANSACTIONS {
            return Err(AppError::bad_request(&format!(
                "Too many transactions (max {})",
                MAX_TRANSACTIONS
            )));
        }

        let as_of = match self.as_of.as_deref() {
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| AppError::bad_request("Invalid as_of date format (use YYYY-MM-DD)"))?,
            None => Utc::now().date_naive(),
        };

        let sensitivity = self
            .sensitivity
            .as_deref()
            .map(str::parse::<Sensitivity>)
            .transpose()
            .map_err(|e| AppError::bad_request(&e))?;

        let mut input = AnalysisInput::new(normalize_transactions(self.transactions), as_of)
            .with_budgets(normalize_budgets(self.budgets));
        input.sensitivity = sensitivity;
        Ok(input)
    }
}

/// POST /api/insights - Run the full pipeline
pub async fn full_report(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalysisRequest>,
) -> Result<Json<InsightReport>, AppError> {
    let input = body.into_input()?;
    Ok(Json(state.engine.analyze(&input)))
}

/// POST /api/insights/summary - Totals, monthly aggregates, category breakdown
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalysisRequest>,
) -> Result<Json<Summary>, AppError> {
    let input = body.into_input()?;
    Ok(Json(state.engine.summary(&input)))
}

/// POST /api/insights/forecast - Savings and income/expense forecasts
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalysisRequest>,
) -> Result<Json<Forecasts>, AppError> {
    let input = body.into_input()?;
    Ok(Json(state.engine.forecasts(&input)))
}

/// POST /api/insights/anomalies - Category outliers, most extreme first
pub async fn anomalies(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalysisRequest>,
) -> Result<Json<Vec<Anomaly>>, AppError> {
    let input = body.into_input()?;
    Ok(Json(state.engine.anomalies(&input)))
}

/// POST /api/insights/behavior - Behavior profile, `null` with too little data
pub async fn behavior(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalysisRequest>,
) -> Result<Json<Option<BehaviorProfile>>, AppError> {
    let input = body.into_input()?;
    Ok(Json(state.engine.behavior(&input)))
}

/// POST /api/insights/budgets - Budget progress and suggested adjustments
pub async fn budgets(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalysisRequest>,
) -> Result<Json<BudgetReport>, AppError> {
    let input = body.into_input()?;
    Ok(Json(state.engine.budgets(&input)))
}

/// POST /api/insights/recommendations - Prioritized recommendations
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalysisRequest>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    let input = body.into_input()?;
    Ok(Json(state.engine.recommendations(&input)))
}
