//! Insight Engine - runs the analytics pipeline over one dataset

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::InsightsConfig;
use crate::models::{BudgetMap, Totals, Transaction};

use super::aggregate::{category_breakdown, monthly_totals, month_over_month, savings_series};
use super::budget_optimizer::{budget_progress, optimize};
use super::forecast::{smooth_forecast, trend_forecast};
use super::recommend::{recommend, RecommendationInput};
use super::types::{
    Anomaly, BehaviorProfile, BudgetProgress, CategorySlice, ForecastPoint, IncomeExpenseForecast,
    MonthOverMonth, MonthlyAggregate, OptimizationSuggestion, Recommendation, Sensitivity,
};
use super::{anomaly, behavior};

/// Everything one analysis pass needs
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub transactions: Vec<Transaction>,
    pub budgets: BudgetMap,
    /// Reference date standing in for "today"
    pub as_of: NaiveDate,
    /// Overrides the configured anomaly sensitivity
    pub sensitivity: Option<Sensitivity>,
}

impl AnalysisInput {
    pub fn new(transactions: Vec<Transaction>, as_of: NaiveDate) -> Self {
        Self {
            transactions,
            budgets: BudgetMap::new(),
            as_of,
            sensitivity: None,
        }
    }

    pub fn with_budgets(mut self, budgets: BudgetMap) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = Some(sensitivity);
        self
    }
}

/// Totals and monthly breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub totals: Totals,
    pub savings_rate: f64,
    pub monthly: Vec<MonthlyAggregate>,
    pub month_over_month: Option<MonthOverMonth>,
    pub category_breakdown: Vec<CategorySlice>,
}

/// Output of both forecasters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecasts {
    /// Net savings per month, projected by exponential smoothing
    pub savings: Vec<ForecastPoint>,
    /// Income and expenses with fixed drift
    pub income_expenses: Vec<IncomeExpenseForecast>,
}

/// Budget usage and suggested adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    pub progress: Vec<BudgetProgress>,
    pub suggestions: Vec<OptimizationSuggestion>,
}

/// Full result of an analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub as_of: NaiveDate,
    pub totals: Totals,
    pub savings_rate: f64,
    pub monthly: Vec<MonthlyAggregate>,
    pub month_over_month: Option<MonthOverMonth>,
    pub category_breakdown: Vec<CategorySlice>,
    pub savings_forecast: Vec<ForecastPoint>,
    pub income_expense_forecast: Vec<IncomeExpenseForecast>,
    pub anomalies: Vec<Anomaly>,
    pub behavior: Option<BehaviorProfile>,
    pub budget_progress: Vec<BudgetProgress>,
    pub budget_suggestions: Vec<OptimizationSuggestion>,
    pub recommendations: Vec<Recommendation>,
}

/// Runs the insight components with a fixed configuration.
///
/// Holds no state besides its config, so one engine can be shared freely and
/// every call with the same input returns the same output.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    config: InsightsConfig,
}

impl InsightEngine {
    /// Create an engine with the built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InsightsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    pub fn summary(&self, input: &AnalysisInput) -> Summary {
        let totals = Totals::from_transactions(&input.transactions);
        let monthly = monthly_totals(&input.transactions, input.as_of);

        Summary {
            totals,
            savings_rate: totals.savings_rate(),
            month_over_month: month_over_month(&monthly),
            category_breakdown: category_breakdown(&input.transactions),
            monthly,
        }
    }

    pub fn forecasts(&self, input: &AnalysisInput) -> Forecasts {
        let monthly = monthly_totals(&input.transactions, input.as_of);
        let periods = self.config.forecast_periods;

        Forecasts {
            savings: smooth_forecast(
                &savings_series(&monthly),
                self.config.smoothing_alpha,
                periods,
            ),
            income_expenses: trend_forecast(&monthly, periods, input.as_of),
        }
    }

    pub fn anomalies(&self, input: &AnalysisInput) -> Vec<Anomaly> {
        let sensitivity = input.sensitivity.unwrap_or(self.config.sensitivity);
        anomaly::detect(&input.transactions, sensitivity)
    }

    pub fn behavior(&self, input: &AnalysisInput) -> Option<BehaviorProfile> {
        behavior::analyze(&input.transactions)
    }

    pub fn budgets(&self, input: &AnalysisInput) -> BudgetReport {
        let totals = Totals::from_transactions(&input.transactions);

        BudgetReport {
            progress: budget_progress(&input.budgets, &input.transactions),
            suggestions: optimize(
                &input.budgets,
                &input.transactions,
                totals.income,
                self.config.trend_months,
                input.as_of,
            ),
        }
    }

    pub fn recommendations(&self, input: &AnalysisInput) -> Vec<Recommendation> {
        recommend(
            &RecommendationInput::from_transactions(&input.transactions),
            self.config.include_placeholder_recommendations,
        )
    }

    /// Run every component and collect the results
    pub fn analyze(&self, input: &AnalysisInput) -> InsightReport {
        tracing::debug!(
            transactions = input.transactions.len(),
            budgets = input.budgets.len(),
            as_of = %input.as_of,
            "Starting insight analysis"
        );

        let summary = self.summary(input);
        tracing::debug!(months = summary.monthly.len(), "Aggregated transactions");

        let forecasts = self.forecasts(input);
        tracing::debug!(
            savings = forecasts.savings.len(),
            income_expenses = forecasts.income_expenses.len(),
            "Forecasts complete"
        );

        let anomalies = self.anomalies(input);
        tracing::debug!(count = anomalies.len(), "Anomaly detection complete");

        let behavior = self.behavior(input);
        if behavior.is_none() {
            tracing::debug!("Not enough expenses for a behavior profile");
        }

        let budgets = self.budgets(input);
        let recommendations = self.recommendations(input);

        tracing::info!(
            anomalies = anomalies.len(),
            suggestions = budgets.suggestions.len(),
            recommendations = recommendations.len(),
            "Insight analysis complete"
        );

        InsightReport {
            as_of: input.as_of,
            totals: summary.totals,
            savings_rate: summary.savings_rate,
            monthly: summary.monthly,
            month_over_month: summary.month_over_month,
            category_breakdown: summary.category_breakdown,
            savings_forecast: forecasts.savings,
            income_expense_forecast: forecasts.income_expenses,
            anomalies,
            behavior,
            budget_progress: budgets.progress,
            budget_suggestions: budgets.suggestions,
            recommendations,
        }
    }
}
