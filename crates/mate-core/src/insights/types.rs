//! Core types for the insights pipeline
//!
//! All of these are derived values: recomputed on every analysis pass and
//! never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Transaction;

/// Income and expense totals for one `YYYY-MM` period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub period: String,
    pub income: f64,
    pub expenses: f64,
}

impl MonthlyAggregate {
    pub fn new(period: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            income: 0.0,
            expenses: 0.0,
        }
    }

    /// Income left over after expenses
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Totals for one category, borrowing the transactions it was built from
#[derive(Debug, Clone, Serialize)]
pub struct CategoryAggregate<'a> {
    pub category: String,
    pub total_amount: f64,
    pub count: usize,
    pub transactions: Vec<&'a Transaction>,
}

/// Expense total for one category, for breakdown charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: String,
    pub amount: f64,
}

/// Change between the last two months, in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthOverMonth {
    pub income_change: i64,
    pub expenses_change: i64,
}

/// Direction of a category's monthly spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observation of a generic amount series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub amount: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// A projected value of an amount series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub label: String,
    pub amount: f64,
    pub predicted: bool,
}

/// A projected month of income and expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeExpenseForecast {
    /// `YYYY-MM` key of the projected month
    pub period: String,
    /// Display label, e.g. "Mar 2025 (Forecast)"
    pub label: String,
    pub income: f64,
    pub expenses: f64,
    pub predicted: bool,
}

/// How aggressively outliers are flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    Low,
    #[default]
    Medium,
    High,
}

impl Sensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Low => "low",
            Sensitivity::Medium => "medium",
            Sensitivity::High => "high",
        }
    }

    /// IQR multiplier used for the outlier fences
    pub fn multiplier(&self) -> f64 {
        match self {
            Sensitivity::Low => 3.0,
            Sensitivity::Medium => 2.0,
            Sensitivity::High => 1.5,
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Sensitivity::Low),
            "medium" => Ok(Sensitivity::Medium),
            "high" => Ok(Sensitivity::High),
            _ => Err(format!("Unknown sensitivity: {}", s)),
        }
    }
}

/// Which fence an anomaly crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    High,
    Low,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::High => "high",
            AnomalyKind::Low => "low",
        }
    }
}

/// An expense that is an outlier within its own category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Distance from the category mean in IQR units
    pub score: f64,
    pub kind: AnomalyKind,
    /// Absolute distance from the category mean
    pub deviation: f64,
}

/// How often a category appears among expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFrequency {
    pub category: String,
    pub count: usize,
    pub frequency: f64,
}

/// A same-day, category-outlier expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpulseTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category_mean: f64,
    /// Standard deviations above the category mean
    pub deviation: f64,
}

/// Display band for a behavior score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else if score >= 40.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::NeedsWork
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::NeedsWork => "Needs Work",
        }
    }
}

/// Spending behavior summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    /// Share of expenses per weekday, Sunday first
    pub day_of_week_distribution: [f64; 7],
    /// Share of expenses in days 1-10, 11-20, 21-31
    pub time_of_month_distribution: [f64; 3],
    /// Categories by number of expenses, most frequent first
    pub frequent_categories: Vec<CategoryFrequency>,
    pub impulse_transactions: Vec<ImpulseTransaction>,
    /// 0..=1, higher = spending spread more evenly over time
    pub consistency_score: f64,
    /// 0..=1, normalized entropy of the category mix
    pub category_diversity: f64,
    /// 0..=1, share of expenses flagged as impulse purchases
    pub impulse_ratio: f64,
    /// 0..=100
    pub behavior_score: f64,
}

impl BehaviorProfile {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.behavior_score)
    }
}

/// What to do with a category's budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionAction {
    Increase,
    Decrease,
    Create,
}

impl SuggestionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionAction::Increase => "increase",
            SuggestionAction::Decrease => "decrease",
            SuggestionAction::Create => "create",
        }
    }
}

impl fmt::Display for SuggestionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A proposed budget adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub category: String,
    pub current_budget: f64,
    pub action: SuggestionAction,
    /// Size of the adjustment (or the new budget for `create`)
    pub amount: f64,
    pub reason: String,
    /// 0..=100
    pub confidence: u8,
    pub trend: Trend,
    /// This budget's share of all allocated budget amounts
    pub allocated_percent: f64,
    /// Resulting budget as a share of total income, when there is income
    pub income_share: Option<f64>,
}

/// Where a budget's spent figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendSource {
    Computed,
    Override,
}

/// How far through its allocation a budget is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    pub percentage: f64,
    pub source: SpendSource,
}

/// Recommendation urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Numeric weight for sorting (higher = more urgent)
    pub fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    /// Bootstrap advice when there isn't enough data
    Basic,
    Saving,
    Behavior,
    Diversity,
    /// Fixed placeholder content, not derived from data
    Demo,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::Basic => "basic",
            RecommendationType::Saving => "saving",
            RecommendationType::Behavior => "behavior",
            RecommendationType::Diversity => "diversity",
            RecommendationType::Demo => "demo",
        }
    }
}

/// A human-readable piece of advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub actionable: bool,
    pub action: String,
    /// 0..=100 when the source states one
    pub confidence: Option<u8>,
}

impl Recommendation {
    pub fn new(
        kind: RecommendationType,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            priority,
            actionable: true,
            action: action.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Mark as informational only
    pub fn informational(mut self) -> Self {
        self.actionable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_parsing_and_multiplier() {
        assert_eq!(Sensitivity::from_str("HIGH").unwrap(), Sensitivity::High);
        assert_eq!(Sensitivity::Low.multiplier(), 3.0);
        assert_eq!(Sensitivity::Medium.multiplier(), 2.0);
        assert_eq!(Sensitivity::High.multiplier(), 1.5);
        assert!(Sensitivity::from_str("extreme").is_err());
    }

    #[test]
    fn test_priority_weight() {
        assert!(Priority::High.weight() > Priority::Medium.weight());
        assert!(Priority::Medium.weight() > Priority::Low.weight());
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(80.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(79.9), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(40.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(12.0), ScoreBand::NeedsWork);
        assert_eq!(ScoreBand::NeedsWork.label(), "Needs Work");
    }

    #[test]
    fn test_recommendation_builder() {
        let rec = Recommendation::new(
            RecommendationType::Saving,
            Priority::Low,
            "Title",
            "Description",
            "Action",
        )
        .with_confidence(85)
        .informational();

        assert_eq!(rec.confidence, Some(85));
        assert!(!rec.actionable);

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "saving");
        assert_eq!(json["priority"], "low");
    }

    #[test]
    fn test_anomaly_serializes_flat() {
        let anomaly = Anomaly {
            transaction: Transaction {
                id: "a1".to_string(),
                date: None,
                description: "Laptop".to_string(),
                amount: 900.0,
                kind: crate::models::TransactionType::Expense,
                category: "Tech".to_string(),
            },
            score: 4.0,
            kind: AnomalyKind::High,
            deviation: 800.0,
        };

        let json = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(json["id"], "a1");
        assert_eq!(json["type"], "expense");
        assert_eq!(json["kind"], "high");
    }
}
