//! Budget tuning suggestions and progress
//!
//! Compares each budget with what was actually spent in its category and
//! proposes increases for overspent budgets, decreases for budgets that go
//! mostly unused, and new budgets for significant unbudgeted categories.

use chrono::NaiveDate;

use crate::models::{BudgetMap, Transaction, TransactionType};

use super::aggregate::{category_totals, category_trend};
use super::types::{BudgetProgress, OptimizationSuggestion, SpendSource, SuggestionAction, Trend};

/// Share of total spend above which an unbudgeted category gets a budget
const CREATE_THRESHOLD: f64 = 0.05;

/// Confidence of every `create` suggestion
const CREATE_CONFIDENCE: u8 = 75;

/// Suggest budget adjustments, most confident first.
///
/// Only expenses in `transactions` are considered. A budget's spend honours its
/// [`ActualSpend`](crate::models::ActualSpend) override. `total_income` is used
/// to express each proposed budget as a share of income.
pub fn optimize(
    budgets: &BudgetMap,
    transactions: &[Transaction],
    total_income: f64,
    trend_months: usize,
    as_of: NaiveDate,
) -> Vec<OptimizationSuggestion> {
    let expenses: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense())
        .cloned()
        .collect();
    if expenses.is_empty() {
        return vec![];
    }

    let totals = category_totals(&expenses, TransactionType::Expense);
    let total_allocated: f64 = budgets.values().map(|b| b.amount).sum();
    let total_spent: f64 = totals.values().map(|c| c.total_amount).sum();
    let trends = category_trend(&expenses, trend_months, as_of);

    let income_share = |new_budget: f64| {
        if total_income > 0.0 {
            Some(new_budget / total_income)
        } else {
            None
        }
    };

    let mut suggestions = Vec::new();

    for (category, budget) in budgets {
        let computed = totals.get(category).map_or(0.0, |c| c.total_amount);
        let spent = budget.spent.resolve(computed);
        let remaining = budget.amount - spent;
        let denominator = if budget.amount == 0.0 { 1.0 } else { budget.amount };
        let trend = trends.get(category).copied().unwrap_or_default();

        let (action, amount, confidence, reason) = if remaining < 0.0 {
            let overspent = remaining.abs() / denominator;
            let mut confidence = (0.5 + overspent).min(0.9);
            let amount = if trend == Trend::Increasing {
                confidence += 0.1;
                ceil_whole(remaining.abs() * 1.2)
            } else {
                ceil_whole(remaining.abs() * 1.1)
            };
            (
                SuggestionAction::Increase,
                amount,
                confidence,
                format!(
                    "consistently exceeding budget ({:.0}% over)",
                    overspent * 100.0
                ),
            )
        } else if remaining > budget.amount * 0.5 && budget.amount > 0.0 {
            let underspent = remaining / budget.amount;
            let mut confidence = (0.4 + underspent).min(0.8);
            let amount = if trend == Trend::Decreasing {
                confidence += 0.1;
                floor_whole(remaining * 0.7)
            } else {
                floor_whole(remaining * 0.5)
            };
            (
                SuggestionAction::Decrease,
                amount,
                confidence,
                format!(
                    "consistently underspending (only used {:.0}%)",
                    (1.0 - underspent) * 100.0
                ),
            )
        } else {
            continue;
        };

        let new_budget = match action {
            SuggestionAction::Decrease => budget.amount - amount,
            _ => budget.amount + amount,
        };

        suggestions.push(OptimizationSuggestion {
            category: category.clone(),
            current_budget: budget.amount,
            action,
            amount,
            reason,
            confidence: to_percent(confidence),
            trend,
            allocated_percent: if total_allocated > 0.0 {
                budget.amount / total_allocated
            } else {
                0.0
            },
            income_share: income_share(new_budget),
        });
    }

    for (category, aggregate) in &totals {
        if budgets.contains_key(category) || aggregate.total_amount <= 0.0 {
            continue;
        }
        if aggregate.total_amount <= total_spent * CREATE_THRESHOLD {
            continue;
        }

        let amount = ceil_whole(aggregate.total_amount * 1.1);
        suggestions.push(OptimizationSuggestion {
            category: category.clone(),
            current_budget: 0.0,
            action: SuggestionAction::Create,
            amount,
            reason: "unbudgeted category with significant spending".to_string(),
            confidence: CREATE_CONFIDENCE,
            trend: trends.get(category).copied().unwrap_or_default(),
            allocated_percent: 0.0,
            income_share: income_share(amount),
        });
    }

    suggestions.sort_by(|a, b| b.confidence.cmp(&a.confidence));

    tracing::debug!(
        budgets = budgets.len(),
        suggestions = suggestions.len(),
        "Optimized budgets"
    );

    suggestions
}

/// How much of each budget has been used, fullest first
pub fn budget_progress(budgets: &BudgetMap, transactions: &[Transaction]) -> Vec<BudgetProgress> {
    let totals = category_totals(transactions, TransactionType::Expense);

    let mut progress: Vec<BudgetProgress> = budgets
        .iter()
        .map(|(category, budget)| {
            let computed = totals.get(category).map_or(0.0, |c| c.total_amount);
            let spent = budget.spent.resolve(computed);
            let percentage = if budget.amount > 0.0 {
                spent / budget.amount * 100.0
            } else {
                0.0
            };
            BudgetProgress {
                category: category.clone(),
                budget: budget.amount,
                spent,
                percentage,
                source: if budget.spent.is_override() {
                    SpendSource::Override
                } else {
                    SpendSource::Computed
                },
            }
        })
        .collect();

    progress.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    progress
}

/// Distance from a whole number treated as float noise
const WHOLE_EPSILON: f64 = 1e-9;

// Buffers like `x * 1.1` land a hair off whole numbers (50 * 1.1 is
// 55.00000000000001); snap those before rounding.
fn snap_whole(amount: f64) -> f64 {
    let nearest = amount.round();
    if (amount - nearest).abs() < WHOLE_EPSILON {
        nearest
    } else {
        amount
    }
}

fn ceil_whole(amount: f64) -> f64 {
    snap_whole(amount).ceil()
}

fn floor_whole(amount: f64) -> f64 {
    snap_whole(amount).floor()
}

fn to_percent(confidence: f64) -> u8 {
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}
