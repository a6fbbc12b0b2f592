//! Spending behavior analysis
//!
//! Looks at *when* and *on what* money is spent rather than how much:
//! weekday and time-of-month distributions, category mix, and same-day
//! outlier purchases. These feed a single 0-100 behavior score.
//!
//! Expenses without a usable date still count toward the minimum sample size,
//! the category mix and the impulse ratio denominator, but are left out of the
//! calendar distributions and can never be flagged as impulse purchases.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::models::Transaction;

use super::types::{BehaviorProfile, CategoryFrequency, ImpulseTransaction};

/// Minimum expenses needed for a profile
pub const MIN_EXPENSES: usize = 10;

/// Minimum expenses a category needs before its outliers count as impulse buys
const MIN_CATEGORY_POINTS: usize = 3;

/// Standard deviations above the category mean for an impulse purchase
const IMPULSE_STD_DEVS: f64 = 1.5;

/// Purchases at or below this amount are never impulse purchases
const IMPULSE_FLOOR: f64 = 20.0;

/// Keeps typical scores away from the extremes of the 0-100 range
const SCORE_SCALE: f64 = 80.0;

/// Build a behavior profile from the expenses in `transactions`.
///
/// Returns `None` when there are fewer than ten expenses.
pub fn analyze(transactions: &[Transaction]) -> Option<BehaviorProfile> {
    let expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();
    if expenses.len() < MIN_EXPENSES {
        return None;
    }

    let day_of_week_distribution = day_of_week_distribution(&expenses);
    let time_of_month_distribution = time_of_month_distribution(&expenses);
    let frequent_categories = frequent_categories(&expenses);
    let impulse_transactions = impulse_transactions(&expenses);

    let consistency_score =
        consistency_score(&day_of_week_distribution, &time_of_month_distribution);
    let category_diversity = category_diversity(&frequent_categories);
    let impulse_ratio = impulse_transactions.len() as f64 / expenses.len() as f64;

    let raw = consistency_score * 0.3 + category_diversity * 0.3 + (1.0 - impulse_ratio) * 0.4;
    let behavior_score = (raw * SCORE_SCALE).clamp(0.0, 100.0);

    tracing::debug!(
        consistency = consistency_score,
        diversity = category_diversity,
        impulse_ratio,
        behavior_score,
        "Computed behavior profile"
    );

    Some(BehaviorProfile {
        day_of_week_distribution,
        time_of_month_distribution,
        frequent_categories,
        impulse_transactions,
        consistency_score,
        category_diversity,
        impulse_ratio,
        behavior_score,
    })
}

/// Share of dated expenses per weekday, Sunday = 0
fn day_of_week_distribution(expenses: &[&Transaction]) -> [f64; 7] {
    let mut counts = [0usize; 7];
    for date in expenses.iter().filter_map(|t| t.date) {
        counts[date.weekday().num_days_from_sunday() as usize] += 1;
    }
    normalize(counts)
}

/// Share of dated expenses in days 1-10, 11-20 and 21-31
fn time_of_month_distribution(expenses: &[&Transaction]) -> [f64; 3] {
    let mut counts = [0usize; 3];
    for date in expenses.iter().filter_map(|t| t.date) {
        let bucket = match date.day() {
            1..=10 => 0,
            11..=20 => 1,
            _ => 2,
        };
        counts[bucket] += 1;
    }
    normalize(counts)
}

fn normalize<const N: usize>(counts: [usize; N]) -> [f64; N] {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return [0.0; N];
    }
    counts.map(|c| c as f64 / total as f64)
}

/// Categories by expense count, most frequent first; ties keep first-seen order
fn frequent_categories(expenses: &[&Transaction]) -> Vec<CategoryFrequency> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tx in expenses {
        let count = counts.entry(tx.category.as_str()).or_insert_with(|| {
            order.push(tx.category.as_str());
            0
        });
        *count += 1;
    }

    let total = expenses.len() as f64;
    let mut categories: Vec<CategoryFrequency> = order
        .into_iter()
        .map(|category| {
            let count = counts[category];
            CategoryFrequency {
                category: category.to_string(),
                count,
                frequency: count as f64 / total,
            }
        })
        .collect();

    categories.sort_by(|a, b| b.count.cmp(&a.count));
    categories
}

/// Category outliers bought on a day with at least one other purchase
fn impulse_transactions(expenses: &[&Transaction]) -> Vec<ImpulseTransaction> {
    let mut by_category: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for tx in expenses {
        by_category.entry(tx.category.as_str()).or_default().push(tx);
        if let Some(date) = tx.date {
            *per_day.entry(date).or_insert(0) += 1;
        }
    }

    let mut impulses = Vec::new();

    for items in by_category.values() {
        if items.len() < MIN_CATEGORY_POINTS {
            continue;
        }

        let n = items.len() as f64;
        let mean = items.iter().map(|t| t.amount).sum::<f64>() / n;
        let std_dev = (items.iter().map(|t| (t.amount - mean).powi(2)).sum::<f64>() / n).sqrt();
        let cutoff = mean + IMPULSE_STD_DEVS * std_dev;

        for tx in items {
            let shares_day = tx
                .date
                .and_then(|d| per_day.get(&d))
                .is_some_and(|count| *count > 1);

            if shares_day && tx.amount > cutoff && tx.amount > IMPULSE_FLOOR {
                impulses.push(ImpulseTransaction {
                    transaction: (*tx).clone(),
                    category_mean: mean,
                    deviation: (tx.amount - mean) / std_dev,
                });
            }
        }
    }

    impulses.sort_by(|a, b| {
        b.deviation
            .partial_cmp(&a.deviation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    impulses
}

/// Gini coefficient of a distribution: 0 = perfectly even.
///
/// Uses the rank-weighted form over the ascending-sorted values. An all-zero
/// distribution yields 0.
pub fn gini_coefficient(distribution: &[f64]) -> f64 {
    let n = distribution.len();
    let total: f64 = distribution.iter().sum();
    if n == 0 || total == 0.0 {
        return 0.0;
    }

    let mut sorted = distribution.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| v * (i + 1) as f64)
        .sum();

    let n = n as f64;
    (2.0 * weighted) / (n * total) - (n + 1.0) / n
}

/// Mean of `1 - gini` over the weekday and time-of-month distributions
pub fn consistency_score(day_of_week: &[f64], time_of_month: &[f64]) -> f64 {
    (1.0 - gini_coefficient(day_of_week)) * 0.5 + (1.0 - gini_coefficient(time_of_month)) * 0.5
}

/// Shannon entropy of the category mix normalized by `log2(categories)`
pub fn category_diversity(categories: &[CategoryFrequency]) -> f64 {
    if categories.len() <= 1 {
        return 0.0;
    }

    let entropy: f64 = categories
        .iter()
        .filter(|c| c.frequency > 0.0)
        .map(|c| -c.frequency * c.frequency.log2())
        .sum();

    entropy / (categories.len() as f64).log2()
}
