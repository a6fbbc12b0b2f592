//! Grouping of raw transactions by month and by category

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::models::{Transaction, TransactionType};

use super::types::{
    CategoryAggregate, CategorySlice, MonthOverMonth, MonthlyAggregate, SeriesPoint, Trend,
};

/// Income and expense totals per `YYYY-MM`, oldest month first.
///
/// Undated transactions count toward the month of `as_of`.
pub fn monthly_totals(transactions: &[Transaction], as_of: NaiveDate) -> Vec<MonthlyAggregate> {
    let mut months: BTreeMap<String, MonthlyAggregate> = BTreeMap::new();

    for tx in transactions {
        let key = tx.month_key(as_of);
        let entry = months
            .entry(key)
            .or_insert_with_key(|k| MonthlyAggregate::new(k.clone()));
        match tx.kind {
            TransactionType::Income => entry.income += tx.amount,
            TransactionType::Expense => entry.expenses += tx.amount,
        }
    }

    months.into_values().collect()
}

/// Totals per category for transactions of one type
pub fn category_totals(
    transactions: &[Transaction],
    kind: TransactionType,
) -> BTreeMap<String, CategoryAggregate<'_>> {
    let mut categories: BTreeMap<String, CategoryAggregate<'_>> = BTreeMap::new();

    for tx in transactions.iter().filter(|t| t.kind == kind) {
        let entry = categories
            .entry(tx.category.clone())
            .or_insert_with(|| CategoryAggregate {
                category: tx.category.clone(),
                total_amount: 0.0,
                count: 0,
                transactions: Vec::new(),
            });
        entry.total_amount += tx.amount;
        entry.count += 1;
        entry.transactions.push(tx);
    }

    categories
}

/// Expense totals per category, largest first
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategorySlice> {
    let mut slices: Vec<CategorySlice> = category_totals(transactions, TransactionType::Expense)
        .into_values()
        .map(|agg| CategorySlice {
            category: agg.category,
            amount: agg.total_amount,
        })
        .collect();

    slices.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    slices
}

/// Spending direction per category over the most recent `months_back` months.
///
/// Consecutive months are compared pairwise and the majority direction wins.
/// Categories whose comparisons tie get no entry, and so does everything when
/// fewer than two months are available; callers treat a missing entry as
/// [`Trend::Stable`].
pub fn category_trend(
    transactions: &[Transaction],
    months_back: usize,
    as_of: NaiveDate,
) -> BTreeMap<String, Trend> {
    let mut by_month: BTreeMap<String, BTreeMap<&str, f64>> = BTreeMap::new();
    for tx in transactions {
        *by_month
            .entry(tx.month_key(as_of))
            .or_default()
            .entry(tx.category.as_str())
            .or_insert(0.0) += tx.amount;
    }

    // Most recent first, then back to chronological order for comparison
    let mut recent: Vec<&BTreeMap<&str, f64>> =
        by_month.values().rev().take(months_back).collect();
    recent.reverse();

    let mut trends = BTreeMap::new();
    if recent.len() < 2 {
        return trends;
    }

    let categories: BTreeSet<&str> = recent
        .iter()
        .flat_map(|month| month.keys().copied())
        .collect();

    for category in categories {
        let amounts: Vec<f64> = recent
            .iter()
            .map(|month| month.get(category).copied().unwrap_or(0.0))
            .collect();

        let mut increasing = 0;
        let mut decreasing = 0;
        for pair in amounts.windows(2) {
            if pair[1] > pair[0] {
                increasing += 1;
            } else if pair[1] < pair[0] {
                decreasing += 1;
            }
        }

        if increasing > decreasing {
            trends.insert(category.to_string(), Trend::Increasing);
        } else if decreasing > increasing {
            trends.insert(category.to_string(), Trend::Decreasing);
        }
    }

    trends
}

/// Percent change from the second-to-last month to the last one
pub fn month_over_month(monthly: &[MonthlyAggregate]) -> Option<MonthOverMonth> {
    let [.., previous, current] = monthly else {
        return None;
    };

    let change = |prev: f64, cur: f64| {
        if prev != 0.0 {
            (((cur - prev) / prev) * 100.0).round() as i64
        } else {
            0
        }
    };

    Some(MonthOverMonth {
        income_change: change(previous.income, current.income),
        expenses_change: change(previous.expenses, current.expenses),
    })
}

/// Net savings per month as a series labelled `Month 1..n`
pub fn savings_series(monthly: &[MonthlyAggregate]) -> Vec<SeriesPoint> {
    monthly
        .iter()
        .enumerate()
        .map(|(i, month)| SeriesPoint::new(format!("Month {}", i + 1), month.net()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{normalize_transactions, RawTransaction};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn tx(date: &str, kind: TransactionType, category: &str, amount: f64) -> Transaction {
        Transaction {
            id: format!("{}-{}-{}", date, category, amount),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            description: String::new(),
            amount,
            kind,
            category: category.to_string(),
        }
    }

    fn expense(date: &str, category: &str, amount: f64) -> Transaction {
        tx(date, TransactionType::Expense, category, amount)
    }

    #[test]
    fn test_monthly_totals_sorted_and_conserving() {
        let txs = vec![
            expense("2024-03-10", "Food", 40.0),
            tx("2024-01-31", TransactionType::Income, "Salary", 1000.0),
            expense("2024-01-02", "Rent", 500.0),
            tx("2024-03-31", TransactionType::Income, "Salary", 1000.0),
            expense("2024-02-14", "Gifts", 60.0),
        ];

        let monthly = monthly_totals(&txs, as_of());
        let periods: Vec<&str> = monthly.iter().map(|m| m.period.as_str()).collect();
        assert_eq!(periods, vec!["2024-01", "2024-02", "2024-03"]);

        let income: f64 = monthly.iter().map(|m| m.income).sum();
        let expenses: f64 = monthly.iter().map(|m| m.expenses).sum();
        assert_eq!(income, 2000.0);
        assert_eq!(expenses, 600.0);
    }

    #[test]
    fn test_monthly_totals_keeps_undated_records() {
        let mut undated = expense("2024-01-01", "Food", 25.0);
        undated.date = None;
        let txs = vec![expense("2024-01-05", "Food", 10.0), undated];

        let monthly = monthly_totals(&txs, as_of());
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[1].period, "2024-06");
        assert_eq!(monthly[1].expenses, 25.0);
    }

    #[test]
    fn test_monthly_totals_groups_date_times_by_their_month() {
        let raw = vec![RawTransaction {
            date: Some("2024-01-15 08:30:00".to_string()),
            amount: Some(serde_json::json!(25)),
            kind: Some("expense".to_string()),
            ..Default::default()
        }];
        let txs = normalize_transactions(raw);
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2024, 1, 15));

        let monthly = monthly_totals(&txs, as_of());
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].period, "2024-01");
        assert_eq!(monthly[0].expenses, 25.0);
    }

    #[test]
    fn test_category_totals_filters_by_type() {
        let txs = vec![
            expense("2024-01-01", "Food", 10.0),
            expense("2024-01-02", "Food", 15.0),
            tx("2024-01-03", TransactionType::Income, "Food", 99.0),
        ];

        let totals = category_totals(&txs, TransactionType::Expense);
        let food = &totals["Food"];
        assert_eq!(food.total_amount, 25.0);
        assert_eq!(food.count, 2);
        assert_eq!(food.transactions.len(), 2);
    }

    #[test]
    fn test_category_breakdown_largest_first() {
        let txs = vec![
            expense("2024-01-01", "Food", 10.0),
            expense("2024-01-02", "Rent", 500.0),
            expense("2024-01-03", "Fun", 40.0),
        ];
        let breakdown = category_breakdown(&txs);
        let order: Vec<&str> = breakdown.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(order, vec!["Rent", "Fun", "Food"]);
    }

    #[test]
    fn test_category_trend_majority_direction() {
        let txs = vec![
            expense("2024-01-05", "Food", 100.0),
            expense("2024-02-05", "Food", 150.0),
            expense("2024-03-05", "Food", 200.0),
            expense("2024-01-05", "Fun", 90.0),
            expense("2024-02-05", "Fun", 60.0),
            expense("2024-03-05", "Fun", 30.0),
            // Up then down: tie, no entry
            expense("2024-01-05", "Rent", 500.0),
            expense("2024-02-05", "Rent", 600.0),
            expense("2024-03-05", "Rent", 500.0),
        ];

        let trends = category_trend(&txs, 3, as_of());
        assert_eq!(trends.get("Food"), Some(&Trend::Increasing));
        assert_eq!(trends.get("Fun"), Some(&Trend::Decreasing));
        assert_eq!(trends.get("Rent"), None);
    }

    #[test]
    fn test_category_trend_uses_only_recent_months() {
        let txs = vec![
            // Old history that would otherwise outvote
            expense("2023-09-05", "Food", 10.0),
            expense("2023-10-05", "Food", 20.0),
            expense("2023-11-05", "Food", 30.0),
            expense("2023-12-05", "Food", 40.0),
            expense("2024-01-05", "Food", 50.0),
            expense("2024-02-05", "Food", 40.0),
        ];

        let trends = category_trend(&txs, 2, as_of());
        assert_eq!(trends.get("Food"), Some(&Trend::Decreasing));
    }

    #[test]
    fn test_category_trend_needs_two_months() {
        let txs = vec![
            expense("2024-01-05", "Food", 100.0),
            expense("2024-01-20", "Food", 150.0),
        ];
        assert!(category_trend(&txs, 3, as_of()).is_empty());
    }

    #[test]
    fn test_month_over_month() {
        let monthly = vec![
            MonthlyAggregate {
                period: "2024-01".into(),
                income: 1000.0,
                expenses: 0.0,
            },
            MonthlyAggregate {
                period: "2024-02".into(),
                income: 1100.0,
                expenses: 300.0,
            },
        ];
        let change = month_over_month(&monthly).unwrap();
        assert_eq!(change.income_change, 10);
        assert_eq!(change.expenses_change, 0);

        assert!(month_over_month(&monthly[..1]).is_none());
    }

    #[test]
    fn test_savings_series_labels() {
        let monthly = vec![
            MonthlyAggregate {
                period: "2024-01".into(),
                income: 1000.0,
                expenses: 800.0,
            },
            MonthlyAggregate {
                period: "2024-02".into(),
                income: 500.0,
                expenses: 700.0,
            },
        ];
        let series = savings_series(&monthly);
        assert_eq!(series[0], SeriesPoint::new("Month 1", 200.0));
        assert_eq!(series[1], SeriesPoint::new("Month 2", -200.0));
    }
}
