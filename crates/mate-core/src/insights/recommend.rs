//! Prioritized advice built from savings rate and spending behavior

use crate::models::{Totals, Transaction};

use super::behavior;
use super::types::{Priority, Recommendation, RecommendationType};

/// Minimum transactions before any data-driven advice is given
pub const MIN_TRANSACTIONS: usize = 5;

/// Inputs to [`recommend`]
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput<'a> {
    pub transactions: &'a [Transaction],
    pub totals: Totals,
}

impl<'a> RecommendationInput<'a> {
    /// Use totals recomputed from the transactions themselves
    pub fn from_transactions(transactions: &'a [Transaction]) -> Self {
        Self {
            transactions,
            totals: Totals::from_transactions(transactions),
        }
    }
}

/// Build recommendations, most urgent first.
///
/// With fewer than five transactions only a single "Add More Data" entry is
/// returned. `include_placeholders` controls the two fixed entries of type
/// [`RecommendationType::Demo`], which do not depend on the data at all.
pub fn recommend(input: &RecommendationInput<'_>, include_placeholders: bool) -> Vec<Recommendation> {
    if input.transactions.len() < MIN_TRANSACTIONS {
        return vec![add_more_data()];
    }

    let mut recommendations = vec![savings_recommendation(input.totals.savings_rate())];

    if let Some(profile) = behavior::analyze(input.transactions) {
        if profile.impulse_ratio > 0.1 {
            recommendations.push(
                Recommendation::new(
                    RecommendationType::Behavior,
                    Priority::Medium,
                    "Reduce Impulse Purchases",
                    format!(
                        "{:.0}% of your expenses look like impulse purchases.",
                        profile.impulse_ratio * 100.0
                    ),
                    "Try a 24-hour waiting period before non-essential purchases.",
                )
                .with_confidence(67),
            );
        }

        if profile.consistency_score < 0.4 {
            recommendations.push(Recommendation::new(
                RecommendationType::Behavior,
                Priority::Medium,
                "Improve Spending Consistency",
                "Your spending varies a lot over time, which makes budgeting harder.",
                "Spread spending more evenly through the month to avoid cash flow crunches.",
            ));
        }

        if profile.category_diversity < 0.5 {
            recommendations.push(Recommendation::new(
                RecommendationType::Diversity,
                Priority::Low,
                "Review Spending Allocation",
                "Your spending is concentrated in a small number of categories.",
                "Check that your budget allocation matches your goals and priorities.",
            ));
        }
    }

    if include_placeholders {
        recommendations.extend(placeholders());
    }

    // Stable: equal priorities keep generation order
    recommendations.sort_by(|a, b| b.priority.weight().cmp(&a.priority.weight()));

    tracing::debug!(count = recommendations.len(), "Generated recommendations");

    recommendations
}

fn add_more_data() -> Recommendation {
    Recommendation::new(
        RecommendationType::Basic,
        Priority::High,
        "Add More Data",
        "Add more transaction data to receive personalized recommendations.",
        "Track your expenses for at least one month to unlock insights.",
    )
    .with_confidence(99)
}

fn savings_recommendation(rate: f64) -> Recommendation {
    let percent = rate * 100.0;

    if rate < 0.1 {
        Recommendation::new(
            RecommendationType::Saving,
            Priority::High,
            "Increase Savings Rate",
            format!(
                "Your savings rate is {:.1}%, below the recommended minimum of 10%.",
                percent
            ),
            "Aim to save at least 10% of your income by cutting expenses or raising income.",
        )
        .with_confidence(92)
    } else if rate < 0.2 {
        Recommendation::new(
            RecommendationType::Saving,
            Priority::Medium,
            "Boost Savings Rate",
            format!(
                "Your savings rate is {:.1}%. That's good, but there is room to improve.",
                percent
            ),
            "Work toward saving 20% of your income for stronger financial security.",
        )
        .with_confidence(75)
    } else {
        Recommendation::new(
            RecommendationType::Saving,
            Priority::Low,
            "Maintain Strong Savings",
            format!(
                "Your savings rate of {:.1}% is above the recommended 20%.",
                percent
            ),
            "Consider investing part of your savings for long-term growth.",
        )
        .with_confidence(85)
        .informational()
    }
}

/// Fixed entries that are not derived from the data
fn placeholders() -> [Recommendation; 2] {
    [
        Recommendation::new(
            RecommendationType::Demo,
            Priority::Medium,
            "Consider Reviewing Your Purchases",
            "Your transactions may include spending on things you don't need.",
            "Go through your transactions and flag spending you could cut.",
        )
        .with_confidence(45),
        Recommendation::new(
            RecommendationType::Demo,
            Priority::Low,
            "Review Subscription Services",
            "Recurring subscriptions are easy to forget about.",
            "Audit your subscriptions and cancel the ones you don't use regularly.",
        )
        .with_confidence(88),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::NaiveDate;

    fn tx(i: usize, kind: TransactionType, category: &str, amount: f64) -> Transaction {
        Transaction {
            id: format!("tx{}", i),
            date: NaiveDate::from_ymd_opt(2024, 5, 1 + (i % 28) as u32),
            description: String::new(),
            amount,
            kind,
            category: category.to_string(),
        }
    }

    /// One income record and `n` expenses, scaled so the totals hit the given values
    fn dataset(income: f64, expenses: f64, n: usize) -> Vec<Transaction> {
        let mut txs = vec![tx(0, TransactionType::Income, "Salary", income)];
        for i in 1..=n {
            txs.push(tx(
                i,
                TransactionType::Expense,
                "Food",
                expenses / n as f64,
            ));
        }
        txs
    }

    #[test]
    fn test_too_little_data() {
        let txs = dataset(1000.0, 100.0, 3);
        let recs = recommend(&RecommendationInput::from_transactions(&txs), true);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Add More Data");
        assert_eq!(recs[0].confidence, Some(99));
        assert_eq!(recs[0].kind, RecommendationType::Basic);
    }

    #[test]
    fn test_low_savings_rate_is_high_priority() {
        let txs = dataset(1000.0, 950.0, 4);
        let recs = recommend(&RecommendationInput::from_transactions(&txs), true);

        let saving = recs
            .iter()
            .find(|r| r.kind == RecommendationType::Saving)
            .unwrap();
        assert_eq!(saving.priority, Priority::High);
        assert_eq!(saving.confidence, Some(92));
        assert!(saving.description.contains("5.0%"));
        assert_eq!(recs[0].title, "Increase Savings Rate");
    }

    #[test]
    fn test_savings_bands() {
        let cases = [
            (850.0, "Boost Savings Rate", Priority::Medium, true),
            (700.0, "Maintain Strong Savings", Priority::Low, false),
        ];
        for (expenses, title, priority, actionable) in cases {
            let txs = dataset(1000.0, expenses, 4);
            let recs = recommend(&RecommendationInput::from_transactions(&txs), false);
            let saving = recs
                .iter()
                .find(|r| r.kind == RecommendationType::Saving)
                .unwrap();
            assert_eq!(saving.title, title);
            assert_eq!(saving.priority, priority);
            assert_eq!(saving.actionable, actionable);
        }
    }

    #[test]
    fn test_no_income_counts_as_zero_savings() {
        let txs = dataset(0.0, 500.0, 5);
        let recs = recommend(&RecommendationInput::from_transactions(&txs), false);
        assert_eq!(recs[0].title, "Increase Savings Rate");
        assert!(recs[0].description.contains("0.0%"));
    }

    #[test]
    fn test_placeholders_toggle() {
        let txs = dataset(1000.0, 700.0, 4);
        let with = recommend(&RecommendationInput::from_transactions(&txs), true);
        let without = recommend(&RecommendationInput::from_transactions(&txs), false);

        let demos = with
            .iter()
            .filter(|r| r.kind == RecommendationType::Demo)
            .count();
        assert_eq!(demos, 2);
        assert!(without.iter().all(|r| r.kind != RecommendationType::Demo));
        assert_eq!(with.len(), without.len() + 2);
    }

    #[test]
    fn test_behavior_advice_and_ordering() {
        // Ten same-day Food expenses: one category and one weekday
        let txs = dataset(1000.0, 500.0, 10)
            .into_iter()
            .map(|mut t| {
                t.date = NaiveDate::from_ymd_opt(2024, 5, 3);
                t
            })
            .collect::<Vec<_>>();

        let recs = recommend(&RecommendationInput::from_transactions(&txs), true);
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();

        assert!(titles.contains(&"Improve Spending Consistency"));
        assert!(titles.contains(&"Review Spending Allocation"));
        assert!(!titles.contains(&"Reduce Impulse Purchases"));

        let weights: Vec<u8> = recs.iter().map(|r| r.priority.weight()).collect();
        assert!(weights.windows(2).all(|w| w[0] >= w[1]));

        // Medium ties keep generation order: behavior advice before the placeholder
        let consistency = titles
            .iter()
            .position(|t| *t == "Improve Spending Consistency")
            .unwrap();
        let demo = titles
            .iter()
            .position(|t| *t == "Consider Reviewing Your Purchases")
            .unwrap();
        assert!(consistency < demo);
    }
}
