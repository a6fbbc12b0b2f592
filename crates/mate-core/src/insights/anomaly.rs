//! Category-aware outlier detection
//!
//! Each expense is judged against the other expenses in its own category
//! using interquartile-range fences, so a 900 rent payment isn't flagged
//! just because coffee is usually 4.

use std::collections::BTreeMap;

use crate::models::Transaction;

use super::types::{Anomaly, AnomalyKind, Sensitivity};

/// Minimum transactions (and expenses) before anything is evaluated
pub const MIN_TRANSACTIONS: usize = 5;

/// Minimum expenses a category needs to be evaluated
pub const MIN_CATEGORY_POINTS: usize = 3;

/// Flag expenses outside their category's IQR fences, most extreme first.
///
/// Quartiles use sorted-index positioning (`sorted[floor(n * q)]`), no
/// interpolation. A zero IQR is replaced by 1 both for the fences and for
/// the score. Low-side anomalies are only reported when the lower fence is
/// itself positive.
pub fn detect(transactions: &[Transaction], sensitivity: Sensitivity) -> Vec<Anomaly> {
    if transactions.len() < MIN_TRANSACTIONS {
        return vec![];
    }

    let expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();
    if expenses.len() < MIN_TRANSACTIONS {
        return vec![];
    }

    let mut by_category: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for tx in expenses {
        by_category.entry(tx.category.as_str()).or_default().push(tx);
    }

    let mut anomalies = Vec::new();

    for items in by_category.values() {
        if items.len() < MIN_CATEGORY_POINTS {
            continue;
        }

        let mut amounts: Vec<f64> = items.iter().map(|t| t.amount).collect();
        let mean = amounts.iter().sum::<f64>() / amounts.len() as f64;

        amounts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let q1 = amounts[quartile_index(amounts.len(), 0.25)];
        let q3 = amounts[quartile_index(amounts.len(), 0.75)];
        let iqr = q3 - q1;
        let spread = if iqr == 0.0 { 1.0 } else { iqr };

        let threshold = sensitivity.multiplier() * spread;
        let upper = q3 + threshold;
        let lower = q1 - threshold;

        for tx in items {
            let kind = if tx.amount > upper {
                AnomalyKind::High
            } else if tx.amount < lower && lower > 0.0 {
                AnomalyKind::Low
            } else {
                continue;
            };

            let deviation = (tx.amount - mean).abs();
            anomalies.push(Anomaly {
                transaction: (*tx).clone(),
                score: deviation / spread,
                kind,
                deviation,
            });
        }
    }

    anomalies.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    anomalies
}

fn quartile_index(len: usize, q: f64) -> usize {
    ((len as f64 * q).floor() as usize).min(len - 1)
}
