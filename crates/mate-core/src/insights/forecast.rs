//! Short-horizon projections
//!
//! Two independent heuristics:
//! - [`smooth_forecast`]: single exponential smoothing of an amount series.
//!   There is no trend component, so every future period repeats the last
//!   smoothed level.
//! - [`trend_forecast`]: the mean of the last three months with a fixed drift
//!   of +5%/month on income and -3%/month on expenses. The drift is a declared
//!   assumption, not fitted to the data, and can run against the real
//!   direction of the history.

use chrono::{Datelike, Months, NaiveDate};

use crate::models::month_key;

use super::types::{ForecastPoint, IncomeExpenseForecast, MonthlyAggregate, SeriesPoint};

/// Smoothing factor used when none is configured
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Forecast horizon used when none is configured
pub const DEFAULT_PERIODS: usize = 3;

/// Minimum history either forecaster needs
pub const MIN_HISTORY: usize = 3;

/// Monthly income drift applied by [`trend_forecast`]
const INCOME_DRIFT: f64 = 0.05;

/// Monthly expense drift applied by [`trend_forecast`]
const EXPENSE_DRIFT: f64 = 0.03;

/// Project `periods` values of `series` by exponential smoothing.
///
/// Returns nothing for fewer than three points. Each projected amount is the
/// final smoothed level, floored at zero and rounded to a whole unit.
pub fn smooth_forecast(series: &[SeriesPoint], alpha: f64, periods: usize) -> Vec<ForecastPoint> {
    if series.len() < MIN_HISTORY {
        return vec![];
    }

    let level = series
        .iter()
        .skip(1)
        .fold(series[0].amount, |smoothed, point| {
            alpha * point.amount + (1.0 - alpha) * smoothed
        });
    let amount = level.max(0.0).round();

    (1..=periods)
        .map(|i| ForecastPoint {
            label: format!("Month {}", series.len() + i),
            amount,
            predicted: true,
        })
        .collect()
}

/// Project income and expenses for the `periods` months after `as_of`.
///
/// Needs at least three months of history; uses the last three.
pub fn trend_forecast(
    monthly: &[MonthlyAggregate],
    periods: usize,
    as_of: NaiveDate,
) -> Vec<IncomeExpenseForecast> {
    if monthly.len() < MIN_HISTORY {
        return vec![];
    }

    let recent = &monthly[monthly.len() - MIN_HISTORY..];
    let count = recent.len() as f64;
    let avg_income = recent.iter().map(|m| m.income).sum::<f64>() / count;
    let avg_expenses = recent.iter().map(|m| m.expenses).sum::<f64>() / count;

    let month_start = as_of.with_day(1).unwrap_or(as_of);

    (1..=periods)
        .filter_map(|i| {
            let month = month_start.checked_add_months(Months::new(i as u32))?;
            let step = i as f64;
            Some(IncomeExpenseForecast {
                period: month_key(month),
                label: format!("{} (Forecast)", month.format("%b %Y")),
                income: avg_income * (1.0 + INCOME_DRIFT * step),
                expenses: avg_expenses * (1.0 - EXPENSE_DRIFT * step),
                predicted: true,
            })
        })
        .collect()
}
