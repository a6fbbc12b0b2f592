//! Insight command implementations

use anyhow::{anyhow, Result};

use mate_core::insights::{BudgetProgress, OptimizationSuggestion, Sensitivity, SpendSource};
use mate_core::{AnalysisInput, InsightEngine, InsightsConfig};

use super::{percent, print_json, truncate};

const RULE: &str = "   ─────────────────────────────────────────────────────────────";

pub fn cmd_summary(config: &InsightsConfig, input: &AnalysisInput, json: bool) -> Result<()> {
    let engine = InsightEngine::with_config(config.clone());
    let summary = engine.summary(input);

    if json {
        return print_json(&summary);
    }

    println!();
    println!("📊 Spending Summary");
    println!("   As of: {}", input.as_of);
    println!("{}", RULE);
    println!("   Income:       ${:>12.2}", summary.totals.income);
    println!("   Expenses:     ${:>12.2}", summary.totals.expenses);
    println!(
        "   Net:          ${:>12.2}",
        summary.totals.income - summary.totals.expenses
    );
    println!("   Savings rate:  {:>12}", percent(summary.savings_rate));

    if summary.monthly.is_empty() {
        println!();
        println!("   No transactions found.");
        return Ok(());
    }

    println!();
    println!("   📅 By Month");
    println!(
        "   {:<10} {:>12} {:>12} {:>12}",
        "Month", "Income", "Expenses", "Net"
    );
    for month in &summary.monthly {
        println!(
            "   {:<10} {:>12.2} {:>12.2} {:>12.2}",
            month.period,
            month.income,
            month.expenses,
            month.net()
        );
    }

    if let Some(change) = summary.month_over_month {
        println!();
        println!(
            "   Month over month: income {:+}%, expenses {:+}%",
            change.income_change, change.expenses_change
        );
    }

    if !summary.category_breakdown.is_empty() {
        println!();
        println!("   🏷️  By Category");
        let total = summary.totals.expenses;
        for slice in &summary.category_breakdown {
            let share = if total > 0.0 { slice.amount / total } else { 0.0 };
            println!(
                "   {:<24} ${:>10.2}  {:>4}",
                truncate(&slice.category, 24),
                slice.amount,
                percent(share)
            );
        }
    }

    Ok(())
}

pub fn cmd_forecast(
    config: &InsightsConfig,
    input: &AnalysisInput,
    periods: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(periods) = periods {
        config.forecast_periods = periods;
    }
    let engine = InsightEngine::with_config(config);
    let forecasts = engine.forecasts(input);

    if json {
        return print_json(&forecasts);
    }

    println!();
    println!("🔮 Forecast");
    println!("{}", RULE);

    if forecasts.savings.is_empty() && forecasts.income_expenses.is_empty() {
        println!("   Not enough history to forecast (need at least 3 months).");
        return Ok(());
    }

    println!("   💰 Savings");
    for point in &forecasts.savings {
        println!("   {:<24} ${:>10.2}", point.label, point.amount);
    }

    println!();
    println!("   📈 Income and Expenses");
    println!("   {:<24} {:>12} {:>12}", "Month", "Income", "Expenses");
    for point in &forecasts.income_expenses {
        println!(
            "   {:<24} {:>12.2} {:>12.2}",
            point.label, point.income, point.expenses
        );
    }

    Ok(())
}

pub fn cmd_anomalies(
    config: &InsightsConfig,
    input: &AnalysisInput,
    sensitivity: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(s) = sensitivity {
        config.sensitivity = s.parse::<Sensitivity>().map_err(|e| anyhow!(e))?;
    }
    let engine = InsightEngine::with_config(config.clone());
    let anomalies = engine.anomalies(input);

    if json {
        return print_json(&anomalies);
    }

    println!();
    println!("🚨 Anomalies ({} sensitivity)", config.sensitivity);
    println!("{}", RULE);

    if anomalies.is_empty() {
        println!("   No unusual expenses found.");
        return Ok(());
    }

    println!(
        "   {:<10} {:<28} {:<16} {:>10} {:>6} {:>5}",
        "Date", "Description", "Category", "Amount", "Score", "Kind"
    );
    for anomaly in anomalies.iter().take(limit) {
        let tx = &anomaly.transaction;
        let date = tx
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:<10} {:<28} {:<16} {:>10.2} {:>6.1} {:>5}",
            date,
            truncate(&tx.description, 28),
            truncate(&tx.category, 16),
            tx.amount,
            anomaly.score,
            anomaly.kind.as_str()
        );
    }

    if anomalies.len() > limit {
        println!();
        println!("   ... and {} more", anomalies.len() - limit);
    }

    Ok(())
}

pub fn cmd_behavior(config: &InsightsConfig, input: &AnalysisInput, json: bool) -> Result<()> {
    let engine = InsightEngine::with_config(config.clone());
    let profile = engine.behavior(input);

    if json {
        return print_json(&profile);
    }

    println!();
    println!("🧠 Spending Behavior");
    println!("{}", RULE);

    let Some(profile) = profile else {
        println!("   Not enough data (need at least 10 expenses).");
        return Ok(());
    };

    println!(
        "   Score: {:.0}/100 ({})",
        profile.behavior_score,
        profile.band().label()
    );
    println!("   Consistency:  {}", percent(profile.consistency_score));
    println!("   Diversity:    {}", percent(profile.category_diversity));
    println!("   Impulse rate: {}", percent(profile.impulse_ratio));

    println!();
    println!("   📅 By Weekday");
    const DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    for (day, share) in DAYS.iter().zip(profile.day_of_week_distribution) {
        println!("   {:<4} {:>4}", day, percent(share));
    }

    println!();
    println!("   🗓️  By Time of Month");
    const PARTS: [&str; 3] = ["1-10", "11-20", "21-31"];
    for (part, share) in PARTS.iter().zip(profile.time_of_month_distribution) {
        println!("   {:<6} {:>4}", part, percent(share));
    }

    if !profile.frequent_categories.is_empty() {
        println!();
        println!("   🏷️  Most Frequent");
        for freq in profile.frequent_categories.iter().take(5) {
            println!(
                "   {:<24} {:>4} expenses  {:>4}",
                truncate(&freq.category, 24),
                freq.count,
                percent(freq.frequency)
            );
        }
    }

    if !profile.impulse_transactions.is_empty() {
        println!();
        println!("   ⚡ Impulse Purchases");
        for impulse in &profile.impulse_transactions {
            let tx = &impulse.transaction;
            println!(
                "   {:<28} ${:>9.2}  ({:.1}σ above ${:.2} average)",
                truncate(&tx.description, 28),
                tx.amount,
                impulse.deviation,
                impulse.category_mean
            );
        }
    }

    Ok(())
}

pub fn cmd_budgets(config: &InsightsConfig, input: &AnalysisInput, json: bool) -> Result<()> {
    let engine = InsightEngine::with_config(config.clone());
    let report = engine.budgets(input);

    if json {
        return print_json(&report);
    }

    println!();
    println!("💵 Budgets");
    println!("{}", RULE);

    if report.progress.is_empty() {
        println!("   No budgets loaded (use --budgets FILE).");
    } else {
        for progress in &report.progress {
            print_progress(progress);
        }
    }

    if !report.suggestions.is_empty() {
        println!();
        println!("   💡 Suggestions");
        for suggestion in &report.suggestions {
            print_suggestion(suggestion);
        }
    }

    Ok(())
}

fn print_progress(progress: &BudgetProgress) {
    let marker = if progress.percentage > 100.0 {
        "🔴"
    } else if progress.percentage > 80.0 {
        "🟡"
    } else {
        "🟢"
    };
    let source = match progress.source {
        SpendSource::Override => " (manual)",
        SpendSource::Computed => "",
    };
    println!(
        "   {} {:<24} ${:>9.2} / ${:>9.2}  {:>5.0}%{}",
        marker,
        truncate(&progress.category, 24),
        progress.spent,
        progress.budget,
        progress.percentage,
        source
    );
}

fn print_suggestion(suggestion: &OptimizationSuggestion) {
    println!(
        "   {:<8} {:<24} ${:>9.2}  {:>3}%  {}",
        suggestion.action.as_str(),
        truncate(&suggestion.category, 24),
        suggestion.amount,
        suggestion.confidence,
        suggestion.reason
    );
}

pub fn cmd_recommend(config: &InsightsConfig, input: &AnalysisInput, json: bool) -> Result<()> {
    let engine = InsightEngine::with_config(config.clone());
    let recommendations = engine.recommendations(input);

    if json {
        return print_json(&recommendations);
    }

    println!();
    println!("📝 Recommendations");
    println!("{}", RULE);

    for rec in &recommendations {
        let icon = match rec.priority.weight() {
            3 => "❗",
            2 => "👉",
            _ => "ℹ️ ",
        };
        println!("   {} {} [{}]", icon, rec.title, rec.priority);
        println!("      {}", rec.description);
        if rec.actionable {
            println!("      → {}", rec.action);
        }
    }

    Ok(())
}

pub fn cmd_report(config: &InsightsConfig, input: &AnalysisInput, json: bool) -> Result<()> {
    if json {
        let engine = InsightEngine::with_config(config.clone());
        return print_json(&engine.analyze(input));
    }

    cmd_summary(config, input, false)?;
    cmd_forecast(config, input, None, false)?;
    cmd_anomalies(config, input, None, 10, false)?;
    cmd_behavior(config, input, false)?;
    cmd_budgets(config, input, false)?;
    cmd_recommend(config, input, false)
}
