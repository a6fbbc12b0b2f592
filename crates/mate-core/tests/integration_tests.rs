//! Integration tests for mate-core
//!
//! These tests exercise the full import → normalize → analyze workflow.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use mate_core::{
    import::{parse_budgets_json, parse_transactions_csv, parse_transactions_json},
    insights::{
        aggregate::monthly_totals, anomaly, behavior, budget_optimizer, forecast, recommend,
        AnalysisInput, AnomalyKind, InsightEngine, Priority, RecommendationInput,
        RecommendationType, Sensitivity, SeriesPoint, SuggestionAction, Trend,
    },
    models::{CategoryBudget, Transaction, TransactionType},
    normalize_transactions, InsightsConfig, RawTransaction, UNCATEGORIZED,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
}

/// Three months of a small household ledger
/// - Salary of 3000 each month
/// - Rent, groceries and transport every month
/// - One very large grocery bill in March
fn household_csv() -> &'static str {
    r#"date,description,amount,type,category
2024-01-01,Salary,"$3,000.00",income,Salary
2024-01-02,Rent,1200,expense,Rent
2024-01-05,Grocer,80,expense,Groceries
2024-01-12,Grocer,85,expense,Groceries
2024-01-19,Grocer,78,expense,Groceries
2024-01-20,Bus pass,45,expense,Transport
2024-02-01,Salary,3000,income,Salary
2024-02-02,Rent,1200,expense,Rent
2024-02-06,Grocer,82,expense,Groceries
2024-02-13,Grocer,79,expense,Groceries
2024-02-20,Grocer,84,expense,Groceries
2024-02-20,Bus pass,45,expense,Transport
2024-03-01,Salary,3000,income,Salary
2024-03-02,Rent,1200,expense,Rent
2024-03-05,Grocer,81,expense,Groceries
2024-03-12,Grocer,83,expense,Groceries
2024-03-12,Party supplies,640,expense,Groceries
2024-03-20,Bus pass,45,expense,Transport
03/25/2024,Coffee,(4.50),debit,
"#
}

fn expense(id: usize, category: &str, amount: f64) -> Transaction {
    Transaction {
        id: format!("tx{}", id),
        date: NaiveDate::from_ymd_opt(2024, 3, 1 + (id % 28) as u32),
        description: String::new(),
        amount,
        kind: TransactionType::Expense,
        category: category.to_string(),
    }
}

// =============================================================================
// Import → pipeline
// =============================================================================

#[test]
fn test_csv_import_to_full_report() {
    let transactions =
        parse_transactions_csv(household_csv().as_bytes()).expect("Failed to parse CSV");
    assert_eq!(transactions.len(), 19);

    // Coerced record: US date, parenthesized amount, debit, no category
    let coffee = transactions.last().unwrap();
    assert_eq!(coffee.amount, 4.5);
    assert_eq!(coffee.kind, TransactionType::Expense);
    assert_eq!(coffee.category, UNCATEGORIZED);
    assert_eq!(coffee.date, NaiveDate::from_ymd_opt(2024, 3, 25));

    let budgets = parse_budgets_json(
        r#"{"Groceries": {"amount": 300}, "Transport": {"amount": 400}, "Rent": {"amount": 1200, "spent": 1200}}"#
            .as_bytes(),
    )
    .expect("Failed to parse budgets");

    let input = AnalysisInput::new(transactions, as_of()).with_budgets(budgets);
    let report = InsightEngine::new().analyze(&input);

    assert_eq!(report.monthly.len(), 3);
    assert_eq!(report.totals.income, 9000.0);

    // The party bill stands out among groceries
    assert_eq!(report.anomalies.len(), 1);
    assert_eq!(report.anomalies[0].transaction.description, "Party supplies");
    assert_eq!(report.anomalies[0].kind, AnomalyKind::High);

    // The party bill pushes groceries over budget; transport uses a third of its budget
    let groceries = report
        .budget_suggestions
        .iter()
        .find(|s| s.category == "Groceries")
        .expect("groceries suggestion");
    assert_eq!(groceries.action, SuggestionAction::Increase);
    let transport = report
        .budget_suggestions
        .iter()
        .find(|s| s.category == "Transport")
        .expect("transport suggestion");
    assert_eq!(transport.action, SuggestionAction::Decrease);
    assert!(report.budget_suggestions.iter().all(|s| s.category != "Rent"));

    assert!(report.behavior.is_some());
    assert_eq!(report.savings_forecast.len(), 3);
    assert_eq!(report.income_expense_forecast[0].label, "Apr 2024 (Forecast)");
}

#[test]
fn test_json_records_with_bad_fields_are_kept() {
    let transactions = parse_transactions_json(
        r#"[
            {"id": 7, "date": "2024-02-10T14:00:00Z", "amount": "12.50", "type": "expense", "category": "Food"},
            {"date": "not a date", "amount": "abc", "type": "transfer"},
            {"amount": -40, "type": "Income", "category": "  "}
        ]"#
        .as_bytes(),
    )
    .expect("Failed to parse JSON");

    assert_eq!(transactions.len(), 3);
    assert_eq!(transactions[0].id, "7");
    assert_eq!(transactions[0].date, NaiveDate::from_ymd_opt(2024, 2, 10));
    assert_eq!(transactions[1].amount, 0.0);
    assert_eq!(transactions[1].date, None);
    assert_eq!(transactions[1].kind, TransactionType::Expense);
    assert_eq!(transactions[2].amount, 40.0);
    assert_eq!(transactions[2].kind, TransactionType::Income);
    assert_eq!(transactions[2].category, UNCATEGORIZED);

    // Undated records land in the as-of month instead of disappearing
    let monthly = monthly_totals(&transactions, as_of());
    let total_expenses: f64 = monthly.iter().map(|m| m.expenses).sum();
    assert_eq!(total_expenses, 12.5);
    assert!(monthly.iter().any(|m| m.period == "2024-03"));
}

#[test]
fn test_generated_ids_are_stable() {
    let raw = vec![RawTransaction {
        date: Some("2024-01-01".into()),
        description: Some("Coffee".into()),
        amount: Some(serde_json::json!(3.5)),
        ..Default::default()
    }];
    let first = normalize_transactions(raw.clone());
    let second = normalize_transactions(raw);
    assert_eq!(first[0].id, second[0].id);
    assert_eq!(first[0].id.len(), 16);
}

// =============================================================================
// Documented scenarios
// =============================================================================

#[test]
fn test_single_food_spike_is_flagged() {
    let mut amounts = vec![10.0; 11];
    amounts.push(100.0);
    let txs: Vec<Transaction> = amounts
        .iter()
        .enumerate()
        .map(|(i, a)| expense(i, "Food", *a))
        .collect();

    let anomalies = anomaly::detect(&txs, Sensitivity::Medium);
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].transaction.amount, 100.0);
    assert_eq!(anomalies[0].kind, AnomalyKind::High);
}

#[test]
fn test_overspent_food_budget() {
    let mut budgets = BTreeMap::new();
    budgets.insert("Food".to_string(), CategoryBudget::new("Food", 100.0));
    let txs = vec![expense(1, "Food", 90.0), expense(2, "Food", 60.0)];

    let suggestions = budget_optimizer::optimize(&budgets, &txs, 0.0, 3, as_of());
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].action, SuggestionAction::Increase);
    assert_eq!(suggestions[0].amount, 55.0);
    assert_eq!(suggestions[0].trend, Trend::Stable);
}

#[test]
fn test_five_percent_savings_rate() {
    let mut txs = vec![Transaction {
        kind: TransactionType::Income,
        ..expense(0, "Salary", 1000.0)
    }];
    txs.extend((1..=5).map(|i| expense(i, "Bills", 190.0)));

    let recs = recommend::recommend(&RecommendationInput::from_transactions(&txs), true);
    let saving = recs
        .iter()
        .find(|r| r.kind == RecommendationType::Saving)
        .expect("saving recommendation");
    assert_eq!(saving.priority, Priority::High);
    assert_eq!(saving.confidence, Some(92));
}

#[test]
fn test_too_few_transactions_for_recommendations() {
    let txs: Vec<Transaction> = (0..4).map(|i| expense(i, "Food", 10.0)).collect();
    let recs = recommend::recommend(&RecommendationInput::from_transactions(&txs), true);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].title, "Add More Data");
    assert_eq!(recs[0].confidence, Some(99));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_minimum_sample_sizes() {
    let nine: Vec<Transaction> = (0..9).map(|i| expense(i, "Food", 10.0)).collect();
    assert!(behavior::analyze(&nine).is_none());

    let series: Vec<SeriesPoint> = vec![SeriesPoint::new("Month 1", 5.0)];
    assert!(forecast::smooth_forecast(&series, 0.3, 3).is_empty());

    // Two-point categories are never evaluated
    let mut txs: Vec<Transaction> = (0..5).map(|i| expense(i, "Food", 10.0)).collect();
    txs.push(expense(10, "Tech", 1.0));
    txs.push(expense(11, "Tech", 5000.0));
    assert!(anomaly::detect(&txs, Sensitivity::High).is_empty());
}

#[test]
fn test_monthly_totals_conserve_amounts() {
    let transactions = parse_transactions_csv(household_csv().as_bytes()).unwrap();
    let monthly = monthly_totals(&transactions, as_of());

    assert!(monthly.windows(2).all(|w| w[0].period <= w[1].period));

    let income: f64 = transactions
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount)
        .sum();
    let expenses: f64 = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount)
        .sum();
    assert!((monthly.iter().map(|m| m.income).sum::<f64>() - income).abs() < 1e-9);
    assert!((monthly.iter().map(|m| m.expenses).sum::<f64>() - expenses).abs() < 1e-9);
}

#[test]
fn test_smoothed_forecast_never_negative() {
    let series: Vec<SeriesPoint> = [-500.0, 200.0, -900.0, -50.0]
        .iter()
        .enumerate()
        .map(|(i, v)| SeriesPoint::new(format!("Month {}", i + 1), *v))
        .collect();
    let forecast = forecast::smooth_forecast(&series, 0.3, 4);
    assert_eq!(forecast.len(), 4);
    assert!(forecast.iter().all(|p| p.amount >= 0.0 && p.predicted));
}

#[test]
fn test_pipeline_is_idempotent() {
    let transactions = parse_transactions_csv(household_csv().as_bytes()).unwrap();
    let engine = InsightEngine::with_config(InsightsConfig::default());
    let input = AnalysisInput::new(transactions, as_of());

    let first = serde_json::to_string(&engine.analyze(&input)).unwrap();
    let second = serde_json::to_string(&engine.analyze(&input)).unwrap();
    assert_eq!(first, second);
}
