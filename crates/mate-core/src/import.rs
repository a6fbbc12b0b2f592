//! Input normalization for transactions and budgets
//!
//! Records arrive from the document store (or an export of it) in a loose
//! shape: amounts may be strings, categories may be missing, dates may be in
//! any of several formats. Everything here coerces instead of rejecting, so a
//! malformed record is never silently dropped from the aggregates.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{
    ActualSpend, BudgetMap, CategoryBudget, Transaction, TransactionType, UNCATEGORIZED,
};

/// A transaction as stored by the persistence layer, before normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// A budget entry as stored by the persistence layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBudget {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub spent: Option<Value>,
}

/// Normalize raw records into transactions, one output per input
pub fn normalize_transactions(raw: Vec<RawTransaction>) -> Vec<Transaction> {
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| normalize_transaction(index, record))
        .collect()
}

fn normalize_transaction(index: usize, raw: RawTransaction) -> Transaction {
    let raw_date = raw.date.unwrap_or_default();
    let date = parse_date(&raw_date);
    if date.is_none() {
        warn!(index, date = %raw_date, "Unparsable transaction date, keeping record undated");
    }

    let signed_amount = match raw.amount.as_ref().and_then(value_to_amount) {
        Some(amount) => amount,
        None => {
            warn!(index, "Missing or unparsable amount, using 0");
            0.0
        }
    };

    let kind = match raw.kind.as_deref() {
        Some(s) => s.parse().unwrap_or_else(|_| {
            debug!(index, kind = s, "Unknown transaction type, treating as expense");
            TransactionType::Expense
        }),
        None => TransactionType::Expense,
    };

    let description = raw.description.unwrap_or_default().trim().to_string();
    let category = normalize_category(raw.category.as_deref());

    let id = raw
        .id
        .as_ref()
        .and_then(value_to_id)
        .unwrap_or_else(|| generate_id(index, &raw_date, &description, signed_amount));

    Transaction {
        id,
        date,
        description,
        amount: signed_amount.abs(),
        kind,
        category,
    }
}

/// Normalize raw budgets keyed by category
pub fn normalize_budgets(raw: BTreeMap<String, RawBudget>) -> BudgetMap {
    raw.into_iter()
        .map(|(key, entry)| {
            let category = entry
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(key.as_str())
                .to_string();
            let budget = normalize_budget(category.clone(), &entry);
            (category, budget)
        })
        .collect()
}

fn normalize_budget(category: String, raw: &RawBudget) -> CategoryBudget {
    let amount = raw
        .amount
        .as_ref()
        .and_then(value_to_amount)
        .unwrap_or_else(|| {
            warn!(category = %category, "Missing or unparsable budget amount, using 0");
            0.0
        })
        .max(0.0);

    let spent = match &raw.spent {
        None | Some(Value::Null) => ActualSpend::Computed,
        Some(value) => ActualSpend::Override(value_to_amount(value).unwrap_or(0.0).abs()),
    };

    CategoryBudget {
        category,
        amount,
        spent,
    }
}

fn normalize_category(category: Option<&str>) -> String {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(UNCATEGORIZED)
        .to_string()
}

/// Parse a transactions file, choosing the format from its extension
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    let transactions = match extension(path).as_str() {
        "csv" => parse_transactions_csv(file)?,
        "json" => parse_transactions_json(file)?,
        other => return Err(Error::UnsupportedFormat(other.to_string())),
    };
    debug!(
        path = %path.display(),
        count = transactions.len(),
        "Loaded transactions"
    );
    Ok(transactions)
}

/// Parse a budgets file, choosing the format from its extension
pub fn load_budgets(path: &Path) -> Result<BudgetMap> {
    let file = File::open(path)?;
    let budgets = match extension(path).as_str() {
        "csv" => parse_budgets_csv(file)?,
        "json" => parse_budgets_json(file)?,
        other => return Err(Error::UnsupportedFormat(other.to_string())),
    };
    debug!(path = %path.display(), count = budgets.len(), "Loaded budgets");
    Ok(budgets)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Parse a JSON array of transaction records
pub fn parse_transactions_json<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let raw: Vec<RawTransaction> = serde_json::from_reader(reader)?;
    Ok(normalize_transactions(raw))
}

/// Parse budgets from JSON.
///
/// Accepts either an object keyed by category (`{"Food": {"amount": 300}}`)
/// or an array of entries that each carry a `category`.
pub fn parse_budgets_json<R: Read>(reader: R) -> Result<BudgetMap> {
    let value: Value = serde_json::from_reader(reader)?;
    let raw: BTreeMap<String, RawBudget> = match value {
        Value::Object(_) => serde_json::from_value(value)?,
        Value::Array(_) => {
            let entries: Vec<RawBudget> = serde_json::from_value(value)?;
            let mut map = BTreeMap::new();
            for entry in entries {
                let category = normalize_category(entry.category.as_deref());
                if map.contains_key(&category) {
                    warn!(category = %category, "Duplicate budget entry, keeping the last one");
                }
                map.insert(category, entry);
            }
            map
        }
        _ => {
            return Err(Error::Import(
                "Budgets must be a JSON object or array".into(),
            ))
        }
    };
    Ok(normalize_budgets(raw))
}

/// Column positions resolved from a CSV header row
struct Columns {
    indices: BTreeMap<&'static str, usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, wanted: &[&'static str]) -> Self {
        let mut indices = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            let header = header.trim().to_lowercase();
            if let Some(name) = wanted.iter().find(|w| **w == header) {
                indices.insert(*name, i);
            }
        }
        Self { indices }
    }

    fn has(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.indices
            .get(name)
            .and_then(|i| record.get(*i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Parse a CSV export of transactions
/// Columns (any order, matched by header): id,date,description,amount,type,category
pub fn parse_transactions_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = Columns::resolve(
        &headers,
        &["id", "date", "description", "amount", "type", "category"],
    );
    if !columns.has("amount") {
        return Err(Error::Import("Missing amount column".into()));
    }

    let mut raw = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let text = |name: &str| columns.get(&record, name).map(str::to_string);
        raw.push(RawTransaction {
            id: text("id").map(Value::String),
            date: text("date"),
            description: text("description"),
            amount: text("amount").map(Value::String),
            kind: text("type"),
            category: text("category"),
        });
    }

    debug!("Parsed {} CSV transactions", raw.len());
    Ok(normalize_transactions(raw))
}

/// Parse a CSV of budgets
/// Columns: category,amount[,spent]
pub fn parse_budgets_csv<R: Read>(reader: R) -> Result<BudgetMap> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = Columns::resolve(&headers, &["category", "amount", "spent"]);
    if !columns.has("category") || !columns.has("amount") {
        return Err(Error::Import(
            "Budget CSV needs category and amount columns".into(),
        ));
    }

    let mut raw = BTreeMap::new();
    for result in rdr.records() {
        let record = result?;
        let category = normalize_category(columns.get(&record, "category"));
        raw.insert(
            category.clone(),
            RawBudget {
                category: Some(category),
                amount: columns
                    .get(&record, "amount")
                    .map(|s| Value::String(s.to_string())),
                spent: columns
                    .get(&record, "spent")
                    .map(|s| Value::String(s.to_string())),
            },
        );
    }

    Ok(normalize_budgets(raw))
}

/// Parse a date in any of the accepted formats.
///
/// Date-times (`T` or space separated) are accepted; only the date part is kept.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let s = s.split(['T', ' ']).next().unwrap_or(s);

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%d/%m/%Y", // 15/01/2024 (European)
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse an amount string, handling currency symbols and separators
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '£', '€', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn value_to_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stable id for records without one
fn generate_id(index: usize, date: &str, description: &str, amount: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_be_bytes());
    hasher.update(date.as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(amount.to_be_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(16);
    id
}
