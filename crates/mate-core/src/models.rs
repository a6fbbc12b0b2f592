//! Domain models for Mate

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category assigned to records that arrive without one
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Direction of money movement. Amounts are always non-negative; the sign
/// lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "credit" => Ok(Self::Income),
            "expense" | "debit" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Calendar date; `None` when the source date could not be parsed
    pub date: Option<NaiveDate>,
    pub description: String,
    /// Always >= 0
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// `YYYY-MM` key of the transaction's month.
    ///
    /// Undated records fall into the month of `as_of` so that they still
    /// count toward totals.
    pub fn month_key(&self, as_of: NaiveDate) -> String {
        month_key(self.date.unwrap_or(as_of))
    }
}

/// Format a date as its `YYYY-MM` month key
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Where a budget's actual spend comes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "source", content = "amount", rename_all = "snake_case")]
pub enum ActualSpend {
    /// Derived from the category's expense transactions
    #[default]
    Computed,
    /// Entered manually; takes precedence over transaction totals
    Override(f64),
}

impl ActualSpend {
    /// Resolve the effective spend given the amount computed from transactions
    pub fn resolve(&self, computed: f64) -> f64 {
        match self {
            Self::Computed => computed,
            Self::Override(amount) => *amount,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Self::Override(_))
    }
}

/// Allocation for one spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category: String,
    /// Allocated amount, >= 0
    pub amount: f64,
    #[serde(default)]
    pub spent: ActualSpend,
}

impl CategoryBudget {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
            spent: ActualSpend::Computed,
        }
    }

    /// Set a manual spend override
    pub fn with_spent(mut self, spent: f64) -> Self {
        self.spent = ActualSpend::Override(spent);
        self
    }
}

/// Budgets keyed by category name
pub type BudgetMap = BTreeMap<String, CategoryBudget>;

/// Income and expense sums over a transaction set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
}

impl Totals {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions.iter().fold(Self::default(), |mut acc, tx| {
            match tx.kind {
                TransactionType::Income => acc.income += tx.amount,
                TransactionType::Expense => acc.expenses += tx.amount,
            }
            acc
        })
    }

    /// `(income - expenses) / income`, or 0 without income
    pub fn savings_rate(&self) -> f64 {
        if self.income > 0.0 {
            (self.income - self.expenses) / self.income
        } else {
            0.0
        }
    }
}
