//! Entity types for budgets, transactions, and derived savings events

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix marking a locally-generated id that the server has not confirmed yet
pub const TEMP_ID_PREFIX: &str = "tmp-";

/// Spending categories shared by budgets and transactions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "food")]
    Food,
    #[serde(rename = "transport")]
    Transport,
    #[serde(rename = "housing")]
    Housing,
    #[serde(rename = "entertainment")]
    Entertainment,
    #[serde(rename = "utilities")]
    Utilities,
    #[serde(rename = "healthcare")]
    Healthcare,
    #[serde(rename = "education")]
    Education,
    #[serde(rename = "savings")]
    Savings,
    #[serde(rename = "other")]
    Other,
}

impl Category {
    /// Canonical enumeration order; ties in aggregations resolve to the
    /// earliest entry here.
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Entertainment,
        Category::Utilities,
        Category::Healthcare,
        Category::Education,
        Category::Savings,
        Category::Other,
    ];

    /// Parse a wire string; anything unrecognized coerces to `Other`.
    pub fn parse(s: &str) -> Category {
        match s.trim().to_lowercase().as_str() {
            "food" => Category::Food,
            "transport" => Category::Transport,
            "housing" => Category::Housing,
            "entertainment" => Category::Entertainment,
            "utilities" => Category::Utilities,
            "healthcare" => Category::Healthcare,
            "education" => Category::Education,
            "savings" => Category::Savings,
            _ => Category::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Housing => "housing",
            Category::Entertainment => "entertainment",
            Category::Utilities => "utilities",
            Category::Healthcare => "healthcare",
            Category::Education => "education",
            Category::Savings => "savings",
            Category::Other => "other",
        }
    }
}

/// Budget period
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Period {
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "yearly")]
    Yearly,
}

impl Period {
    /// Parse a wire string; anything unrecognized coerces to `Monthly`.
    pub fn parse(s: &str) -> Period {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Period::Weekly,
            "yearly" => Period::Yearly,
            _ => Period::Monthly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }

    /// Inclusive range of days a budget of this period may span.
    pub fn day_window(&self) -> (i64, i64) {
        match self {
            Period::Weekly => (6, 8),
            Period::Monthly => (28, 31),
            Period::Yearly => (365, 366),
        }
    }
}

/// A spending budget for one category over one period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub amount: f64,
    pub spent: f64,
    pub period: Period,
    pub category: Category,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Budget {
    /// True while the id is a locally-generated placeholder.
    pub fn is_temp(&self) -> bool {
        self.id.starts_with(TEMP_ID_PREFIX)
    }

    /// A budget is archived once its end date has passed.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }

    pub fn remaining(&self) -> f64 {
        self.amount - self.spent
    }

    /// Reject before any remote call: amounts must be positive and the date
    /// span must match the declared period.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.amount > 0.0) || !self.amount.is_finite() {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        if self.spent < 0.0 || !self.spent.is_finite() {
            return Err(ValidationError::NegativeSpent(self.spent));
        }
        let days = (self.end_date - self.start_date).num_days();
        let (min_days, max_days) = self.period.day_window();
        if days < min_days || days > max_days {
            return Err(ValidationError::DateWindow {
                period: self.period,
                days,
                min_days,
                max_days,
            });
        }
        Ok(())
    }
}

/// A single income or expense entry; negative amounts are expenses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    #[serde(rename = "transactionDate")]
    pub date: NaiveDate,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount == 0.0 || !self.amount.is_finite() {
            return Err(ValidationError::ZeroAmount);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }
}

/// Savings recorded when a budget expired with money left over.
///
/// `id` equals the originating budget's id and is the dedup key: the ledger
/// holds at most one event per budget, and the stored `savings` value is a
/// permanent snapshot taken at first observed expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsEvent {
    pub id: String,
    pub category: Category,
    pub period: Period,
    pub savings: f64,
    pub end_date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
}

/// Rejected before any remote call is issued
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(f64),
    #[error("spent must not be negative, got {0}")]
    NegativeSpent(f64),
    #[error("transaction amount must be non-zero")]
    ZeroAmount,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("{} budget must span {min_days}-{max_days} days, got {days}", period.as_str())]
    DateWindow {
        period: Period,
        days: i64,
        min_days: i64,
        max_days: i64,
    },
}
