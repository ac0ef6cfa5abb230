//! Read-side payload normalization.
//!
//! The remote API is loosely typed: numbers, dates, and enum strings can all
//! be missing or garbage. Instead of rejecting rows we coerce field by field,
//! so one bad record never poisons a whole refresh. The coercion rules are
//! fixed: missing/non-finite numbers become 0, missing/unparseable dates
//! become today, unknown enum strings fall back to their defaults.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::{Budget, Category, Period, Transaction};

/// Budget row as the server actually sends it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBudget {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub spent: Option<f64>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Transaction row as the server actually sends it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
}

/// Missing or non-finite → 0, clamped at 0 for unsigned currency fields.
fn coerce_unsigned(n: Option<f64>) -> f64 {
    n.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

/// Missing or non-finite → 0; sign is meaningful and preserved.
fn coerce_signed(n: Option<f64>) -> f64 {
    n.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn coerce_date(s: Option<&str>, today: NaiveDate) -> NaiveDate {
    let Some(s) = s else { return today };
    let s = s.trim();
    // Accept plain dates and datetime strings with a date prefix.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(s.get(..10).unwrap_or(""), "%Y-%m-%d"))
        .unwrap_or(today)
}

fn coerce_enum<T>(s: Option<&str>, parse: impl Fn(&str) -> T, default: T) -> T {
    match s {
        Some(s) if !s.trim().is_empty() => parse(s),
        _ => default,
    }
}

pub fn normalize_budget(raw: RawBudget, today: NaiveDate) -> Budget {
    Budget {
        id: raw.id.unwrap_or_default(),
        amount: coerce_unsigned(raw.amount),
        spent: coerce_unsigned(raw.spent),
        period: coerce_enum(raw.period.as_deref(), Period::parse, Period::Monthly),
        category: coerce_enum(raw.category.as_deref(), Category::parse, Category::Other),
        start_date: coerce_date(raw.start_date.as_deref(), today),
        end_date: coerce_date(raw.end_date.as_deref(), today),
    }
}

pub fn normalize_transaction(raw: RawTransaction, today: NaiveDate) -> Transaction {
    Transaction {
        id: raw.id.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        amount: coerce_signed(raw.amount),
        category: coerce_enum(raw.category.as_deref(), Category::parse, Category::Other),
        date: coerce_date(raw.transaction_date.as_deref(), today),
    }
}
