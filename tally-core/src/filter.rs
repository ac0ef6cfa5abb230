//! Pure filter and sort pipeline for transaction and budget views.
//!
//! Every function here maps (slice, criteria) to a fresh Vec; nothing is
//! mutated and identical inputs always produce identical output, content and
//! order included.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::types::{Budget, Category, Period, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Date,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Criteria combine with logical AND; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Case-insensitive substring match on description OR category name
    pub search: Option<String>,
    /// Inclusive bounds
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// Inclusive bounds on the signed amount
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub category: Option<Category>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

fn matches(txn: &Transaction, filter: &TransactionFilter, needle: Option<&str>) -> bool {
    if let Some(needle) = needle {
        let in_description = txn.description.to_lowercase().contains(needle);
        let in_category = txn.category.as_str().contains(needle);
        if !in_description && !in_category {
            return false;
        }
    }
    if let Some(from) = filter.from_date {
        if txn.date < from {
            return false;
        }
    }
    if let Some(to) = filter.to_date {
        if txn.date > to {
            return false;
        }
    }
    if let Some(min) = filter.min_amount {
        if txn.amount < min {
            return false;
        }
    }
    if let Some(max) = filter.max_amount {
        if txn.amount > max {
            return false;
        }
    }
    if let Some(category) = filter.category {
        if txn.category != category {
            return false;
        }
    }
    true
}

/// Filter then stable-sort; ties keep their input order.
pub fn filter_transactions(txns: &[Transaction], filter: &TransactionFilter) -> Vec<Transaction> {
    let needle = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut out: Vec<Transaction> = txns
        .iter()
        .filter(|t| matches(t, filter, needle.as_deref()))
        .cloned()
        .collect();

    out.sort_by(|a, b| {
        let ord = match filter.sort_by {
            SortBy::Date => a.date.cmp(&b.date),
            SortBy::Amount => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
        };
        match filter.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    out
}

/// Inclusion test on period only; `None` means "all".
pub fn filter_budgets(budgets: &[Budget], period: Option<Period>) -> Vec<Budget> {
    budgets
        .iter()
        .filter(|b| period.is_none_or(|p| b.period == p))
        .cloned()
        .collect()
}
