//! Aggregation of budgets, transactions, and the savings ledger into the
//! summary statistics the presentation layer renders.

use std::collections::HashMap;

use crate::types::{Budget, Category, SavingsEvent, Transaction};

/// Per-category rollup
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub category: Category,
    /// Sum of budget amounts declared for this category
    pub total_budget: f64,
    /// Signed sum of transaction amounts; expenses push this negative
    pub total_spent: f64,
    pub remaining_budget: f64,
    pub percent_spent: f64,
    pub avg_spending_per_transaction: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining_budget: f64,
    pub percent_spent: f64,
    /// One entry per category, in `Category::ALL` order
    pub categories: Vec<CategoryBreakdown>,
    /// Sum of all recorded savings events
    pub total_savings: f64,
    pub largest_transaction: Option<Transaction>,
    /// Category with the highest total absolute expense; ties resolve to the
    /// earliest entry in `Category::ALL`
    pub top_spending_category: Option<Category>,
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

/// Pure: reads its inputs and builds a fresh `Summary`.
pub fn summarize(
    budgets: &[Budget],
    transactions: &[Transaction],
    ledger: &[SavingsEvent],
) -> Summary {
    let total_budget: f64 = budgets.iter().map(|b| b.amount).sum();
    let total_spent: f64 = budgets.iter().map(|b| b.spent).sum();

    let mut budget_by_category: HashMap<Category, f64> = HashMap::new();
    for b in budgets {
        *budget_by_category.entry(b.category).or_default() += b.amount;
    }

    let mut spent_by_category: HashMap<Category, (f64, usize)> = HashMap::new();
    let mut expense_by_category: HashMap<Category, f64> = HashMap::new();
    for t in transactions {
        let entry = spent_by_category.entry(t.category).or_default();
        entry.0 += t.amount;
        entry.1 += 1;
        if t.is_expense() {
            *expense_by_category.entry(t.category).or_default() += t.abs_amount();
        }
    }

    let categories = Category::ALL
        .iter()
        .map(|&category| {
            let total_budget = budget_by_category.get(&category).copied().unwrap_or(0.0);
            let (spent, count) = spent_by_category.get(&category).copied().unwrap_or((0.0, 0));
            CategoryBreakdown {
                category,
                total_budget,
                total_spent: spent,
                remaining_budget: total_budget - spent.abs(),
                percent_spent: percent(spent.abs(), total_budget),
                avg_spending_per_transaction: if count > 0 { spent / count as f64 } else { 0.0 },
                transaction_count: count,
            }
        })
        .collect();

    // First entry in ALL order wins ties, so strictly-greater comparison only.
    let mut top_spending_category = None;
    let mut top_spend = 0.0;
    for &category in Category::ALL.iter() {
        let spend = expense_by_category.get(&category).copied().unwrap_or(0.0);
        if spend > top_spend {
            top_spend = spend;
            top_spending_category = Some(category);
        }
    }

    let largest_transaction = transactions
        .iter()
        .max_by(|a, b| {
            a.abs_amount()
                .partial_cmp(&b.abs_amount())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .cloned();

    Summary {
        total_budget,
        total_spent,
        remaining_budget: total_budget - total_spent,
        percent_spent: percent(total_spent, total_budget),
        categories,
        total_savings: ledger.iter().map(|e| e.savings).sum(),
        largest_transaction,
        top_spending_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Period;
    use chrono::{NaiveDate, Utc};

    fn budget(id: &str, category: Category, amount: f64, spent: f64) -> Budget {
        Budget {
            id: id.into(),
            amount,
            spent,
            period: Period::Monthly,
            category,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        }
    }

    fn txn(id: &str, category: Category, amount: f64, date: &str) -> Transaction {
        Transaction {
            id: id.into(),
            description: format!("txn {id}"),
            amount,
            category,
            date: date.parse().unwrap(),
        }
    }

    fn event(id: &str, savings: f64) -> SavingsEvent {
        SavingsEvent {
            id: id.into(),
            category: Category::Food,
            period: Period::Monthly,
            savings,
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn totals_come_from_budgets() {
        let budgets = vec![
            budget("b1", Category::Food, 1000.0, 400.0),
            budget("b2", Category::Transport, 500.0, 100.0),
        ];
        let s = summarize(&budgets, &[], &[]);
        assert_eq!(s.total_budget, 1500.0);
        assert_eq!(s.total_spent, 500.0);
        assert_eq!(s.remaining_budget, 1000.0);
        assert!((s.percent_spent - 33.333).abs() < 0.01);
    }

    #[test]
    fn empty_inputs_produce_zeroes_not_nan() {
        let s = summarize(&[], &[], &[]);
        assert_eq!(s.percent_spent, 0.0);
        assert_eq!(s.total_savings, 0.0);
        assert!(s.largest_transaction.is_none());
        assert!(s.top_spending_category.is_none());
        for c in &s.categories {
            assert_eq!(c.percent_spent, 0.0);
            assert_eq!(c.avg_spending_per_transaction, 0.0);
        }
    }

    #[test]
    fn food_category_spent_sums_signed_amounts() {
        let txns = vec![
            txn("1", Category::Food, -500.0, "2024-01-05"),
            txn("2", Category::Food, -200.0, "2024-02-01"),
        ];
        let s = summarize(&[], &txns, &[]);
        let food = s
            .categories
            .iter()
            .find(|c| c.category == Category::Food)
            .unwrap();
        assert_eq!(food.total_spent, -700.0);
        assert_eq!(food.transaction_count, 2);
        assert_eq!(food.avg_spending_per_transaction, -350.0);
    }

    #[test]
    fn largest_transaction_is_by_absolute_value() {
        let txns = vec![
            txn("1", Category::Food, -500.0, "2024-01-05"),
            txn("2", Category::Other, 900.0, "2024-01-06"),
            txn("3", Category::Housing, -1200.0, "2024-01-07"),
        ];
        let s = summarize(&[], &txns, &[]);
        assert_eq!(s.largest_transaction.unwrap().id, "3");
    }

    #[test]
    fn top_spending_category_ignores_income() {
        let txns = vec![
            txn("1", Category::Food, -300.0, "2024-01-05"),
            txn("2", Category::Transport, -200.0, "2024-01-06"),
            txn("3", Category::Transport, 5000.0, "2024-01-07"),
        ];
        let s = summarize(&[], &txns, &[]);
        assert_eq!(s.top_spending_category, Some(Category::Food));
    }

    #[test]
    fn top_spending_tie_breaks_by_enumeration_order() {
        // Housing precedes Entertainment in Category::ALL
        let txns = vec![
            txn("1", Category::Entertainment, -100.0, "2024-01-05"),
            txn("2", Category::Housing, -100.0, "2024-01-06"),
        ];
        let s = summarize(&[], &txns, &[]);
        assert_eq!(s.top_spending_category, Some(Category::Housing));
    }

    #[test]
    fn total_savings_sums_the_ledger() {
        let ledger = vec![event("b1", 120.0), event("b2", 0.0), event("b3", 80.0)];
        let s = summarize(&[], &[], &ledger);
        assert_eq!(s.total_savings, 200.0);
    }
}
