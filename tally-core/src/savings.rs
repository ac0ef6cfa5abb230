//! Derivation and merge of savings events from expired budgets.
//!
//! Both functions are pure; persistence of the merged ledger lives in
//! `tally-store`. Merge is first-seen-wins: once a budget id is in the
//! ledger its stored savings value never changes, even if the budget's
//! `spent` keeps moving afterwards.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{Budget, SavingsEvent};

/// Build candidate events from budgets whose end date has passed.
///
/// Unconfirmed (temp-id) budgets are skipped: their server id is not known
/// yet, and recording the placeholder id would leak a duplicate event once
/// the confirmed row expires under its real id.
pub fn derive_candidates(
    budgets: &[Budget],
    today: NaiveDate,
    recorded_at: DateTime<Utc>,
) -> Vec<SavingsEvent> {
    budgets
        .iter()
        .filter(|b| b.is_expired(today) && !b.is_temp() && !b.id.is_empty())
        .map(|b| SavingsEvent {
            id: b.id.clone(),
            category: b.category,
            period: b.period,
            savings: (b.amount - b.spent).max(0.0),
            end_date: b.end_date,
            recorded_at,
        })
        .collect()
}

/// Append candidates whose id is not already recorded; returns how many were
/// appended. Existing entries are never touched.
pub fn merge_events(ledger: &mut Vec<SavingsEvent>, candidates: Vec<SavingsEvent>) -> usize {
    let mut seen: HashSet<String> = ledger.iter().map(|e| e.id.clone()).collect();
    let mut appended = 0;
    for candidate in candidates {
        if seen.insert(candidate.id.clone()) {
            ledger.push(candidate);
            appended += 1;
        }
    }
    appended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Period};

    fn budget(id: &str, amount: f64, spent: f64, end: &str) -> Budget {
        Budget {
            id: id.into(),
            amount,
            spent,
            period: Period::Monthly,
            category: Category::Food,
            start_date: "2024-01-01".parse().unwrap(),
            end_date: end.parse().unwrap(),
        }
    }

    fn today() -> NaiveDate {
        "2024-02-01".parse().unwrap()
    }

    #[test]
    fn only_expired_budgets_produce_candidates() {
        let budgets = vec![
            budget("past", 100.0, 40.0, "2024-01-31"),
            budget("future", 100.0, 40.0, "2024-02-29"),
        ];
        let events = derive_candidates(&budgets, today(), Utc::now());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "past");
        assert_eq!(events[0].savings, 60.0);
    }

    #[test]
    fn overspent_budget_clamps_to_zero() {
        let budgets = vec![budget("b1", 1000.0, 1200.0, "2024-01-31")];
        let events = derive_candidates(&budgets, today(), Utc::now());
        assert_eq!(events[0].savings, 0.0);
    }

    #[test]
    fn temp_budgets_are_skipped() {
        let budgets = vec![budget("tmp-3", 100.0, 0.0, "2024-01-31")];
        assert!(derive_candidates(&budgets, today(), Utc::now()).is_empty());
    }

    #[test]
    fn merge_discards_already_recorded_ids() {
        let budgets = vec![budget("b1", 100.0, 40.0, "2024-01-31")];
        let mut ledger = Vec::new();

        let first = derive_candidates(&budgets, today(), Utc::now());
        assert_eq!(merge_events(&mut ledger, first), 1);

        // Second refresh sees the same expired budget with different spent.
        let changed = vec![budget("b1", 100.0, 90.0, "2024-01-31")];
        let second = derive_candidates(&changed, today(), Utc::now());
        assert_eq!(merge_events(&mut ledger, second), 0);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].savings, 60.0, "first-seen value must stick");
    }

    #[test]
    fn merge_dedups_within_one_candidate_batch() {
        let mut ledger = Vec::new();
        let batch = derive_candidates(
            &[
                budget("b1", 100.0, 0.0, "2024-01-31"),
                budget("b1", 100.0, 50.0, "2024-01-31"),
            ],
            today(),
            Utc::now(),
        );
        assert_eq!(merge_events(&mut ledger, batch), 1);
        assert_eq!(ledger[0].savings, 100.0);
    }
}
