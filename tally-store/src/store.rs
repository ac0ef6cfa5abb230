//! Last-known-good in-memory collection of budgets and transactions.
//!
//! Refreshes replace wholesale, optimistic mutations insert and revert
//! individual speculative entries by temp id. Reverting by id keeps
//! overlapping pending mutations independent of each other.

use tally_core::{Budget, Transaction};

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    budgets: Vec<Budget>,
    transactions: Vec<Transaction>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Replace after a successful remote refresh; last refresh wins.
    pub fn replace_budgets(&mut self, budgets: Vec<Budget>) {
        self.budgets = budgets;
    }

    pub fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
    }

    pub fn apply_optimistic_budget(&mut self, budget: Budget) {
        self.budgets.push(budget);
    }

    pub fn revert_optimistic_budget(&mut self, temp_id: &str) {
        self.budgets.retain(|b| b.id != temp_id);
    }

    pub fn apply_optimistic_transaction(&mut self, txn: Transaction) {
        self.transactions.push(txn);
    }

    pub fn revert_optimistic_transaction(&mut self, temp_id: &str) {
        self.transactions.retain(|t| t.id != temp_id);
    }

    pub fn contains_budget_id(&self, id: &str) -> bool {
        self.budgets.iter().any(|b| b.id == id)
    }

    pub fn contains_transaction_id(&self, id: &str) -> bool {
        self.transactions.iter().any(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{Category, Period};

    fn budget(id: &str) -> Budget {
        Budget {
            id: id.into(),
            amount: 100.0,
            spent: 0.0,
            period: Period::Monthly,
            category: Category::Food,
            start_date: "2024-01-01".parse().unwrap(),
            end_date: "2024-01-31".parse().unwrap(),
        }
    }

    #[test]
    fn revert_removes_only_the_temp_entry() {
        let mut store = EntityStore::new();
        store.replace_budgets(vec![budget("b1"), budget("b2")]);
        store.apply_optimistic_budget(budget("tmp-1"));
        assert_eq!(store.budgets().len(), 3);

        store.revert_optimistic_budget("tmp-1");
        let ids: Vec<&str> = store.budgets().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b2"]);
    }

    #[test]
    fn replace_discards_stale_optimistic_entries() {
        let mut store = EntityStore::new();
        store.apply_optimistic_budget(budget("tmp-1"));
        store.replace_budgets(vec![budget("b1")]);
        let ids: Vec<&str> = store.budgets().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["b1"]);
    }
}
