//! Session: owns the entity store and the savings ledger, drives refreshes
//! through a `RemoteApi`, and runs the optimistic mutation protocol.
//!
//! Adds are speculative: the entity goes into the store under a temp id
//! before the server answers, and a successful add is followed by an
//! immediate full refresh that swaps the temp entry for the server-assigned
//! row. Updates and deletes go straight to the server and only refresh on
//! success, so a failure leaves the store untouched.
//!
//! Mutations take `&self`: the caller may start a second mutation while an
//! earlier one is still pending, and each pending add holds its own temp
//! entry in the store until it reconciles or rolls back. State lives in
//! `RefCell`s for the single-threaded cooperative model; no borrow is ever
//! held across an await point. Rollback removes exactly the failed
//! mutation's temp entry, so overlapping mutations never clobber each
//! other, and the last successful refresh wins over stale optimistic rows.

use std::cell::{Ref, RefCell};
use std::path::PathBuf;

use chrono::Utc;

use tally_core::{Budget, SavingsEvent, Transaction, derive_candidates};
use tally_sync::RemoteApi;

use crate::error::StoreError;
use crate::ledger::SavingsLedger;
use crate::mutation::{MutationKind, MutationReceipt, TempIdGen};
use crate::store::EntityStore;

pub struct Session<R: RemoteApi> {
    api: R,
    store: RefCell<EntityStore>,
    ledger: RefCell<SavingsLedger>,
    ids: RefCell<TempIdGen>,
    mutations: RefCell<Vec<MutationReceipt>>,
}

impl<R: RemoteApi> Session<R> {
    /// Load the persisted ledger once and start with an empty store; the
    /// first refresh fills it.
    pub fn new(api: R, ledger_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let ledger = SavingsLedger::load(ledger_path).map_err(StoreError::Ledger)?;
        Ok(Self {
            api,
            store: RefCell::new(EntityStore::new()),
            ledger: RefCell::new(ledger),
            ids: RefCell::new(TempIdGen::new()),
            mutations: RefCell::new(Vec::new()),
        })
    }

    pub fn store(&self) -> Ref<'_, EntityStore> {
        self.store.borrow()
    }

    pub fn api(&self) -> &R {
        &self.api
    }

    pub fn ledger(&self) -> Ref<'_, [SavingsEvent]> {
        Ref::map(self.ledger.borrow(), |l| l.events())
    }

    /// Receipts of completed mutations, oldest first.
    pub fn mutation_log(&self) -> Ref<'_, [MutationReceipt]> {
        Ref::map(self.mutations.borrow(), |m| m.as_slice())
    }

    pub async fn refresh_budgets(&self) -> Result<(), StoreError> {
        let budgets = self.api.list_budgets().await?;
        self.store.borrow_mut().replace_budgets(budgets);
        self.accrue_savings()
    }

    pub async fn refresh_transactions(&self) -> Result<(), StoreError> {
        let transactions = self.api.list_transactions().await?;
        self.store.borrow_mut().replace_transactions(transactions);
        Ok(())
    }

    pub async fn refresh_all(&self) -> Result<(), StoreError> {
        self.refresh_budgets().await?;
        self.refresh_transactions().await
    }

    /// Runs after every successful budget refresh: derive events from
    /// expired budgets, merge first-seen-wins, rewrite the ledger file.
    /// A failed rewrite rolls the merge back inside the ledger.
    fn accrue_savings(&self) -> Result<(), StoreError> {
        let now = Utc::now();
        let candidates = {
            let store = self.store.borrow();
            derive_candidates(store.budgets(), now.date_naive(), now)
        };
        let appended = self
            .ledger
            .borrow_mut()
            .merge_and_persist(candidates)
            .map_err(StoreError::Ledger)?;
        if appended > 0 {
            log::debug!("recorded {appended} new savings event(s)");
        }
        Ok(())
    }

    fn record(&self, receipt: &MutationReceipt) {
        self.mutations.borrow_mut().push(receipt.clone());
    }

    pub async fn add_budget(&self, mut budget: Budget) -> Result<MutationReceipt, StoreError> {
        budget.validate()?;
        let mut receipt = MutationReceipt::new(MutationKind::AddBudget);

        let temp_id = {
            let store = self.store.borrow();
            self.ids
                .borrow_mut()
                .next_id(|id| store.contains_budget_id(id))
        };
        budget.id = temp_id.clone();
        receipt.temp_id = Some(temp_id.clone());

        self.store.borrow_mut().apply_optimistic_budget(budget.clone());
        receipt.begin();

        match self.api.add_budget(&budget).await {
            Ok(()) => {
                receipt.confirm();
                self.record(&receipt);
                if let Err(e) = self.refresh_budgets().await {
                    // The add landed on the server; drop the temp entry so
                    // the next successful refresh cannot duplicate it.
                    self.store.borrow_mut().revert_optimistic_budget(&temp_id);
                    return Err(e);
                }
                Ok(receipt)
            }
            Err(e) => {
                // Remove only our own speculative entry; refreshes or other
                // pending adds that touched the store meanwhile stay intact.
                self.store.borrow_mut().revert_optimistic_budget(&temp_id);
                receipt.roll_back();
                log::debug!("budget add {temp_id} rolled back: {e}");
                self.record(&receipt);
                Err(e.into())
            }
        }
    }

    pub async fn update_budget(&self, budget: Budget) -> Result<MutationReceipt, StoreError> {
        budget.validate()?;
        let mut receipt = MutationReceipt::new(MutationKind::UpdateBudget);
        receipt.begin();
        match self.api.update_budget(&budget).await {
            Ok(()) => {
                receipt.confirm();
                self.record(&receipt);
                self.refresh_budgets().await?;
                Ok(receipt)
            }
            Err(e) => {
                receipt.roll_back();
                self.record(&receipt);
                Err(e.into())
            }
        }
    }

    pub async fn delete_budget(&self, id: &str) -> Result<MutationReceipt, StoreError> {
        let mut receipt = MutationReceipt::new(MutationKind::DeleteBudget);
        receipt.begin();
        match self.api.delete_budget(id).await {
            Ok(()) => {
                receipt.confirm();
                self.record(&receipt);
                self.refresh_budgets().await?;
                Ok(receipt)
            }
            Err(e) => {
                receipt.roll_back();
                self.record(&receipt);
                Err(e.into())
            }
        }
    }

    pub async fn add_transaction(&self, mut txn: Transaction) -> Result<MutationReceipt, StoreError> {
        txn.validate()?;
        let mut receipt = MutationReceipt::new(MutationKind::AddTransaction);

        let temp_id = {
            let store = self.store.borrow();
            self.ids
                .borrow_mut()
                .next_id(|id| store.contains_transaction_id(id))
        };
        txn.id = temp_id.clone();
        receipt.temp_id = Some(temp_id.clone());

        self.store
            .borrow_mut()
            .apply_optimistic_transaction(txn.clone());
        receipt.begin();

        match self.api.add_transaction(&txn).await {
            Ok(()) => {
                receipt.confirm();
                self.record(&receipt);
                if let Err(e) = self.refresh_transactions().await {
                    self.store
                        .borrow_mut()
                        .revert_optimistic_transaction(&temp_id);
                    return Err(e);
                }
                Ok(receipt)
            }
            Err(e) => {
                self.store
                    .borrow_mut()
                    .revert_optimistic_transaction(&temp_id);
                receipt.roll_back();
                log::debug!("transaction add {temp_id} rolled back: {e}");
                self.record(&receipt);
                Err(e.into())
            }
        }
    }

    pub async fn update_transaction(&self, txn: Transaction) -> Result<MutationReceipt, StoreError> {
        txn.validate()?;
        let mut receipt = MutationReceipt::new(MutationKind::UpdateTransaction);
        receipt.begin();
        match self.api.update_transaction(&txn).await {
            Ok(()) => {
                receipt.confirm();
                self.record(&receipt);
                self.refresh_transactions().await?;
                Ok(receipt)
            }
            Err(e) => {
                receipt.roll_back();
                self.record(&receipt);
                Err(e.into())
            }
        }
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<MutationReceipt, StoreError> {
        let mut receipt = MutationReceipt::new(MutationKind::DeleteTransaction);
        receipt.begin();
        match self.api.delete_transaction(id).await {
            Ok(()) => {
                receipt.confirm();
                self.record(&receipt);
                self.refresh_transactions().await?;
                Ok(receipt)
            }
            Err(e) => {
                receipt.roll_back();
                self.record(&receipt);
                Err(e.into())
            }
        }
    }
}
