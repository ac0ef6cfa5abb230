//! Thin request layer over the budget/transaction HTTP API.
//!
//! List endpoints retry a 5xx exactly once after a fixed delay; mutations
//! are never retried (the optimistic layer above owns rollback). Responses
//! are normalized field by field before they reach the store.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use tally_core::{
    Budget, RawBudget, RawTransaction, Transaction, normalize_budget, normalize_transaction,
};

use crate::error::SyncError;

const LIST_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Seam between the mutation controller and the network. `ApiClient` is the
/// production implementation; tests substitute scripted fakes.
#[allow(async_fn_in_trait)]
pub trait RemoteApi {
    async fn list_budgets(&self) -> Result<Vec<Budget>, SyncError>;
    async fn list_transactions(&self) -> Result<Vec<Transaction>, SyncError>;
    async fn add_budget(&self, budget: &Budget) -> Result<(), SyncError>;
    async fn update_budget(&self, budget: &Budget) -> Result<(), SyncError>;
    async fn delete_budget(&self, id: &str) -> Result<(), SyncError>;
    async fn add_transaction(&self, txn: &Transaction) -> Result<(), SyncError>;
    async fn update_transaction(&self, txn: &Transaction) -> Result<(), SyncError>;
    async fn delete_transaction(&self, id: &str) -> Result<(), SyncError>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Checked before any request leaves the process.
    fn bearer(&self) -> Result<&str, SyncError> {
        self.token.as_deref().ok_or(SyncError::Unauthenticated)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, SyncError> {
        let token = self.bearer()?;
        Ok(self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    async fn get_with_retry(&self, path: &str) -> Result<reqwest::Response, SyncError> {
        match check(self.get(path).await?) {
            Ok(resp) => Ok(resp),
            Err(e) if e.is_retryable() => {
                log::debug!("GET /{path} failed ({e}); retrying once in {LIST_RETRY_DELAY:?}");
                tokio::time::sleep(LIST_RETRY_DELAY).await;
                check(self.get(path).await?)
            }
            Err(e) => Err(e),
        }
    }

    async fn get_ok(&self, path: &str) -> Result<(), SyncError> {
        check(self.get(path).await?).map(drop)
    }

    async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<(), SyncError> {
        let token = self.bearer()?;
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        check(resp).map(drop)
    }
}

fn check(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(SyncError::Server {
            status: status.as_u16(),
        })
    }
}

impl RemoteApi for ApiClient {
    async fn list_budgets(&self) -> Result<Vec<Budget>, SyncError> {
        let raw: Vec<RawBudget> = self.get_with_retry("getBudget").await?.json().await?;
        let today = Utc::now().date_naive();
        Ok(raw
            .into_iter()
            .map(|r| normalize_budget(r, today))
            .collect())
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, SyncError> {
        let raw: Vec<RawTransaction> = self.get_with_retry("transaction/all").await?.json().await?;
        let today = Utc::now().date_naive();
        Ok(raw
            .into_iter()
            .map(|r| normalize_transaction(r, today))
            .collect())
    }

    async fn add_budget(&self, budget: &Budget) -> Result<(), SyncError> {
        self.post_json("addBudget", budget).await
    }

    async fn update_budget(&self, budget: &Budget) -> Result<(), SyncError> {
        self.post_json("updateBudget", budget).await
    }

    async fn delete_budget(&self, id: &str) -> Result<(), SyncError> {
        self.get_ok(&format!("Budget/delete/{id}")).await
    }

    async fn add_transaction(&self, txn: &Transaction) -> Result<(), SyncError> {
        self.post_json("transaction/add", txn).await
    }

    async fn update_transaction(&self, txn: &Transaction) -> Result<(), SyncError> {
        self.post_json("transaction/update", txn).await
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), SyncError> {
        self.get_ok(&format!("transaction/delete/{id}")).await
    }
}
