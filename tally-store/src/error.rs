//! Failures surfaced by the session: remote, validation, or ledger I/O.
//! Every failure leaves the store and ledger at their pre-operation state.

use thiserror::Error;

use tally_core::ValidationError;
use tally_sync::SyncError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("savings ledger: {0}")]
    Ledger(#[source] anyhow::Error),
}
