//! Typed failure taxonomy for remote operations.
//!
//! `Unauthenticated` is raised before any request is issued and tells the
//! caller to redirect to sign-in. `Server` is a non-success HTTP status
//! (read paths retry a 5xx exactly once first). `Network` is a transport
//! failure and is never retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not signed in; set a token with `tally auth set-token`")]
    Unauthenticated,

    #[error("server returned status {status}")]
    Server { status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl SyncError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Server { status } if (500..600).contains(status))
    }
}
