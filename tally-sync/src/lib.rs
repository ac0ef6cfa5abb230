//! tally-sync: bearer-authenticated client for the budget/transaction API,
//! plus local credential persistence

pub mod auth;
pub mod client;
pub mod error;

pub use auth::{AuthState, ensure_tally_home, load_auth, save_auth, set_token, tally_home};
pub use client::{ApiClient, RemoteApi};
pub use error::SyncError;
