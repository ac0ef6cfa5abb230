//! tally-store: local entity store, optimistic mutation controller,
//! persisted savings ledger, and debounced refresh plumbing

pub mod debounce;
pub mod error;
pub mod ledger;
pub mod mutation;
pub mod session;
pub mod store;

pub use debounce::{DEFAULT_QUIET_PERIOD, DebouncedTicks, Debouncer, debounced};
pub use error::StoreError;
pub use ledger::{LEDGER_FILE, SavingsLedger};
pub use mutation::{MutationKind, MutationReceipt, MutationState, TempIdGen};
pub use session::Session;
pub use store::EntityStore;
