//! tally-core: entity types, payload normalization, savings derivation, and
//! the pure filter/sort/aggregation engine

pub mod filter;
pub mod normalize;
pub mod savings;
pub mod summary;
pub mod types;

pub use filter::{SortBy, SortOrder, TransactionFilter, filter_budgets, filter_transactions};
pub use normalize::{RawBudget, RawTransaction, normalize_budget, normalize_transaction};
pub use savings::{derive_candidates, merge_events};
pub use summary::{CategoryBreakdown, Summary, summarize};
pub use types::{
    Budget, Category, Period, SavingsEvent, TEMP_ID_PREFIX, Transaction, ValidationError,
};
