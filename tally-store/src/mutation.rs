//! Per-mutation state machine and temp-id generation.
//!
//! Every remote mutation moves `Idle -> Pending -> {Confirmed | RolledBack}`.
//! The session records a receipt per mutation; the receipt for an optimistic
//! add also carries the temp id that stood in for the entity until the
//! server confirmed it.

use tally_core::TEMP_ID_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Pending,
    Confirmed,
    RolledBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    AddBudget,
    UpdateBudget,
    DeleteBudget,
    AddTransaction,
    UpdateTransaction,
    DeleteTransaction,
}

#[derive(Debug, Clone)]
pub struct MutationReceipt {
    pub kind: MutationKind,
    pub temp_id: Option<String>,
    pub state: MutationState,
}

impl MutationReceipt {
    pub fn new(kind: MutationKind) -> Self {
        Self {
            kind,
            temp_id: None,
            state: MutationState::Idle,
        }
    }

    pub fn begin(&mut self) {
        self.state = MutationState::Pending;
    }

    pub fn confirm(&mut self) {
        self.state = MutationState::Confirmed;
    }

    pub fn roll_back(&mut self) {
        self.state = MutationState::RolledBack;
    }
}

/// Monotonic counter, collision-checked against ids already in the store so
/// concurrent unresolved adds can never collide within a session.
#[derive(Debug, Default)]
pub struct TempIdGen {
    counter: u64,
}

impl TempIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            self.counter += 1;
            let id = format!("{TEMP_ID_PREFIX}{}", self.counter);
            if !taken(&id) {
                return id;
            }
        }
    }
}
