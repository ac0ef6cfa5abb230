//! Persisted savings accrual ledger.
//!
//! One JSON array at a fixed path, loaded once at session start and
//! rewritten in full after every merge. Append-only: entries are never
//! mutated or deleted here.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use tally_core::{SavingsEvent, merge_events};

pub const LEDGER_FILE: &str = "savings_ledger.json";

#[derive(Debug)]
pub struct SavingsLedger {
    path: PathBuf,
    events: Vec<SavingsEvent>,
}

impl SavingsLedger {
    /// Load the ledger, treating a missing file as empty.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let events = if path.exists() {
            let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?
        } else {
            Vec::new()
        };
        Ok(Self { path, events })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn events(&self) -> &[SavingsEvent] {
        &self.events
    }

    /// First-seen-wins merge followed by a rewrite of the ledger file.
    /// A failed write rolls the in-memory merge back, so memory never gets
    /// ahead of disk. Returns how many candidates were appended.
    pub fn merge_and_persist(&mut self, candidates: Vec<SavingsEvent>) -> Result<usize> {
        let len_before = self.events.len();
        let appended = merge_events(&mut self.events, candidates);
        if let Err(e) = self.persist() {
            self.events.truncate(len_before);
            return Err(e);
        }
        Ok(appended)
    }

    /// Rewrite the full ledger at its fixed path.
    fn persist(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let s = serde_json::to_string_pretty(&self.events)?;
        fs::write(&self.path, s).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}
