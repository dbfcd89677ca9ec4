//! Entry store: the sole write path for journal entries.
//!
//! # Responsibility
//! - Load the full collection under an explicit `LoadPolicy`.
//! - Apply upsert-by-date to a caller-owned collection.
//! - Persist the full collection through a repository.
//!
//! # Invariants
//! - `upsert` never mutates its input; it returns the next collection.
//! - Invalid entries are rejected before anything is persisted.
//! - Single writer: concurrent `persist` calls against the same storage are
//!   last-writer-wins. Backends only guarantee that each write is atomic.

use crate::model::entry::{upsert_entry, EntryValidationError, JournalEntry};
use crate::repo::{EntryRepository, LoadPolicy, LoadReport, RepoResult};

/// Store facade over an entry repository.
pub struct EntryStore<R: EntryRepository> {
    repo: R,
    policy: LoadPolicy,
}

impl<R: EntryRepository> EntryStore<R> {
    /// Creates a store that fails loads on any bad record.
    pub fn new(repo: R) -> Self {
        Self::with_policy(repo, LoadPolicy::Strict)
    }

    pub fn with_policy(repo: R, policy: LoadPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns all entries sorted by date, plus any records skipped under
    /// `LoadPolicy::SkipInvalid`. No data yet is an empty report.
    pub fn load(&self) -> RepoResult<LoadReport> {
        self.repo.load_entries(self.policy)
    }

    /// Replaces the entry for `entry.date` (or adds it) and returns the full
    /// collection sorted by date.
    pub fn upsert(
        &self,
        entries: &[JournalEntry],
        entry: JournalEntry,
    ) -> Result<Vec<JournalEntry>, EntryValidationError> {
        upsert_entry(entries, entry)
    }

    /// Overwrites durable storage with `entries`.
    pub fn persist(&mut self, entries: &[JournalEntry]) -> RepoResult<()> {
        self.repo.persist_entries(entries)
    }

    /// Upserts then persists. On any error storage is left unchanged.
    pub fn submit(
        &mut self,
        entries: &[JournalEntry],
        entry: JournalEntry,
    ) -> RepoResult<Vec<JournalEntry>> {
        let next = self.upsert(entries, entry)?;
        self.persist(&next)?;
        Ok(next)
    }
}
