//! Core domain logic for the daily mood journal.
//! This crate is the single source of truth for journal invariants.

pub mod analysis;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analysis::mood_index::{MoodPoint, TrendSummary};
pub use analysis::reflection::{FeedbackTone, ReflectionFeedback};
pub use analysis::sentiment::{
    Lexicon, LexiconError, SentimentLabel, SentimentOutcome, SentimentScorer,
};
pub use config::{ConfigError, JournalConfig, StorageBackend};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{EntryValidationError, JournalEntry};
pub use repo::{
    CsvEntryRepository, EntryRepository, IntegrityIssue, LoadPolicy, LoadReport, RecordRef,
    RepoError, RepoResult, SqliteEntryRepository,
};
pub use service::entry_store::EntryStore;
pub use service::journal_service::{
    JournalError, JournalService, JournalSession, MoodDashboard, Reflection,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
