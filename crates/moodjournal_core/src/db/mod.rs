//! SQLite backend bootstrap for the journal.
//!
//! # Responsibility
//! - Hand out connections whose `entries` table matches this binary's schema.
//! - Tell a journal database apart from some other file at the same path.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - `SqliteEntryRepository` only ever sees connections returned from here
//!   or connections it has checked itself.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or migrate a journal database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File exists but is not SQLite, e.g. a CSV journal opened with the
    /// SQLite backend.
    NotAJournalDatabase,
    /// Database was written by a newer build with more migrations.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "journal database error: {err}"),
            Self::NotAJournalDatabase => write!(
                f,
                "file is not a SQLite journal; use the csv backend or pass another --data path"
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "journal database uses schema {db_version}, this build reads up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::NotAJournalDatabase | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == rusqlite::ErrorCode::NotADatabase =>
            {
                Self::NotAJournalDatabase
            }
            other => Self::Sqlite(other),
        }
    }
}
