//! Journal schema history.
//!
//! # Responsibility
//! - List every `entries` schema change with the version it introduces.
//! - Bring an older journal database up to date in one transaction.
//!
//! # Invariants
//! - Versions start at 1 and only grow; shipped scripts are never edited.
//! - `PRAGMA user_version` equals the last script applied.
//! - Range checks live in the model, not in SQL `CHECK` constraints, so bad
//!   rows written by other tools surface as integrity issues on load.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_entries.sql"),
}];

/// Schema version a freshly opened journal database ends up at.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Runs the scripts newer than the database's `user_version`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the journal is newer than this build.
/// - `NotAJournalDatabase` when the file is not SQLite at all.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > stored)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    tx.commit()?;
    Ok(())
}
