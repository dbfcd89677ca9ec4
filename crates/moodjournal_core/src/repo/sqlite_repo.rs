//! SQLite entry repository.
//!
//! # Responsibility
//! - Store the journal in the `entries` table created by core migrations.
//! - Replace the whole collection in one transaction on persist.
//!
//! # Invariants
//! - `entry_date` holds ISO `YYYY-MM-DD` text and is the primary key.
//! - Rows that do not decode are reported by `rowid`, never patched up.

use super::{
    assemble_report, decode_record, format_entry_date, validate_for_persist, EntryRepository,
    LoadPolicy, LoadReport, RawRecord, RawScore, RawText, RecordRef, RepoError, RepoResult,
};
use crate::model::entry::JournalEntry;
use log::{error, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, Connection, TransactionBehavior};
use std::time::Instant;

/// SQLite-backed journal repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - Returns `MissingRequiredTable` when the connection did not come from
    ///   `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'entries'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable("entries"));
        }
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn load_entries(&self, policy: LoadPolicy) -> RepoResult<LoadReport> {
        let started_at = Instant::now();
        let mut stmt = self.conn.prepare(
            "SELECT rowid, entry_date, positivity, stress, energy, description
             FROM entries
             ORDER BY entry_date ASC, rowid ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut decoded = Vec::new();
        while let Some(row) = rows.next()? {
            let rowid: i64 = row.get(0)?;
            let date: Value = row.get("entry_date")?;
            let positivity: Value = row.get("positivity")?;
            let stress: Value = row.get("stress")?;
            let energy: Value = row.get("energy")?;
            let description: Value = row.get("description")?;

            decoded.push(decode_record(RawRecord {
                record: RecordRef::Row(rowid),
                date: raw_text(&date, false),
                positivity: raw_score(&positivity),
                stress: raw_score(&stress),
                energy: raw_score(&energy),
                description: raw_text(&description, true),
            }));
        }

        let report = assemble_report(decoded, policy).inspect_err(|err| {
            if let RepoError::Integrity(issues) = err {
                error!(
                    "event=entries_load module=repo backend=sqlite status=error error_code=integrity issues={}",
                    issues.len()
                );
            }
        })?;
        if !report.is_clean() {
            warn!(
                "event=entries_load module=repo backend=sqlite status=degraded skipped={}",
                report.skipped.len()
            );
        }
        info!(
            "event=entries_load module=repo backend=sqlite status=ok count={} duration_ms={}",
            report.entries.len(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    fn persist_entries(&mut self, entries: &[JournalEntry]) -> RepoResult<()> {
        let started_at = Instant::now();
        validate_for_persist(entries)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM entries;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO entries (entry_date, positivity, stress, energy, description)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for entry in entries {
                insert.execute(params![
                    format_entry_date(entry.date),
                    entry.positivity,
                    entry.stress,
                    entry.energy,
                    entry.description.as_str(),
                ])?;
            }
        }
        tx.commit().inspect_err(|err| {
            error!(
                "event=entries_persist module=repo backend=sqlite status=error error_code=commit_failed error={err}"
            );
        })?;

        info!(
            "event=entries_persist module=repo backend=sqlite status=ok count={} duration_ms={}",
            entries.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn raw_score(value: &Value) -> RawScore<'_> {
    match value {
        Value::Integer(number) => RawScore::Integer(*number),
        Value::Text(text) => RawScore::Text(text.as_str()),
        other => RawScore::Other(storage_type(other)),
    }
}

/// `NULL` reads as empty text only where the column allows it.
fn raw_text(value: &Value, null_is_empty: bool) -> RawText<'_> {
    match value {
        Value::Text(text) => Ok(text.as_str()),
        Value::Null if null_is_empty => Ok(""),
        other => Err(format!("expected text, found {}", storage_type(other))),
    }
}

fn storage_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Integer(_) => "INTEGER",
        Value::Real(_) => "REAL",
        Value::Text(_) => "TEXT",
        Value::Blob(_) => "BLOB",
    }
}
