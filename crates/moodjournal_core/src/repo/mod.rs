//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the "load all / persist all" contract the entry store relies on.
//! - Isolate file format and SQL details from service orchestration.
//! - Share record decoding and load-policy handling between backends.
//!
//! # Invariants
//! - Write paths validate every entry and reject duplicate dates before
//!   touching storage.
//! - Read paths never coerce bad data: each rejected record is reported with
//!   its location, field and reason.
//! - Loaded collections are sorted by date ascending.

use crate::db::DbError;
use crate::model::entry::{
    check_range, EntryValidationError, JournalEntry, ENERGY_RANGE, POSITIVITY_RANGE, STRESS_RANGE,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry as MapEntry;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod csv_repo;
pub mod sqlite_repo;

pub use csv_repo::CsvEntryRepository;
pub use sqlite_repo::SqliteEntryRepository;

/// Canonical on-disk date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
const LEGACY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub type RepoResult<T> = Result<T, RepoError>;

/// Where a rejected record lives in its backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    /// 1-based line number in a text file.
    Line(u64),
    /// SQLite `rowid`.
    Row(i64),
}

impl Display for RecordRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Line(line) => write!(f, "line {line}"),
            Self::Row(row) => write!(f, "row {row}"),
        }
    }
}

/// One persisted record that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityIssue {
    pub record: RecordRef,
    pub field: &'static str,
    pub reason: String,
}

impl Display for IntegrityIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} field `{}`: {}", self.record, self.field, self.reason)
    }
}

/// Repository error for entry persistence and load operations.
#[derive(Debug)]
pub enum RepoError {
    /// Entry handed to a write path violates model invariants.
    Validation(EntryValidationError),
    /// Write path received two entries for one date.
    DuplicateDate(NaiveDate),
    /// Persisted data failed to decode under `LoadPolicy::Strict`.
    Integrity(Vec<IntegrityIssue>),
    /// CSV header does not match the expected column set.
    UnexpectedHeader(Vec<String>),
    /// SQLite connection was not migrated.
    MissingRequiredTable(&'static str),
    Csv(csv::Error),
    Io(std::io::Error),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateDate(date) => write!(f, "duplicate entry for date {date}"),
            Self::Integrity(issues) => {
                write!(f, "journal data is corrupted ({} issue(s))", issues.len())?;
                for issue in issues {
                    write!(f, "; {issue}")?;
                }
                Ok(())
            }
            Self::UnexpectedHeader(found) => write!(
                f,
                "unexpected journal header `{}`; expected `{}`",
                found.join(","),
                csv_repo::HEADER.join(",")
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateDate(_)
            | Self::Integrity(_)
            | Self::UnexpectedHeader(_)
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<csv::Error> for RepoError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from(value))
    }
}

/// How a load reacts to records that fail to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Any bad record fails the whole load with every issue listed.
    #[default]
    Strict,
    /// Bad records are dropped and listed in `LoadReport::skipped`.
    SkipInvalid,
}

/// Result of a full load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Decoded entries sorted by date ascending, one per date.
    pub entries: Vec<JournalEntry>,
    /// Records dropped under `LoadPolicy::SkipInvalid`. Always empty in
    /// strict mode.
    pub skipped: Vec<IntegrityIssue>,
}

impl LoadReport {
    /// Whether every persisted record was loaded.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Repository interface for durable entry collections.
pub trait EntryRepository {
    /// Reads every persisted entry. Missing storage is an empty collection.
    fn load_entries(&self, policy: LoadPolicy) -> RepoResult<LoadReport>;
    /// Overwrites storage with exactly `entries`.
    fn persist_entries(&mut self, entries: &[JournalEntry]) -> RepoResult<()>;
}

impl<R: EntryRepository + ?Sized> EntryRepository for Box<R> {
    fn load_entries(&self, policy: LoadPolicy) -> RepoResult<LoadReport> {
        (**self).load_entries(policy)
    }

    fn persist_entries(&mut self, entries: &[JournalEntry]) -> RepoResult<()> {
        (**self).persist_entries(entries)
    }
}

/// Field values of one stored record before validation.
pub(crate) struct RawRecord<'a> {
    pub record: RecordRef,
    pub date: RawText<'a>,
    pub positivity: RawScore<'a>,
    pub stress: RawScore<'a>,
    pub energy: RawScore<'a>,
    pub description: RawText<'a>,
}

/// Text column as found in storage. `Err` holds why it could not be read.
pub(crate) type RawText<'a> = Result<&'a str, String>;

/// Numeric column as found in storage.
pub(crate) enum RawScore<'a> {
    Text(&'a str),
    Integer(i64),
    /// Storage type that cannot hold a score.
    Other(&'static str),
    /// Bytes that could not be read at all.
    Unreadable(String),
}

/// Decoding result for one stored record.
pub(crate) type DecodedRecord = (RecordRef, Result<JournalEntry, Vec<IntegrityIssue>>);

/// Decodes one record, collecting every field problem instead of stopping at
/// the first.
pub(crate) fn decode_record(raw: RawRecord<'_>) -> DecodedRecord {
    let record = raw.record;
    let mut issues = Vec::new();

    let date = raw
        .date
        .and_then(parse_entry_date)
        .map_err(|reason| issues.push(issue(record, "date", reason)))
        .ok();
    let positivity = decode_score(
        record,
        "positivity",
        POSITIVITY_RANGE,
        raw.positivity,
        &mut issues,
    );
    let stress = decode_score(record, "stress", STRESS_RANGE, raw.stress, &mut issues);
    let energy = decode_score(record, "energy", ENERGY_RANGE, raw.energy, &mut issues);
    let description = raw
        .description
        .map(str::to_string)
        .map_err(|reason| issues.push(issue(record, "description", reason)))
        .ok();

    match (date, positivity, stress, energy, description) {
        (Some(date), Some(positivity), Some(stress), Some(energy), Some(description))
            if issues.is_empty() =>
        {
            let entry = JournalEntry {
                date,
                positivity,
                stress,
                energy,
                description,
            };
            (record, Ok(entry))
        }
        _ => (record, Err(issues)),
    }
}

/// Folds decoded records into a report, applying `policy`.
///
/// Duplicate dates are integrity issues: the later record wins and the
/// earlier one is reported.
pub(crate) fn assemble_report(
    decoded: Vec<DecodedRecord>,
    policy: LoadPolicy,
) -> RepoResult<LoadReport> {
    let mut by_date: BTreeMap<NaiveDate, (RecordRef, JournalEntry)> = BTreeMap::new();
    let mut issues = Vec::new();

    for (record, result) in decoded {
        match result {
            Ok(entry) => match by_date.entry(entry.date) {
                MapEntry::Vacant(slot) => {
                    slot.insert((record, entry));
                }
                MapEntry::Occupied(mut slot) => {
                    let (previous, _) = slot.insert((record, entry));
                    issues.push(IntegrityIssue {
                        record: previous,
                        field: "date",
                        reason: format!("duplicate date, superseded by {record}"),
                    });
                }
            },
            Err(mut record_issues) => issues.append(&mut record_issues),
        }
    }

    if policy == LoadPolicy::Strict && !issues.is_empty() {
        return Err(RepoError::Integrity(issues));
    }

    Ok(LoadReport {
        entries: by_date.into_values().map(|(_, entry)| entry).collect(),
        skipped: issues,
    })
}

/// Checks a collection before it is written.
pub(crate) fn validate_for_persist(entries: &[JournalEntry]) -> RepoResult<()> {
    let mut seen = BTreeSet::new();
    for entry in entries {
        entry.validate()?;
        if !seen.insert(entry.date) {
            return Err(RepoError::DuplicateDate(entry.date));
        }
    }
    Ok(())
}

/// Parses a stored date.
///
/// Accepts `YYYY-MM-DD`, plus `YYYY-MM-DD 00:00:00` as written by older
/// datetime-typed exports. A non-midnight time is rejected rather than
/// truncated.
pub fn parse_entry_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("date is empty".to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    match NaiveDateTime::parse_from_str(trimmed, LEGACY_DATETIME_FORMAT) {
        Ok(datetime) if datetime.time() == NaiveTime::MIN => Ok(datetime.date()),
        Ok(_) => Err(format!("date `{trimmed}` carries a non-midnight time")),
        Err(_) => Err(format!("unparsable date `{trimmed}`; expected YYYY-MM-DD")),
    }
}

/// Formats a date the way every backend stores it.
pub fn format_entry_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn decode_score(
    record: RecordRef,
    field: &'static str,
    range: (i32, i32),
    raw: RawScore<'_>,
    issues: &mut Vec<IntegrityIssue>,
) -> Option<i32> {
    let value = match raw {
        RawScore::Integer(value) => value,
        RawScore::Text(text) => match text.trim().parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                issues.push(issue(record, field, format!("not an integer: `{text}`")));
                return None;
            }
        },
        RawScore::Other(kind) => {
            issues.push(issue(record, field, format!("expected integer, found {kind}")));
            return None;
        }
        RawScore::Unreadable(reason) => {
            issues.push(issue(record, field, reason));
            return None;
        }
    };

    match check_range(field, value, range) {
        Ok(()) => i32::try_from(value).ok(),
        Err(err) => {
            issues.push(issue(record, field, err.to_string()));
            None
        }
    }
}

fn issue(record: RecordRef, field: &'static str, reason: String) -> IntegrityIssue {
    IntegrityIssue {
        record,
        field,
        reason,
    }
}
