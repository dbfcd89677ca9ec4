//! CSV-file entry repository.
//!
//! # Responsibility
//! - Read and write the journal as a five-column CSV table.
//! - Keep description text byte-identical through standard CSV quoting.
//!
//! # Invariants
//! - Header row is exactly `Date,Positivity,Stress,Energy,Description` and is
//!   written even when the collection is empty.
//! - A missing or zero-byte file is an empty journal, not an error.
//! - Fields that are not valid UTF-8 are integrity issues of their own
//!   record; they never abort the rest of the load.
//! - Writes land in a temp file in the target directory and are renamed over
//!   the target, so readers never observe a half-written journal.

use super::{
    assemble_report, decode_record, format_entry_date, validate_for_persist, EntryRepository,
    IntegrityIssue, LoadPolicy, LoadReport, RawRecord, RawScore, RawText, RecordRef, RepoError,
    RepoResult,
};
use crate::model::entry::JournalEntry;
use csv::{ByteRecord, ReaderBuilder, Trim, WriterBuilder};
use log::{error, info, warn};
use serde::Serialize;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Column names in on-disk order.
pub const HEADER: [&str; 5] = ["Date", "Positivity", "Stress", "Energy", "Description"];

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Positivity")]
    positivity: i32,
    #[serde(rename = "Stress")]
    stress: i32,
    #[serde(rename = "Energy")]
    energy: i32,
    #[serde(rename = "Description")]
    description: &'a str,
}

impl<'a> From<&'a JournalEntry> for CsvRow<'a> {
    fn from(entry: &'a JournalEntry) -> Self {
        Self {
            date: format_entry_date(entry.date),
            positivity: entry.positivity,
            stress: entry.stress,
            energy: entry.energy,
            description: entry.description.as_str(),
        }
    }
}

/// CSV-backed journal repository.
#[derive(Debug, Clone)]
pub struct CsvEntryRepository {
    path: PathBuf,
}

impl CsvEntryRepository {
    /// Creates a repository for `path`. The file is not touched until the
    /// first load or persist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomically(&self, entries: &[JournalEntry]) -> RepoResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut staging = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(staging.as_file_mut());
            writer.write_record(HEADER)?;
            for entry in entries {
                writer.serialize(CsvRow::from(entry))?;
            }
            writer.flush()?;
        }
        staging.as_file().sync_all()?;
        staging
            .persist(&self.path)
            .map_err(|err| RepoError::Io(err.error))?;
        Ok(())
    }
}

impl EntryRepository for CsvEntryRepository {
    fn load_entries(&self, policy: LoadPolicy) -> RepoResult<LoadReport> {
        let started_at = Instant::now();
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=entries_load module=repo backend=csv status=ok source=missing count=0");
                return Ok(LoadReport::default());
            }
            Err(err) => {
                error!(
                    "event=entries_load module=repo backend=csv status=error error_code=open_failed error={err}"
                );
                return Err(err.into());
            }
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::None)
            .from_reader(file);

        let header = reader.byte_headers()?.clone();
        if header.is_empty() {
            info!("event=entries_load module=repo backend=csv status=ok source=empty count=0");
            return Ok(LoadReport::default());
        }
        if !header_matches(&header) {
            error!(
                "event=entries_load module=repo backend=csv status=error error_code=unexpected_header columns={}",
                header.len()
            );
            return Err(RepoError::UnexpectedHeader(
                header
                    .iter()
                    .map(|column| String::from_utf8_lossy(column).into_owned())
                    .collect(),
            ));
        }

        let mut decoded = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            decoded.push(decode_csv_record(&record));
        }

        let report = assemble_report(decoded, policy).inspect_err(|err| {
            if let RepoError::Integrity(issues) = err {
                error!(
                    "event=entries_load module=repo backend=csv status=error error_code=integrity issues={}",
                    issues.len()
                );
            }
        })?;
        if !report.is_clean() {
            warn!(
                "event=entries_load module=repo backend=csv status=degraded skipped={}",
                report.skipped.len()
            );
        }
        info!(
            "event=entries_load module=repo backend=csv status=ok count={} duration_ms={}",
            report.entries.len(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    fn persist_entries(&mut self, entries: &[JournalEntry]) -> RepoResult<()> {
        let started_at = Instant::now();
        validate_for_persist(entries)?;

        match self.write_atomically(entries) {
            Ok(()) => {
                info!(
                    "event=entries_persist module=repo backend=csv status=ok count={} duration_ms={}",
                    entries.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=entries_persist module=repo backend=csv status=error error_code=write_failed error={err}"
                );
                Err(err)
            }
        }
    }
}

fn header_matches(header: &ByteRecord) -> bool {
    header.len() == HEADER.len()
        && header.iter().zip(HEADER).all(|(found, expected)| {
            std::str::from_utf8(found)
                .is_ok_and(|found| found.trim().trim_start_matches('\u{feff}') == expected)
        })
}

fn decode_csv_record(record: &ByteRecord) -> super::DecodedRecord {
    let location = RecordRef::Line(record.position().map_or(0, |position| position.line()));
    if record.len() != HEADER.len() {
        let issue = IntegrityIssue {
            record: location,
            field: "record",
            reason: format!(
                "expected {} fields, found {}",
                HEADER.len(),
                record.len()
            ),
        };
        return (location, Err(vec![issue]));
    }

    let field = move |index: usize| utf8_field(record.get(index).unwrap_or_default());
    let score = move |index: usize| match field(index) {
        Ok(text) => RawScore::Text(text),
        Err(reason) => RawScore::Unreadable(reason),
    };
    decode_record(RawRecord {
        record: location,
        date: field(0),
        positivity: score(1),
        stress: score(2),
        energy: score(3),
        description: field(4),
    })
}

fn utf8_field(bytes: &[u8]) -> RawText<'_> {
    std::str::from_utf8(bytes)
        .map_err(|err| format!("invalid UTF-8 after byte {}", err.valid_up_to()))
}

#[cfg(test)]
mod tests {
    use super::{CsvEntryRepository, HEADER};
    use crate::model::entry::JournalEntry;
    use crate::repo::{EntryRepository, LoadPolicy, RecordRef};
    use chrono::NaiveDate;

    #[test]
    fn empty_collection_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        let mut repo = CsvEntryRepository::new(&path);

        repo.persist_entries(&[]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim_end(), HEADER.join(","));
        assert!(repo.load_entries(LoadPolicy::Strict).unwrap().entries.is_empty());
    }

    #[test]
    fn rows_use_iso_dates_and_plain_integers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        let mut repo = CsvEntryRepository::new(&path);
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let entry = JournalEntry::new(date, -2, 7, 3, "plain").unwrap();

        repo.persist_entries(&[entry]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.lines().any(|line| line == "2024-05-06,-2,7,3,plain"));
    }

    #[test]
    fn invalid_utf8_is_reported_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.csv");
        let mut bytes = b"Date,Positivity,Stress,Energy,Description\n".to_vec();
        bytes.extend_from_slice(b"2024-01-01,1,5,5,ok\n");
        bytes.extend_from_slice(b"2024-01-02,\xC3,5,5,caf\xFF\xFE\n");
        std::fs::write(&path, bytes).unwrap();

        let report = CsvEntryRepository::new(&path)
            .load_entries(LoadPolicy::SkipInvalid)
            .unwrap();

        assert_eq!(report.entries.len(), 1);
        let fields: Vec<_> = report.skipped.iter().map(|issue| issue.field).collect();
        assert_eq!(fields, vec!["positivity", "description"]);
        assert!(report
            .skipped
            .iter()
            .all(|issue| issue.record == RecordRef::Line(3)));
        assert_eq!(report.skipped[1].reason, "invalid UTF-8 after byte 3");
    }
}
