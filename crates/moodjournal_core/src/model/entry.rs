//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the one-per-day record captured by the journal form.
//! - Own range validation for the three affect scores.
//! - Provide the upsert-by-date rule over an explicit entry collection.
//!
//! # Invariants
//! - `positivity` is within `[-5, 5]`, `stress` and `energy` within `[0, 10]`.
//! - A collection holds at most one entry per `date`.
//! - Collections returned by this module are sorted by `date` ascending.
//! - Entries are replaced whole; there is no field-level merge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Inclusive range accepted for `positivity`.
pub const POSITIVITY_RANGE: (i32, i32) = (-5, 5);
/// Inclusive range accepted for `stress`.
pub const STRESS_RANGE: (i32, i32) = (0, 10);
/// Inclusive range accepted for `energy`.
pub const ENERGY_RANGE: (i32, i32) = (0, 10);

/// Validation error for submitted or decoded entry fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// A numeric score is outside its declared range.
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i32,
        max: i32,
    },
}

impl EntryValidationError {
    /// Name of the offending field, as shown back to the form.
    pub fn field(&self) -> &'static str {
        match self {
            Self::OutOfRange { field, .. } => field,
        }
    }
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} must be within [{min}, {max}], got {value}"),
        }
    }
}

impl Error for EntryValidationError {}

/// One calendar day's mood record.
///
/// Deserialization runs the same range checks as [`JournalEntry::new`], so an
/// out-of-range value can never enter the core through serde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawJournalEntry")]
pub struct JournalEntry {
    /// Calendar date, unique key within a collection.
    pub date: NaiveDate,
    /// Overall positivity, `-5` (very low) to `5` (very positive).
    pub positivity: i32,
    /// Stress, `0` (calm) to `10` (extremely stressed).
    pub stress: i32,
    /// Energy, `0` (exhausted) to `10` (full of energy).
    pub energy: i32,
    /// Free-form reflection text. May be empty.
    pub description: String,
}

#[derive(Deserialize)]
struct RawJournalEntry {
    date: NaiveDate,
    positivity: i32,
    stress: i32,
    energy: i32,
    #[serde(default)]
    description: String,
}

impl TryFrom<RawJournalEntry> for JournalEntry {
    type Error = EntryValidationError;

    fn try_from(raw: RawJournalEntry) -> Result<Self, Self::Error> {
        Self::new(
            raw.date,
            raw.positivity,
            raw.stress,
            raw.energy,
            raw.description,
        )
    }
}

impl JournalEntry {
    /// Creates a validated entry.
    ///
    /// # Errors
    /// - Returns `OutOfRange` naming the first field outside its range, checked
    ///   in `positivity`, `stress`, `energy` order.
    pub fn new(
        date: NaiveDate,
        positivity: i32,
        stress: i32,
        energy: i32,
        description: impl Into<String>,
    ) -> Result<Self, EntryValidationError> {
        let entry = Self {
            date,
            positivity,
            stress,
            energy,
            description: description.into(),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Re-checks range invariants.
    ///
    /// Public fields can be mutated after construction, so write paths call
    /// this again before persisting.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        check_range("positivity", i64::from(self.positivity), POSITIVITY_RANGE)?;
        check_range("stress", i64::from(self.stress), STRESS_RANGE)?;
        check_range("energy", i64::from(self.energy), ENERGY_RANGE)?;
        Ok(())
    }
}

/// Checks one numeric field against its inclusive range.
pub fn check_range(
    field: &'static str,
    value: i64,
    (min, max): (i32, i32),
) -> Result<(), EntryValidationError> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(EntryValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Inserts `entry`, replacing any entry with the same date.
///
/// Returns the new full collection sorted by date ascending; the input is
/// left untouched so a rejected submission keeps the previous state intact.
/// Insertion order of the input is irrelevant.
///
/// # Errors
/// - Returns the validation error of `entry` unchanged.
pub fn upsert_entry(
    entries: &[JournalEntry],
    entry: JournalEntry,
) -> Result<Vec<JournalEntry>, EntryValidationError> {
    entry.validate()?;

    let mut next: Vec<JournalEntry> = entries
        .iter()
        .filter(|existing| existing.date != entry.date)
        .cloned()
        .collect();
    next.push(entry);
    sort_by_date(&mut next);
    Ok(next)
}

/// Sorts a collection by date ascending.
///
/// Stable, so already-ordered input is left as is.
pub fn sort_by_date(entries: &mut [JournalEntry]) {
    entries.sort_by_key(|entry| entry.date);
}
