//! Journal session use-cases.
//!
//! # Responsibility
//! - Run the load -> submit -> recompute -> reflect flow over explicit
//!   session state.
//! - Build the dashboard view: mood trend, headline metric, latest
//!   reflection.
//! - Surface corrupted storage instead of pretending it is empty.
//!
//! # Invariants
//! - Derived values are recomputed from entries on every call, never cached.
//! - A degraded session (storage failed to decode) never persists, so the
//!   corrupted data stays on disk for inspection.
//! - Submitting from a session with skipped records rewrites storage without
//!   those records; the next session lists them in `dropped`.

use crate::analysis::mood_index::{self, MoodPoint, TrendSummary};
use crate::analysis::reflection::ReflectionFeedback;
use crate::analysis::sentiment::{SentimentOutcome, SentimentScorer};
use crate::model::entry::{EntryValidationError, JournalEntry};
use crate::repo::{EntryRepository, IntegrityIssue, RepoError};
use crate::service::entry_store::EntryStore;
use chrono::NaiveDate;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for journal use-cases.
#[derive(Debug)]
pub enum JournalError {
    /// Submitted entry is out of range; nothing was persisted.
    Validation(EntryValidationError),
    /// Storage failed.
    Store(RepoError),
    /// Session was opened on corrupted storage; writes are refused.
    StoreDegraded(String),
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "entry rejected: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::StoreDegraded(details) => write!(
                f,
                "journal storage is corrupted; refusing to overwrite it ({details})"
            ),
        }
    }
}

impl Error for JournalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::StoreDegraded(_) => None,
        }
    }
}

impl From<EntryValidationError> for JournalError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for JournalError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

/// Explicit working state of one journal session.
#[derive(Debug, Default)]
pub struct JournalSession {
    entries: Vec<JournalEntry>,
    skipped: Vec<IntegrityIssue>,
    dropped: Vec<IntegrityIssue>,
    corruption: Option<RepoError>,
}

impl JournalSession {
    /// Entries sorted by date ascending.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Most recent entry by date.
    pub fn latest(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }

    /// Records dropped at load time under `LoadPolicy::SkipInvalid`.
    pub fn skipped(&self) -> &[IntegrityIssue] {
        &self.skipped
    }

    /// Skipped records the submit that produced this session removed from
    /// storage.
    pub fn dropped(&self) -> &[IntegrityIssue] {
        &self.dropped
    }

    /// Load error that forced the empty fallback, if any.
    pub fn corruption(&self) -> Option<&RepoError> {
        self.corruption.as_ref()
    }

    pub fn is_degraded(&self) -> bool {
        self.corruption.is_some()
    }
}

/// Sentiment reflection on one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflection {
    pub date: NaiveDate,
    pub outcome: SentimentOutcome,
    pub feedback: ReflectionFeedback,
}

/// Everything the trend/reflection views render.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodDashboard {
    /// One point per entry, sorted by date.
    pub points: Vec<MoodPoint>,
    /// `None` when there are no entries.
    pub summary: Option<TrendSummary>,
    /// Reflection on the most recent entry.
    pub reflection: Option<Reflection>,
}

/// Journal service facade over an entry store.
pub struct JournalService<R: EntryRepository> {
    store: EntryStore<R>,
    scorer: SentimentScorer,
}

impl<R: EntryRepository> JournalService<R> {
    pub fn new(store: EntryStore<R>, scorer: SentimentScorer) -> Self {
        Self { store, scorer }
    }

    pub fn store(&self) -> &EntryStore<R> {
        &self.store
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    /// Loads the journal into a new session.
    ///
    /// Corrupted storage (integrity or header errors) falls back to an empty,
    /// degraded session carrying the error. Other storage failures (I/O,
    /// database) are returned as errors.
    pub fn open_session(&self) -> Result<JournalSession, JournalError> {
        match self.store.load() {
            Ok(report) => {
                if !report.is_clean() {
                    warn!(
                        "event=session_open module=service status=degraded skipped={}",
                        report.skipped.len()
                    );
                }
                Ok(JournalSession {
                    entries: report.entries,
                    skipped: report.skipped,
                    ..JournalSession::default()
                })
            }
            Err(err @ (RepoError::Integrity(_) | RepoError::UnexpectedHeader(_))) => {
                error!("event=session_open module=service status=corrupted fallback=empty");
                Ok(JournalSession {
                    corruption: Some(err),
                    ..JournalSession::default()
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Upserts `entry`, persists the full collection and returns the next
    /// session. `session` is left as it was on error.
    pub fn submit(
        &mut self,
        session: &JournalSession,
        entry: JournalEntry,
    ) -> Result<JournalSession, JournalError> {
        if let Some(err) = session.corruption() {
            warn!("event=entry_submit module=service status=rejected reason=degraded");
            return Err(JournalError::StoreDegraded(err.to_string()));
        }
        if !session.skipped.is_empty() {
            warn!(
                "event=entry_submit module=service status=ok dropping_skipped={}",
                session.skipped.len()
            );
        }

        let date = entry.date;
        let entries = self.store.submit(session.entries(), entry).inspect_err(|err| {
            warn!("event=entry_submit module=service status=error error={err}");
        })?;
        info!(
            "event=entry_submit module=service status=ok date={date} count={}",
            entries.len()
        );

        Ok(JournalSession {
            entries,
            dropped: session.skipped.clone(),
            ..JournalSession::default()
        })
    }

    /// Recomputes the trend, headline metric and latest reflection.
    pub fn dashboard(&self, session: &JournalSession) -> MoodDashboard {
        let points = mood_index::trend(session.entries());
        let summary = mood_index::summarize_trend(&points);
        let reflection = session.latest().map(|entry| self.reflect(entry));
        MoodDashboard {
            points,
            summary,
            reflection,
        }
    }

    /// Scores one entry's description and picks its feedback message.
    pub fn reflect(&self, entry: &JournalEntry) -> Reflection {
        let outcome = self.scorer.score(&entry.description);
        Reflection {
            date: entry.date,
            outcome,
            feedback: ReflectionFeedback::for_outcome(outcome),
        }
    }
}
