use chrono::NaiveDate;
use moodjournal_core::{
    CsvEntryRepository, EntryStore, FeedbackTone, JournalEntry, JournalError, JournalService,
    LoadPolicy, SentimentLabel, SentimentOutcome, SentimentScorer,
};
use std::path::Path;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
}

fn service(path: &Path, policy: LoadPolicy) -> JournalService<CsvEntryRepository> {
    let store = EntryStore::with_policy(CsvEntryRepository::new(path), policy);
    JournalService::new(store, SentimentScorer::default())
}

#[test]
fn empty_journal_has_empty_dashboard() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir.path().join("journal.csv"), LoadPolicy::Strict);

    let session = service.open_session().unwrap();
    assert!(!session.is_degraded());
    let dashboard = service.dashboard(&session);
    assert!(dashboard.points.is_empty());
    assert_eq!(dashboard.summary, None);
    assert_eq!(dashboard.reflection, None);
}

#[test]
fn submissions_drive_trend_summary_and_reflection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.csv");
    let mut service = service(&path, LoadPolicy::Strict);

    let session = service.open_session().unwrap();
    // Mood indices 2, 5, 1 in date order, submitted out of order.
    let session = service
        .submit(&session, JournalEntry::new(day(3), 1, 5, 5, "I am not sad").unwrap())
        .unwrap();
    let session = service
        .submit(&session, JournalEntry::new(day(1), 2, 5, 5, "").unwrap())
        .unwrap();
    let session = service
        .submit(&session, JournalEntry::new(day(2), 3, 4, 6, "happy").unwrap())
        .unwrap();

    let dashboard = service.dashboard(&session);
    let indices: Vec<f64> = dashboard.points.iter().map(|point| point.mood_index).collect();
    assert_eq!(indices, vec![2.0, 5.0, 1.0]);

    let summary = dashboard.summary.unwrap();
    assert_eq!(summary.latest, 1.0);
    assert_eq!(summary.delta, Some(-4.0));

    let reflection = dashboard.reflection.unwrap();
    assert_eq!(reflection.date, day(3));
    assert_eq!(
        reflection.outcome,
        SentimentOutcome::Scored {
            score: 1,
            label: SentimentLabel::Positive,
        }
    );
    assert_eq!(reflection.feedback.tone, FeedbackTone::Success);

    let reopened = service.open_session().unwrap();
    assert_eq!(reopened.entries(), session.entries());
}

#[test]
fn latest_entry_without_text_reflects_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service(&dir.path().join("journal.csv"), LoadPolicy::Strict);

    let session = service.open_session().unwrap();
    let session = service
        .submit(&session, JournalEntry::new(day(4), 0, 5, 5, "   ").unwrap())
        .unwrap();

    let reflection = service.dashboard(&session).reflection.unwrap();
    assert_eq!(reflection.outcome, SentimentOutcome::Empty);
}

#[test]
fn validation_failure_keeps_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service(&dir.path().join("journal.csv"), LoadPolicy::Strict);
    let session = service.open_session().unwrap();
    let session = service
        .submit(&session, JournalEntry::new(day(1), 1, 5, 5, "kept").unwrap())
        .unwrap();

    let mut invalid = JournalEntry::new(day(2), 0, 5, 5, "").unwrap();
    invalid.positivity = -6;
    let err = service.submit(&session, invalid).unwrap_err();
    match err {
        JournalError::Validation(validation) => assert_eq!(validation.field(), "positivity"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.entries().len(), 1);
    assert_eq!(service.open_session().unwrap().entries().len(), 1);
}

#[test]
fn corrupted_storage_opens_degraded_and_refuses_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.csv");
    let corrupted = "Date,Positivity,Stress,Energy,Description\nnot-a-date,1,5,5,x\n";
    std::fs::write(&path, corrupted).unwrap();
    let mut service = service(&path, LoadPolicy::Strict);

    let session = service.open_session().unwrap();
    assert!(session.is_degraded());
    assert!(session.entries().is_empty());
    assert!(session.corruption().unwrap().to_string().contains("line 2"));

    let err = service
        .submit(&session, JournalEntry::new(day(1), 0, 5, 5, "").unwrap())
        .unwrap_err();
    assert!(matches!(err, JournalError::StoreDegraded(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), corrupted);
}

#[test]
fn unreadable_bytes_open_degraded_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.csv");
    let mut corrupted = b"Date,Positivity,Stress,Energy,Description\n2024-02-01,1,5,5,ok\n".to_vec();
    corrupted.extend_from_slice(b"2024-02-02,1,5,5,caf\xFF\xFE\n");
    std::fs::write(&path, &corrupted).unwrap();
    let mut service = service(&path, LoadPolicy::Strict);

    let session = service.open_session().unwrap();
    assert!(session.is_degraded());
    let message = session.corruption().unwrap().to_string();
    assert!(message.contains("line 3"));
    assert!(message.contains("description"));

    let err = service
        .submit(&session, JournalEntry::new(day(3), 0, 5, 5, "").unwrap())
        .unwrap_err();
    assert!(matches!(err, JournalError::StoreDegraded(_)));
    assert_eq!(std::fs::read(&path).unwrap(), corrupted);
}

#[test]
fn skip_invalid_session_lists_skipped_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.csv");
    std::fs::write(
        &path,
        "Date,Positivity,Stress,Energy,Description\n2024-02-01,1,5,5,ok\n2024-02-02,1,99,5,bad\n",
    )
    .unwrap();
    let mut service = service(&path, LoadPolicy::SkipInvalid);

    let session = service.open_session().unwrap();
    assert!(!session.is_degraded());
    assert_eq!(session.entries().len(), 1);
    assert_eq!(session.skipped().len(), 1);
    assert_eq!(session.skipped()[0].field, "stress");

    let session = service
        .submit(&session, JournalEntry::new(day(3), 0, 5, 5, "").unwrap())
        .unwrap();
    assert!(session.skipped().is_empty());
    assert_eq!(session.dropped().len(), 1);
    assert_eq!(session.dropped()[0].field, "stress");
    assert!(service.open_session().unwrap().skipped().is_empty());
}
