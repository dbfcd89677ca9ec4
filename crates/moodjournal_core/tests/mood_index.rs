use chrono::NaiveDate;
use moodjournal_core::analysis::mood_index::{compute, summarize, summarize_trend, trend};
use moodjournal_core::JournalEntry;

fn entry(day: u32, positivity: i32, stress: i32, energy: i32) -> JournalEntry {
    let date = NaiveDate::from_ymd_opt(2024, 4, day).unwrap();
    JournalEntry::new(date, positivity, stress, energy, "").unwrap()
}

#[test]
fn compute_matches_reference_points() {
    assert_eq!(compute(&entry(1, 3, 5, 5)), 3.0);
    assert_eq!(compute(&entry(1, 0, 10, 0)), -10.0);
    assert_eq!(compute(&entry(1, -5, 0, 10)), 5.0);
}

#[test]
fn compute_covers_extremes_of_valid_ranges() {
    assert_eq!(compute(&entry(1, 5, 0, 10)), 15.0);
    assert_eq!(compute(&entry(1, -5, 10, 0)), -15.0);
}

#[test]
fn compute_is_idempotent() {
    let sample = entry(2, 2, 7, 4);
    assert_eq!(compute(&sample), compute(&sample));
    assert_eq!(compute(&sample), -1.0);
}

#[test]
fn summarize_reports_latest_and_delta() {
    let summary = summarize(&[2.0, 5.0, 1.0]).unwrap();
    assert_eq!(summary.latest, 1.0);
    assert_eq!(summary.delta, Some(-4.0));
}

#[test]
fn summarize_single_point_has_no_delta() {
    let summary = summarize(&[4.0]).unwrap();
    assert_eq!(summary.latest, 4.0);
    assert_eq!(summary.delta, None);
}

#[test]
fn trend_is_sorted_by_date_regardless_of_input_order() {
    let entries = vec![entry(9, 1, 5, 5), entry(3, -2, 5, 5), entry(6, 0, 8, 2)];
    let points = trend(&entries);

    let days: Vec<u32> = points
        .iter()
        .map(|point| point.date.format("%d").to_string().parse().unwrap())
        .collect();
    assert_eq!(days, vec![3, 6, 9]);

    let summary = summarize_trend(&points).unwrap();
    assert_eq!(summary.latest, 1.0);
    assert_eq!(summary.delta, Some(7.0));
}
