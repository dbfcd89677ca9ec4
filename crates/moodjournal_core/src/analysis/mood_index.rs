//! Mood index formula and trend summary.
//!
//! # Invariants
//! - `compute` is total over valid entries and has no side effects.
//! - Trend points are ordered by date ascending.
//! - `delta` is absent, not zero, when fewer than two points exist.

use crate::model::entry::JournalEntry;
use chrono::NaiveDate;
use serde::Serialize;

/// Midpoint of the 0..=10 stress/energy scales.
pub const SCALE_MIDPOINT: i32 = 5;

/// Returns the mood index of one entry.
///
/// Stress and energy are centered on zero first, then
/// `positivity + energy_norm - stress_norm`.
pub fn compute(entry: &JournalEntry) -> f64 {
    let stress_norm = entry.stress - SCALE_MIDPOINT;
    let energy_norm = entry.energy - SCALE_MIDPOINT;
    f64::from(entry.positivity + energy_norm - stress_norm)
}

/// One point of the mood trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodPoint {
    pub date: NaiveDate,
    pub mood_index: f64,
}

/// Headline metric shown next to the trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendSummary {
    /// Mood index of the most recent point, rounded to one decimal.
    pub latest: f64,
    /// Change against the previous point, rounded to one decimal.
    pub delta: Option<f64>,
}

/// Computes the mood index for every entry, sorted by date ascending.
pub fn trend(entries: &[JournalEntry]) -> Vec<MoodPoint> {
    let mut points: Vec<MoodPoint> = entries
        .iter()
        .map(|entry| MoodPoint {
            date: entry.date,
            mood_index: compute(entry),
        })
        .collect();
    points.sort_by_key(|point| point.date);
    points
}

/// Summarizes an ordered series of mood indices.
///
/// Returns `None` for an empty series.
pub fn summarize(indices: &[f64]) -> Option<TrendSummary> {
    let (&last, rest) = indices.split_last()?;
    let latest = round_one_decimal(last);
    let delta = rest
        .last()
        .map(|&previous| round_one_decimal(latest - previous));
    Some(TrendSummary { latest, delta })
}

/// Summarizes trend points produced by [`trend`].
pub fn summarize_trend(points: &[MoodPoint]) -> Option<TrendSummary> {
    let indices: Vec<f64> = points.iter().map(|point| point.mood_index).collect();
    summarize(&indices)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{round_one_decimal, summarize};

    #[test]
    fn round_one_decimal_matches_display_precision() {
        assert_eq!(round_one_decimal(1.26), 1.3);
        assert_eq!(round_one_decimal(-4.04), -4.0);
    }

    #[test]
    fn summarize_empty_series_is_none() {
        assert_eq!(summarize(&[]), None);
    }
}
