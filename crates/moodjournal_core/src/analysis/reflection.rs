//! User-facing feedback for the latest reflection.

use crate::analysis::sentiment::{SentimentLabel, SentimentOutcome};
use serde::Serialize;

/// Presentation tone for the feedback banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTone {
    Info,
    Success,
    Warning,
}

/// Message shown for one sentiment outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReflectionFeedback {
    pub tone: FeedbackTone,
    pub headline: &'static str,
    pub detail: &'static str,
}

impl ReflectionFeedback {
    pub fn for_outcome(outcome: SentimentOutcome) -> Self {
        match outcome.label() {
            None => Self {
                tone: FeedbackTone::Info,
                headline: "You didn't write anything today, and that's completely okay.",
                detail: "",
            },
            Some(SentimentLabel::Positive) => Self {
                tone: FeedbackTone::Success,
                headline: "Your entry includes some positive moments.",
                detail: "Noticing these moments matters.",
            },
            Some(SentimentLabel::Negative) => Self {
                tone: FeedbackTone::Warning,
                headline: "Your entry includes some challenging moments.",
                detail: "Reflecting is already a healthy step.",
            },
            Some(SentimentLabel::Neutral) => Self {
                tone: FeedbackTone::Info,
                headline: "Your day feels mixed or neutral.",
                detail: "That's a very normal experience.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FeedbackTone, ReflectionFeedback};
    use crate::analysis::sentiment::{SentimentLabel, SentimentOutcome};

    #[test]
    fn empty_and_neutral_feedback_differ() {
        let empty = ReflectionFeedback::for_outcome(SentimentOutcome::Empty);
        let neutral = ReflectionFeedback::for_outcome(SentimentOutcome::Scored {
            score: 0,
            label: SentimentLabel::Neutral,
        });
        assert_eq!(empty.tone, FeedbackTone::Info);
        assert_ne!(empty, neutral);
    }
}
