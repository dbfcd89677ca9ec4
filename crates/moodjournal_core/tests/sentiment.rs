use moodjournal_core::analysis::sentiment::{score, tokenize, NEGATION_WINDOW};
use moodjournal_core::{Lexicon, LexiconError, SentimentLabel, SentimentOutcome, SentimentScorer};

fn scored(score: i32, label: SentimentLabel) -> SentimentOutcome {
    SentimentOutcome::Scored { score, label }
}

#[test]
fn negation_flips_negative_word() {
    assert_eq!(score("I am not sad"), scored(1, SentimentLabel::Positive));
}

#[test]
fn repeated_words_sum_without_bound() {
    assert_eq!(score("happy happy happy"), scored(3, SentimentLabel::Positive));
}

#[test]
fn blank_text_is_empty_not_neutral() {
    assert_eq!(score(""), SentimentOutcome::Empty);
    assert_eq!(score("   "), SentimentOutcome::Empty);
    assert_eq!(score("?!"), SentimentOutcome::Empty);
}

#[test]
fn text_without_lexicon_hits_is_neutral() {
    assert_eq!(score("meh fine whatever"), scored(0, SentimentLabel::Neutral));
}

#[test]
fn words_outside_v1_lexicon_do_not_score() {
    // "tough" and "better" are not in the v1 tables.
    assert_eq!(
        score("Had a tough meeting but felt better later"),
        scored(0, SentimentLabel::Neutral)
    );
}

#[test]
fn negation_window_is_exactly_three_tokens() {
    assert_eq!(NEGATION_WINDOW, 3);
    // "not" 3 tokens back still flips.
    assert_eq!(score("not a b happy"), scored(-1, SentimentLabel::Negative));
    // "not" 4 tokens back does not.
    assert_eq!(score("not a b c happy"), scored(1, SentimentLabel::Positive));
}

#[test]
fn negation_only_looks_backward() {
    assert_eq!(score("happy not"), scored(1, SentimentLabel::Positive));
}

#[test]
fn one_negation_can_flip_several_words() {
    // "never" is inside the window of both "sad" and "angry".
    assert_eq!(score("never sad or angry"), scored(2, SentimentLabel::Positive));
}

#[test]
fn punctuation_and_case_are_ignored() {
    assert_eq!(score("GREAT!!! Not... BAD."), scored(2, SentimentLabel::Positive));
}

#[test]
fn mixed_text_can_cancel_out() {
    assert_eq!(score("good day but tired"), scored(0, SentimentLabel::Neutral));
}

#[test]
fn tokenize_matches_scoring_normalization() {
    assert_eq!(tokenize("  No, I'm NOT stressed. "), vec!["no", "im", "not", "stressed"]);
}

#[test]
fn custom_lexicon_from_json_changes_scores() {
    let lexicon = Lexicon::from_json_str(
        r#"{"version": "v1-plus", "positive": ["better", "good"], "negative": ["tough"]}"#,
    )
    .unwrap();
    assert_eq!(lexicon.version(), "v1-plus");
    assert!(lexicon.is_negation("never"));

    let scorer = SentimentScorer::new(lexicon);
    assert_eq!(
        scorer.score("Had a tough meeting but felt better later"),
        scored(0, SentimentLabel::Neutral)
    );
    assert_eq!(
        scorer.score("not tough at all, felt better"),
        scored(2, SentimentLabel::Positive)
    );
}

#[test]
fn lexicon_rejects_word_in_two_lists() {
    let err = Lexicon::new("broken", vec!["calm"], vec!["calm"], vec!["not"]).unwrap_err();
    match err {
        LexiconError::Overlap { word, first, second } => {
            assert_eq!(word, "calm");
            assert_eq!(first, "positive");
            assert_eq!(second, "negative");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn lexicon_file_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.json");
    std::fs::write(
        &path,
        r#"{"version": "team", "positive": ["grateful"], "negative": ["lonely"], "negations": ["hardly"]}"#,
    )
    .unwrap();

    let scorer = SentimentScorer::new(Lexicon::from_json_file(&path).unwrap());
    assert_eq!(scorer.score("hardly lonely"), scored(1, SentimentLabel::Positive));
    assert_eq!(scorer.score("not lonely"), scored(-1, SentimentLabel::Negative));
}
