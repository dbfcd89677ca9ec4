//! Lexicon-based reflection sentiment scoring.
//!
//! # Responsibility
//! - Normalize free text into lowercase word tokens.
//! - Score tokens against positive/negative word tables with a backward
//!   negation window.
//! - Keep word tables as swappable configuration, separate from the scoring
//!   algorithm.
//!
//! # Invariants
//! - The negation window is exactly the 3 tokens before a scored word; no
//!   lookahead.
//! - A negation anywhere in the window flips the word's contribution.
//! - Negation words and unknown words contribute 0.
//! - Text with zero tokens yields `SentimentOutcome::Empty`, never a neutral
//!   score.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Number of preceding tokens searched for a negation word.
pub const NEGATION_WINDOW: usize = 3;

/// Version label of the built-in word tables.
pub const LEXICON_V1: &str = "v1";

const V1_POSITIVE: &[&str] = &["happy", "good", "great", "calm", "relieved", "productive"];
const V1_NEGATIVE: &[&str] = &[
    "sad", "tired", "angry", "stress", "stressed", "anxious", "bad",
];
const V1_NEGATIONS: &[&str] = &["not", "no", "never"];

static PUNCTUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("valid punctuation regex"));
static DEFAULT_SCORER: Lazy<SentimentScorer> = Lazy::new(SentimentScorer::default);

/// Three-way sentiment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Classifies a summed score by its sign.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s > 0 => Self::Positive,
            s if s < 0 => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

impl Display for SentimentLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
        };
        f.write_str(label)
    }
}

/// Result of scoring one reflection text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SentimentOutcome {
    /// Nothing was written (no tokens after normalization).
    Empty,
    /// Something was written and scored.
    Scored { score: i32, label: SentimentLabel },
}

impl SentimentOutcome {
    /// Summed score, `None` for empty text.
    pub fn score(&self) -> Option<i32> {
        match self {
            Self::Empty => None,
            Self::Scored { score, .. } => Some(*score),
        }
    }

    /// Label, `None` for empty text.
    pub fn label(&self) -> Option<SentimentLabel> {
        match self {
            Self::Empty => None,
            Self::Scored { label, .. } => Some(*label),
        }
    }
}

/// Error for word tables that cannot be used for scoring.
#[derive(Debug)]
pub enum LexiconError {
    /// A word is blank or contains characters removed by normalization, so
    /// no token could ever match it.
    UnmatchableWord { list: &'static str, word: String },
    /// A word appears in two lists.
    Overlap {
        word: String,
        first: &'static str,
        second: &'static str,
    },
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for LexiconError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnmatchableWord { list, word } => {
                write!(f, "{list} word `{word}` can never match a token")
            }
            Self::Overlap {
                word,
                first,
                second,
            } => write!(f, "word `{word}` is listed as both {first} and {second}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid lexicon file: {err}"),
        }
    }
}

impl Error for LexiconError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::UnmatchableWord { .. } | Self::Overlap { .. } => None,
        }
    }
}

#[derive(Deserialize)]
struct LexiconFile {
    version: String,
    positive: Vec<String>,
    negative: Vec<String>,
    #[serde(default = "default_negations")]
    negations: Vec<String>,
}

fn default_negations() -> Vec<String> {
    V1_NEGATIONS.iter().map(|word| (*word).to_string()).collect()
}

/// Word tables used by the scorer.
///
/// Any change to the tables changes observable scores, so every table
/// carries a version label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    version: String,
    positive: BTreeSet<String>,
    negative: BTreeSet<String>,
    negations: BTreeSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::v1()
    }
}

impl Lexicon {
    /// The built-in word tables.
    pub fn v1() -> Self {
        let set = |words: &[&str]| words.iter().map(|word| (*word).to_string()).collect();
        Self {
            version: LEXICON_V1.to_string(),
            positive: set(V1_POSITIVE),
            negative: set(V1_NEGATIVE),
            negations: set(V1_NEGATIONS),
        }
    }

    /// Builds custom word tables.
    ///
    /// Words are trimmed and lowercased.
    ///
    /// # Errors
    /// - `UnmatchableWord` for blank words or words containing whitespace or
    ///   punctuation.
    /// - `Overlap` when a word is in more than one list.
    pub fn new<I, S>(
        version: impl Into<String>,
        positive: I,
        negative: I,
        negations: I,
    ) -> Result<Self, LexiconError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let positive = normalize_words("positive", positive)?;
        let negative = normalize_words("negative", negative)?;
        let negations = normalize_words("negation", negations)?;

        for (first, second, left, right) in [
            ("positive", "negative", &positive, &negative),
            ("positive", "negation", &positive, &negations),
            ("negative", "negation", &negative, &negations),
        ] {
            if let Some(word) = left.intersection(right).next() {
                return Err(LexiconError::Overlap {
                    word: word.clone(),
                    first,
                    second,
                });
            }
        }

        Ok(Self {
            version: version.into(),
            positive,
            negative,
            negations,
        })
    }

    /// Parses word tables from JSON:
    /// `{"version": "...", "positive": [...], "negative": [...], "negations": [...]}`.
    ///
    /// `negations` defaults to the built-in list when omitted.
    pub fn from_json_str(json: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_str(json).map_err(LexiconError::Json)?;
        Self::new(file.version, file.positive, file.negative, file.negations)
    }

    /// Reads word tables from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let json = std::fs::read_to_string(path).map_err(LexiconError::Io)?;
        Self::from_json_str(&json)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_positive(&self, token: &str) -> bool {
        self.positive.contains(token)
    }

    pub fn is_negative(&self, token: &str) -> bool {
        self.negative.contains(token)
    }

    pub fn is_negation(&self, token: &str) -> bool {
        self.negations.contains(token)
    }
}

/// Scores reflection text against one lexicon.
#[derive(Debug, Clone, Default)]
pub struct SentimentScorer {
    lexicon: Lexicon,
}

impl SentimentScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Scores `text`.
    pub fn score(&self, text: &str) -> SentimentOutcome {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentOutcome::Empty;
        }

        let score = self.score_tokens(&tokens);
        SentimentOutcome::Scored {
            score,
            label: SentimentLabel::from_score(score),
        }
    }

    /// Sums token contributions. Not bounded or averaged.
    pub fn score_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> i32 {
        tokens
            .iter()
            .enumerate()
            .map(|(index, token)| {
                let token = token.as_ref();
                let polarity = if self.lexicon.is_positive(token) {
                    1
                } else if self.lexicon.is_negative(token) {
                    -1
                } else {
                    return 0;
                };
                if self.is_negated(tokens, index) {
                    -polarity
                } else {
                    polarity
                }
            })
            .sum()
    }

    fn is_negated<S: AsRef<str>>(&self, tokens: &[S], index: usize) -> bool {
        let start = index.saturating_sub(NEGATION_WINDOW);
        tokens[start..index]
            .iter()
            .any(|token| self.lexicon.is_negation(token.as_ref()))
    }
}

/// Scores `text` with the built-in v1 lexicon.
pub fn score(text: &str) -> SentimentOutcome {
    DEFAULT_SCORER.score(text)
}

/// Lowercases, trims, strips characters that are neither letters, digits nor
/// whitespace, then splits on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.trim().to_lowercase();
    PUNCTUATION_RE
        .replace_all(&lowered, "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn normalize_words<I, S>(list: &'static str, words: I) -> Result<BTreeSet<String>, LexiconError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized = BTreeSet::new();
    for word in words {
        let raw = word.as_ref();
        let candidate = raw.trim().to_lowercase();
        let tokens = tokenize(&candidate);
        if tokens.len() != 1 || tokens[0] != candidate {
            return Err(LexiconError::UnmatchableWord {
                list,
                word: raw.to_string(),
            });
        }
        normalized.insert(candidate);
    }
    Ok(normalized)
}
