//! Polarity, subjectivity and emotion-category analyzers.
//!
//! The feature extractor only sees the [`PolarityAnalyzer`] and
//! [`EmotionAnalyzer`] traits. The lexicon-backed implementations here are
//! what the binary ships with; [`Neutral`] stands in when no lexicon is given.

use std::{collections::BTreeMap, collections::HashMap, fmt, fs, path::Path, str::FromStr};

use crate::{
    error::LexiconLoadError,
    text::{lexicon::Table, mean, tokens},
};

/// Sentence-level sentiment scores.
pub trait PolarityAnalyzer: Send + Sync {
    /// Negative to positive, in `[-1, 1]`.
    fn polarity(&self, text: &str) -> f64;

    /// Objective to subjective, in `[0, 1]`.
    fn subjectivity(&self, text: &str) -> f64;
}

/// Counts of emotion-lexicon hits per category.
pub trait EmotionAnalyzer: Send + Sync {
    fn emotion_category_counts(&self, text: &str) -> BTreeMap<Emotion, usize>;
}

/// NRC emotion categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Emotion {
    Anger,
    Anticipation,
    Disgust,
    Fear,
    Joy,
    Negative,
    Positive,
    Sadness,
    Surprise,
    Trust,
}

impl Emotion {
    pub const ALL: [Emotion; 10] = [
        Emotion::Anger,
        Emotion::Anticipation,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Joy,
        Emotion::Negative,
        Emotion::Positive,
        Emotion::Sadness,
        Emotion::Surprise,
        Emotion::Trust,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Anticipation => "anticipation",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Joy => "joy",
            Emotion::Negative => "negative",
            Emotion::Positive => "positive",
            Emotion::Sadness => "sadness",
            Emotion::Surprise => "surprise",
            Emotion::Trust => "trust",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Analyzer that knows no words: zero polarity, zero subjectivity, no emotions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neutral;

impl PolarityAnalyzer for Neutral {
    fn polarity(&self, _text: &str) -> f64 {
        0.0
    }

    fn subjectivity(&self, _text: &str) -> f64 {
        0.0
    }
}

impl EmotionAnalyzer for Neutral {
    fn emotion_category_counts(&self, _text: &str) -> BTreeMap<Emotion, usize> {
        BTreeMap::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sentiment {
    polarity: f64,
    subjectivity: f64,
}

/// Word-level polarity/subjectivity table (`term, polarity, subjectivity`).
///
/// Scores are means over the words found. A negator directly before a word
/// (`not`, `no`, `never`, `cannot`, or any `...n't`) flips its polarity at half
/// strength.
#[derive(Debug, Clone, Default)]
pub struct SentimentLexicon {
    entries: HashMap<String, Sentiment>,
}

const NEGATION_FACTOR: f64 = -0.5;

fn is_negator(token: &str) -> bool {
    matches!(token, "not" | "no" | "never" | "cannot") || token.ends_with("n't")
}

impl SentimentLexicon {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconLoadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LexiconLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::parse(&source)?;
        tracing::info!(
            path = %path.display(),
            entries = lexicon.entries.len(),
            "loaded sentiment lexicon"
        );
        Ok(lexicon)
    }

    pub fn parse(source: &str) -> Result<Self, LexiconLoadError> {
        let table = Table::parse(source)?;
        let term = table.column(&["term", "word"], "term")?;
        let polarity = table.column(&["polarity"], "polarity")?;
        let subjectivity = table.column(&["subjectivity"], "subjectivity")?;

        let mut entries = HashMap::new();
        for row in table.rows() {
            let row = row?;
            entries.insert(
                row.text(term).to_lowercase(),
                Sentiment {
                    polarity: row.number(polarity)?,
                    subjectivity: row.number(subjectivity)?,
                },
            );
        }
        Ok(Self { entries })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(term, polarity, subjectivity)| {
                    (
                        term.as_ref().to_lowercase(),
                        Sentiment {
                            polarity,
                            subjectivity,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Matched words with polarity already adjusted for negation.
    fn scored(&self, text: &str) -> Vec<Sentiment> {
        let mut previous = String::new();
        let mut scored = Vec::new();
        for token in tokens(text) {
            if let Some(&hit) = self.entries.get(&token) {
                let polarity = if is_negator(&previous) {
                    hit.polarity * NEGATION_FACTOR
                } else {
                    hit.polarity
                };
                scored.push(Sentiment {
                    polarity,
                    subjectivity: hit.subjectivity,
                });
            }
            previous = token;
        }
        scored
    }
}

impl PolarityAnalyzer for SentimentLexicon {
    fn polarity(&self, text: &str) -> f64 {
        let values: Vec<f64> = self.scored(text).iter().map(|s| s.polarity).collect();
        mean(&values).clamp(-1.0, 1.0)
    }

    fn subjectivity(&self, text: &str) -> f64 {
        let values: Vec<f64> = self.scored(text).iter().map(|s| s.subjectivity).collect();
        mean(&values).clamp(0.0, 1.0)
    }
}

/// NRC word–emotion association lexicon.
///
/// Headerless, one association per line: `word<TAB>emotion<TAB>0|1`.
/// Only flagged (`1`) associations are kept.
#[derive(Debug, Clone, Default)]
pub struct EmotionLexicon {
    entries: HashMap<String, Vec<Emotion>>,
}

impl EmotionLexicon {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconLoadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LexiconLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::parse(&source)?;
        tracing::info!(
            path = %path.display(),
            words = lexicon.entries.len(),
            "loaded emotion lexicon"
        );
        Ok(lexicon)
    }

    pub fn parse(source: &str) -> Result<Self, LexiconLoadError> {
        let mut entries: HashMap<String, Vec<Emotion>> = HashMap::new();
        for (index, line) in source.lines().enumerate() {
            let line_no = index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            let &[word, category, flag] = fields.as_slice() else {
                return Err(LexiconLoadError::ShortRow {
                    line: line_no,
                    expected: 3,
                    found: fields.len(),
                });
            };

            let emotion: Emotion =
                category
                    .parse()
                    .map_err(|()| LexiconLoadError::UnknownCategory {
                        line: line_no,
                        value: category.to_string(),
                    })?;
            let associated = match flag {
                "0" => false,
                "1" => true,
                other => {
                    return Err(LexiconLoadError::InvalidNumber {
                        line: line_no,
                        column: "association".to_string(),
                        value: other.to_string(),
                    })
                }
            };

            let slot = entries.entry(word.to_lowercase()).or_default();
            if associated && !slot.contains(&emotion) {
                slot.push(emotion);
            }
        }
        entries.retain(|_, emotions| !emotions.is_empty());
        Ok(Self { entries })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Emotion>)>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(word, emotions)| (word.as_ref().to_lowercase(), emotions))
                .collect(),
        }
    }
}

impl EmotionAnalyzer for EmotionLexicon {
    fn emotion_category_counts(&self, text: &str) -> BTreeMap<Emotion, usize> {
        let mut counts = BTreeMap::new();
        for token in tokens(text) {
            for &emotion in self.entries.get(&token).into_iter().flatten() {
                *counts.entry(emotion).or_insert(0) += 1;
            }
        }
        counts
    }
}
