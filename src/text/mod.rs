//! Text → emotion features.
//!
//! The pipeline is deterministic given its lexicons: tokens are looked up in a
//! VAD [`Lexicon`](lexicon::Lexicon), clauses come from [`clause::split`], and
//! subjectivity/emotion counts come from pluggable [`analyzer`]s.

pub mod analyzer;
pub mod clause;
pub mod features;
pub mod lexicon;

pub use analyzer::{
    Emotion, EmotionAnalyzer, EmotionLexicon, Neutral, PolarityAnalyzer, SentimentLexicon,
};
pub use features::{FeatureExtractor, Features, VariationStrategy};
pub use lexicon::{Lexicon, Vad};

/// Whitespace tokens with leading/trailing punctuation stripped, lowercased.
///
/// Inner punctuation survives, so contractions like `i'm` stay one token.
/// Tokens that are pure punctuation come out empty and match nothing.
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
}

/// Arithmetic mean, `0.0` for an empty sample.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, `0.0` for fewer than two values.
pub(crate) fn population_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
