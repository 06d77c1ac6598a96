use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::text::{
    analyzer::{EmotionAnalyzer, Neutral, PolarityAnalyzer},
    clause,
    lexicon::Lexicon,
    mean, population_std, tokens,
};

/// The six emotion dimensions of a text.
///
/// Values are raw: VAD means follow the lexicon's scale and `variation` is an
/// unbounded standard deviation. Consumers clamp before use.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Features {
    pub valence: f64,
    pub arousal: f64,
    pub dominance: f64,
    pub subjectivity: f64,
    pub variation: f64,
    pub density: f64,
}

/// How sentiment shift across clauses is measured.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariationStrategy {
    /// Spread of each clause's mean lexicon valence.
    #[default]
    LexiconValence,
    /// Spread of each clause's polarity-analyzer score.
    ClausePolarity,
}

/// Computes [`Features`] from text.
#[derive(Clone)]
pub struct FeatureExtractor {
    lexicon: Arc<Lexicon>,
    polarity: Arc<dyn PolarityAnalyzer>,
    emotions: Arc<dyn EmotionAnalyzer>,
    variation: VariationStrategy,
}

impl FeatureExtractor {
    /// Extractor over a VAD lexicon, with [`Neutral`] analyzers until others
    /// are attached.
    pub fn new(lexicon: impl Into<Arc<Lexicon>>) -> Self {
        Self {
            lexicon: lexicon.into(),
            polarity: Arc::new(Neutral),
            emotions: Arc::new(Neutral),
            variation: VariationStrategy::default(),
        }
    }

    pub fn with_polarity(mut self, analyzer: impl PolarityAnalyzer + 'static) -> Self {
        self.polarity = Arc::new(analyzer);
        self
    }

    pub fn with_emotions(mut self, analyzer: impl EmotionAnalyzer + 'static) -> Self {
        self.emotions = Arc::new(analyzer);
        self
    }

    pub fn with_variation(mut self, strategy: VariationStrategy) -> Self {
        self.variation = strategy;
        self
    }

    pub fn variation_strategy(&self) -> VariationStrategy {
        self.variation
    }

    pub fn analyze(&self, text: &str) -> Features {
        let hits: Vec<_> = tokens(text).filter_map(|t| self.lexicon.get(&t)).collect();
        let valence: Vec<f64> = hits.iter().map(|v| v.valence).collect();
        let arousal: Vec<f64> = hits.iter().map(|v| v.arousal).collect();
        let dominance: Vec<f64> = hits.iter().map(|v| v.dominance).collect();

        let features = Features {
            valence: finite(mean(&valence)),
            arousal: finite(mean(&arousal)),
            dominance: finite(mean(&dominance)),
            subjectivity: finite(self.polarity.subjectivity(text)),
            variation: finite(self.variation(text)),
            density: finite(self.density(text)),
        };

        tracing::debug!(
            tokens = text.split_whitespace().count(),
            lexicon_hits = hits.len(),
            ?features,
            "analyzed text"
        );
        features
    }

    fn variation(&self, text: &str) -> f64 {
        let scores: Vec<f64> = match self.variation {
            VariationStrategy::LexiconValence => clause::split(text)
                .map(|c| self.clause_valence(c))
                .collect(),
            VariationStrategy::ClausePolarity => clause::split(text)
                .map(|c| self.polarity.polarity(c))
                .collect(),
        };
        population_std(&scores)
    }

    /// Mean lexicon valence of a clause, `0.0` without hits.
    fn clause_valence(&self, clause: &str) -> f64 {
        let values: Vec<f64> = tokens(clause)
            .filter_map(|t| self.lexicon.get(&t))
            .map(|v| v.valence)
            .collect();
        mean(&values)
    }

    fn density(&self, text: &str) -> f64 {
        let total = text.split_whitespace().count();
        if total == 0 {
            return 0.0;
        }
        let emotional: usize = self.emotions.emotion_category_counts(text).values().sum();
        emotional as f64 / total as f64
    }
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
