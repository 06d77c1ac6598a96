//! Clause splitting and feature extraction over short and long input.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use soundscape::text::{clause, FeatureExtractor, Lexicon, SentimentLexicon, Vad};

const SHORT: &str = "I'm ecstatic! But then I remembered the meeting, and I felt sad.";

fn long_text() -> String {
    [
        "The morning was calm and bright; we walked along the river.",
        "Then the storm came, but nobody was afraid because the shelter was close.",
        "Later the children laughed and sang - the rain had stopped.",
        "I never thought a day could hold so much joy, or so much worry.",
    ]
    .repeat(25)
    .join("\n")
}

fn extractor() -> FeatureExtractor {
    let lexicon = Lexicon::from_entries([
        ("calm", Vad::new(0.6, -0.6, 0.2)),
        ("bright", Vad::new(0.7, 0.3, 0.4)),
        ("storm", Vad::new(-0.5, 0.7, 0.3)),
        ("afraid", Vad::new(-0.8, 0.6, -0.6)),
        ("laughed", Vad::new(0.8, 0.6, 0.4)),
        ("joy", Vad::new(0.9, 0.5, 0.5)),
        ("worry", Vad::new(-0.6, 0.4, -0.4)),
        ("ecstatic", Vad::new(0.95, 0.9, 0.6)),
        ("sad", Vad::new(-0.8, -0.3, -0.5)),
    ]);
    let sentiment = SentimentLexicon::from_entries([
        ("bright", 0.7, 0.8),
        ("afraid", -0.6, 0.9),
        ("joy", 0.8, 0.6),
        ("sad", -0.5, 1.0),
    ]);
    FeatureExtractor::new(lexicon).with_polarity(sentiment)
}

pub fn bench_clauses(c: &mut Criterion) {
    let mut group = c.benchmark_group("text/clauses");
    let long = long_text();

    for (name, text) in [("short", SHORT), ("long", long.as_str())] {
        group.bench_with_input(BenchmarkId::new("split", name), text, |b, text| {
            b.iter(|| clause::split(black_box(text)).count())
        });
    }

    group.finish();
}

pub fn bench_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("text/features");
    let extractor = extractor();
    let long = long_text();

    for (name, text) in [("short", SHORT), ("long", long.as_str())] {
        group.bench_with_input(BenchmarkId::new("analyze", name), text, |b, text| {
            b.iter(|| extractor.analyze(black_box(text)))
        });
    }

    group.finish();
}
