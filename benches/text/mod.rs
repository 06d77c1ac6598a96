//! Benchmarks for text analysis.

mod analysis;

pub use analysis::{bench_clauses, bench_features};
