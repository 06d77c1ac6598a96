//! Benchmarks for the audio-thread side.

mod envelope;
mod renderer;

pub use envelope::bench_envelope;
pub use renderer::bench_renderer;
