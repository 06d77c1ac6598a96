//! Benchmarks for the ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use soundscape::dsp::Envelope;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn render(env: &mut Envelope, buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = env.next_sample(SAMPLE_RATE);
    }
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut env = Envelope::adsr(0.1, 0.1, 0.7, 0.3);
        env.note_on(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| render(&mut env, black_box(&mut buffer)))
        });

        let mut env = Envelope::adsr(0.001, 0.001, 0.7, 0.3);
        env.note_on(SAMPLE_RATE);
        for _ in 0..200 {
            env.next_sample(SAMPLE_RATE);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| render(&mut env, black_box(&mut buffer)))
        });
    }

    group.finish();
}
