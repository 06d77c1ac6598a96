//! Benchmarks for the tone renderer at realistic loads.

use std::{collections::VecDeque, hint::black_box};

use criterion::{BenchmarkId, Criterion};
use soundscape::{
    mapping::EnvelopeShape,
    synth::{Channel, ToneId, ToneMessage, ToneRenderer, MAX_VOICES},
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

/// Long enough that no tone frees itself while the benchmark runs.
const HELD: EnvelopeShape = EnvelopeShape {
    attack: 0.01,
    decay: 0.1,
    sustain: 0.6,
    release: 0.5,
    duration: 3_600.0,
};

/// Background chord plus `notes` stereo melody tones.
fn loaded(notes: usize) -> ToneRenderer<VecDeque<ToneMessage>> {
    let mut messages = VecDeque::new();
    let mut id = 0;
    let mut start = |frequency: f32, amplitude: f32, envelope: Option<EnvelopeShape>| {
        for channel in Channel::BOTH {
            messages.push_back(ToneMessage::Start {
                id: ToneId(id),
                frequency,
                amplitude,
                channel,
                envelope,
            });
            id += 1;
        }
    };
    for frequency in [261.63, 329.63, 392.0] {
        start(frequency, 0.2, None);
    }
    for n in 0..notes {
        start(261.63 + n as f32, 2.0, Some(HELD));
    }
    ToneRenderer::new(SAMPLE_RATE, messages)
}

pub fn bench_renderer(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/renderer");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Chord only, the quietest steady state
        let mut chord = loaded(0);
        group.bench_with_input(BenchmarkId::new("chord", size), &size, |b, _| {
            b.iter(|| chord.render_block(black_box(&mut left), black_box(&mut right)))
        });

        // Melody pool at its cap
        let mut full = loaded(MAX_VOICES);
        group.bench_with_input(BenchmarkId::new("full_pool", size), &size, |b, _| {
            b.iter(|| full.render_block(black_box(&mut left), black_box(&mut right)))
        });
    }

    group.finish();
}
