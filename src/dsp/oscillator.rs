use std::f32::consts::TAU;

/// Phase-accumulating sine oscillator.
///
/// Phase is kept in `[0, 1)` so long-running chord tones never lose precision.
#[derive(Debug, Clone, Copy)]
pub struct Sine {
    phase: f32,
    frequency: f32,
}

impl Sine {
    pub fn new(frequency: f32) -> Self {
        Self {
            phase: 0.0,
            frequency,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let out = (self.phase * TAU).sin();
        self.phase += self.frequency / sample_rate;
        self.phase -= self.phase.floor();
        out
    }
}
