use crate::{mapping::EnvelopeShape, MIN_TIME};

/*
Timed ADSR Envelope
===================

A linear attack/decay/sustain/release generator whose gate closes by itself.
Melody notes are fire-and-forget: nobody sends a note-off, so the envelope is
told its total length up front and starts releasing at

    gate_time = duration - release

    Level
      1.0 ┐   ╱╲
          │  ╱  ╲________
      S   │ ╱            ╲
      0.0 └╱──────────────╲───→ Time
           A   D    S      R
           |<-- gate_time -->|<- release ->|

If the gate closes before attack/decay finish, release starts from whatever
level was reached, so there is never a jump.

Ramps are computed per sample from the stage time and the sample rate:

    increment = change / (time_seconds * sample_rate)

Release snapshots its start level and length in samples and interpolates, so
it lands on exactly 0.0.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,
    /// Seconds from note_on to automatic release; `None` holds until note_off
    gate_time: Option<f32>,

    stage: EnvelopeState,
    level: f32,
    gate_elapsed_samples: u32,
    gate_total_samples: u32,
    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_time: release.max(MIN_TIME),
            gate_time: None,

            stage: EnvelopeState::Idle,
            level: 0.0,
            gate_elapsed_samples: 0,
            gate_total_samples: u32::MAX,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    /// Envelope that releases on its own so the whole note fits `duration`.
    pub fn from_shape(shape: &EnvelopeShape) -> Self {
        let mut env = Self::adsr(
            shape.attack as f32,
            shape.decay as f32,
            shape.sustain as f32,
            shape.release as f32,
        );
        env.gate_time = Some(((shape.duration - shape.release) as f32).max(MIN_TIME));
        env
    }

    /// Gate high: restart from zero.
    pub fn note_on(&mut self, sample_rate: f32) {
        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
        self.gate_elapsed_samples = 0;
        self.gate_total_samples = match self.gate_time {
            Some(t) => (t * sample_rate).round().max(1.0) as u32,
            None => u32::MAX,
        };
    }

    /// Gate low: release from the current level.
    pub fn note_off(&mut self, sample_rate: f32) {
        if matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Release) {
            return;
        }
        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        if !matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Release) {
            self.gate_elapsed_samples = self.gate_elapsed_samples.saturating_add(1);
            if self.gate_elapsed_samples > self.gate_total_samples {
                self.note_off(sample_rate);
            }
        }

        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }
            EnvelopeState::Attack => {
                self.level += 1.0 / (self.attack_time * sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                let target = self.sustain_level;
                self.level -= (1.0 - target) / (self.decay_time * sample_rate);
                if self.level <= target {
                    self.level = target;
                    self.stage = EnvelopeState::Sustain;
                }
            }
            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }
            EnvelopeState::Release => {
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);
                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);
                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}
