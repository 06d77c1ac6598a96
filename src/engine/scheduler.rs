//! Melody scheduler.
//!
//! The scheduler owns everything one analysis run puts on the device: the
//! background chord, the melody [`VoicePool`], the cyclic note pointer and
//! the RNG. It has no clock of its own. A host calls [`Scheduler::tick`] and
//! waits the interval it returns before calling again.
//!
//! ```text
//!          start(params)             stop()
//!   Idle ───────────────→ Running ───────────→ Idle
//!                          │   ↑
//!                          └───┘ tick(): pick note, start voice, re-jitter
//! ```

use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    error::Result,
    mapping::{MusicalParameters, Tempo},
    synth::{AudioEngine, StereoVoice, VoicePool},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStatus {
    Idle,
    Running,
}

/// How the melody moved on a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Cyclic step to the next chord tone
    Step,
    /// Uniformly random chord tone
    Jump,
}

/// Per-run melodic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerState {
    /// Cyclic pointer into the chord, advanced by stepwise moves only
    pub note_index: usize,
    /// Seconds until the next trigger
    pub current_interval: f64,
}

/// What one trigger did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trigger {
    pub note_index: usize,
    pub frequency: f64,
    pub motion: Motion,
    /// Melody voices stopped to stay within the pool capacity
    pub evicted: usize,
    pub next_interval: Duration,
}

/// Pick the next chord tone.
///
/// With probability `bias` the pointer steps forward (mod `chord_len`) and
/// that tone is chosen; otherwise any tone is chosen uniformly and the
/// pointer stays put.
pub fn select_note<R: Rng>(
    chord_len: usize,
    bias: f64,
    note_index: &mut usize,
    rng: &mut R,
) -> (usize, Motion) {
    debug_assert!(chord_len > 0);
    if rng.gen::<f64>() < bias {
        *note_index = (*note_index + 1) % chord_len;
        (*note_index, Motion::Step)
    } else {
        (rng.gen_range(0..chord_len), Motion::Jump)
    }
}

/// Base interval ± `jitter_pct`, clamped into the tempo bounds (seconds).
pub fn next_interval<R: Rng>(tempo: &Tempo, rng: &mut R) -> f64 {
    let spread = tempo.jitter_pct * tempo.base;
    let jitter = if spread > 0.0 {
        rng.gen_range(-spread..=spread)
    } else {
        0.0
    };
    tempo.bounds.clamp(tempo.base + jitter)
}

pub struct Scheduler<E: AudioEngine, R = StdRng> {
    engine: E,
    rng: R,
    status: SchedulerStatus,
    params: Option<MusicalParameters>,
    state: Option<SchedulerState>,
    background: Vec<StereoVoice<E::Voice>>,
    melody: VoicePool<E::Voice>,
}

impl<E: AudioEngine> Scheduler<E, StdRng> {
    pub fn new(engine: E) -> Self {
        Self::with_rng(engine, StdRng::from_entropy())
    }

    pub fn seeded(engine: E, seed: u64) -> Self {
        Self::with_rng(engine, StdRng::seed_from_u64(seed))
    }
}

impl<E: AudioEngine, R> Scheduler<E, R> {
    pub fn with_rng(engine: E, rng: R) -> Self {
        Self {
            engine,
            rng,
            status: SchedulerStatus::Idle,
            params: None,
            state: None,
            background: Vec::new(),
            melody: VoicePool::default(),
        }
    }

    /// No further triggers until the next [`Scheduler::start`]. Sounding
    /// voices are left alone; see [`Scheduler::silence`].
    pub fn stop(&mut self) {
        if self.status == SchedulerStatus::Running {
            tracing::debug!("melody stopped");
        }
        self.status = SchedulerStatus::Idle;
    }

    /// Stop the background chord and every melody voice.
    pub fn silence(&mut self) {
        for voice in self.background.drain(..) {
            voice.stop(&mut self.engine);
        }
        self.melody.drain(&mut self.engine);
    }

    pub fn status(&self) -> SchedulerStatus {
        self.status
    }

    pub fn state(&self) -> Option<&SchedulerState> {
        self.state.as_ref()
    }

    pub fn params(&self) -> Option<&MusicalParameters> {
        self.params.as_ref()
    }

    /// Live melody voices (stereo pairs).
    pub fn melody_voices(&self) -> usize {
        self.melody.len()
    }

    /// Live background chord voices (stereo pairs).
    pub fn background_voices(&self) -> usize {
        self.background.len()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

impl<E: AudioEngine, R: Rng> Scheduler<E, R> {
    /// Begin a run: drop the previous one entirely, sound the new chord and
    /// reset the melodic state. Returns the delay before the first trigger.
    pub fn start(&mut self, params: MusicalParameters) -> Result<Duration> {
        self.stop();
        self.silence();

        for &frequency in params.chord.tones() {
            let started = StereoVoice::start(&mut self.engine, |engine, channel| {
                engine.start_continuous_tone(frequency, params.chord_volume, channel)
            });
            match started {
                Ok(voice) => self.background.push(voice),
                Err(err) => {
                    self.silence();
                    return Err(err);
                }
            }
        }

        self.params = Some(params);
        self.state = Some(SchedulerState {
            note_index: 0,
            current_interval: params.tempo.base,
        });
        self.status = SchedulerStatus::Running;
        tracing::info!(
            chord = ?params.chord.tones(),
            interval = params.tempo.base,
            bias = params.note_bias,
            "melody started"
        );
        Ok(Duration::ZERO)
    }

    /// Fire one note and compute the next interval. `Ok(None)` when idle.
    pub fn tick(&mut self) -> Result<Option<Trigger>> {
        if self.status != SchedulerStatus::Running {
            return Ok(None);
        }
        let (Some(params), Some(state)) = (self.params, self.state.as_mut()) else {
            return Ok(None);
        };

        let (note_index, motion) = select_note(
            params.chord.len(),
            params.note_bias,
            &mut state.note_index,
            &mut self.rng,
        );
        let frequency = params.chord.tones()[note_index];

        let voice = StereoVoice::start(&mut self.engine, |engine, channel| {
            engine.start_enveloped_tone(frequency, &params.envelope, params.note_volume, channel)
        })?;
        self.melody.add(voice);
        let evicted = self.melody.evict_if_over_capacity(&mut self.engine);

        let interval = next_interval(&params.tempo, &mut self.rng);
        state.current_interval = interval;
        tracing::trace!(frequency, ?motion, interval, "melody note");

        Ok(Some(Trigger {
            note_index,
            frequency,
            motion,
            evicted,
            next_interval: Duration::from_secs_f64(interval),
        }))
    }
}
