use std::collections::VecDeque;

use crate::{
    error::Result,
    synth::engine::{AudioEngine, Channel},
};

/// Most melody voices kept alive at once.
pub const MAX_VOICES: usize = 50;

/// The left/right handles of one tone, evicted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StereoVoice<V> {
    pub left: V,
    pub right: V,
}

impl<V> StereoVoice<V> {
    /// Start the same tone on both channels. If the right side fails, the
    /// left one is stopped again so nothing leaks.
    pub fn start<E, F>(engine: &mut E, mut start: F) -> Result<Self>
    where
        E: AudioEngine<Voice = V>,
        F: FnMut(&mut E, Channel) -> Result<V>,
    {
        let left = start(engine, Channel::Left)?;
        match start(engine, Channel::Right) {
            Ok(right) => Ok(Self { left, right }),
            Err(err) => {
                engine.stop(left);
                Err(err)
            }
        }
    }

    pub fn stop<E: AudioEngine<Voice = V>>(self, engine: &mut E) {
        engine.stop(self.left);
        engine.stop(self.right);
    }
}

/// Bounded FIFO of live melody voices.
///
/// When more than `capacity` voices are held, the oldest are stopped and
/// dropped first.
#[derive(Debug)]
pub struct VoicePool<V> {
    voices: VecDeque<StereoVoice<V>>,
    capacity: usize,
}

impl<V> Default for VoicePool<V> {
    fn default() -> Self {
        Self::new(MAX_VOICES)
    }
}

impl<V> VoicePool<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            voices: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Take ownership of a newly started voice (newest last).
    pub fn add(&mut self, voice: StereoVoice<V>) {
        self.voices.push_back(voice);
    }

    /// Stop and drop the oldest voices until the pool is within capacity.
    /// Returns how many were evicted.
    pub fn evict_if_over_capacity<E: AudioEngine<Voice = V>>(&mut self, engine: &mut E) -> usize {
        let mut evicted = 0;
        while self.voices.len() > self.capacity {
            if let Some(oldest) = self.voices.pop_front() {
                oldest.stop(engine);
                evicted += 1;
            }
        }
        if evicted > 0 {
            tracing::trace!(evicted, live = self.voices.len(), "evicted melody voices");
        }
        evicted
    }

    /// Stop every voice, oldest first.
    pub fn drain<E: AudioEngine<Voice = V>>(&mut self, engine: &mut E) {
        for voice in self.voices.drain(..) {
            voice.stop(engine);
        }
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Live voices, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &StereoVoice<V>> {
        self.voices.iter()
    }
}
