//! The audio-engine seam.
//!
//! The scheduler never renders samples. It asks an [`AudioEngine`] to start
//! and stop tones and keeps the returned handles. [`RingEngine`] is the
//! realtime implementation: it turns every request into a [`ToneMessage`] on a
//! lock-free ring that the audio callback drains.

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{error::Result, mapping::EnvelopeShape};

#[cfg(feature = "rtrb")]
use crate::{
    error::Error,
    synth::message::{ToneId, ToneMessage},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub const BOTH: [Channel; 2] = [Channel::Left, Channel::Right];
}

/// Tone primitives offered by the sound device owner.
pub trait AudioEngine {
    /// Opaque handle to one live tone.
    type Voice;

    /// Start a tone that sounds until [`AudioEngine::stop`].
    fn start_continuous_tone(
        &mut self,
        frequency: f64,
        amplitude: f64,
        channel: Channel,
    ) -> Result<Self::Voice>;

    /// Start a tone shaped by `envelope`; it fades out on its own after
    /// `envelope.duration` seconds.
    fn start_enveloped_tone(
        &mut self,
        frequency: f64,
        envelope: &EnvelopeShape,
        amplitude: f64,
        channel: Channel,
    ) -> Result<Self::Voice>;

    fn stop(&mut self, voice: Self::Voice);
}

/// [`AudioEngine`] that forwards requests to a [`ToneRenderer`] over an
/// `rtrb` ring.
///
/// [`ToneRenderer`]: crate::synth::render::ToneRenderer
#[cfg(feature = "rtrb")]
pub struct RingEngine {
    tx: Producer<ToneMessage>,
    next_id: u64,
}

#[cfg(feature = "rtrb")]
impl RingEngine {
    /// Engine plus the consumer end to hand to the audio callback.
    pub fn new(capacity: usize) -> (Self, Consumer<ToneMessage>) {
        let (tx, rx) = RingBuffer::new(capacity);
        (Self { tx, next_id: 0 }, rx)
    }

    /// Silence everything the renderer is playing.
    pub fn all_tones_off(&mut self) -> Result<()> {
        self.send(ToneMessage::AllTonesOff)
    }

    fn send(&mut self, message: ToneMessage) -> Result<()> {
        self.tx.push(message).map_err(|_| {
            Error::Audio("tone control ring is full; audio callback is not draining it".into())
        })
    }

    fn start(
        &mut self,
        frequency: f64,
        amplitude: f64,
        channel: Channel,
        envelope: Option<EnvelopeShape>,
    ) -> Result<ToneId> {
        let id = ToneId(self.next_id);
        self.send(ToneMessage::Start {
            id,
            frequency: frequency as f32,
            amplitude: amplitude as f32,
            channel,
            envelope,
        })?;
        self.next_id += 1;
        Ok(id)
    }
}

#[cfg(feature = "rtrb")]
impl AudioEngine for RingEngine {
    type Voice = ToneId;

    fn start_continuous_tone(
        &mut self,
        frequency: f64,
        amplitude: f64,
        channel: Channel,
    ) -> Result<ToneId> {
        self.start(frequency, amplitude, channel, None)
    }

    fn start_enveloped_tone(
        &mut self,
        frequency: f64,
        envelope: &EnvelopeShape,
        amplitude: f64,
        channel: Channel,
    ) -> Result<ToneId> {
        self.start(frequency, amplitude, channel, Some(*envelope))
    }

    fn stop(&mut self, voice: ToneId) {
        if let Err(err) = self.send(ToneMessage::Stop { id: voice }) {
            tracing::warn!(?voice, %err, "dropped stop request");
        }
    }
}
