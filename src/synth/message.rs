use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::{mapping::EnvelopeShape, synth::engine::Channel};

/// Handle for one rendered tone on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToneId(pub u64);

/// Control messages from the scheduler side to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ToneMessage {
    Start {
        id: ToneId,
        frequency: f32,
        amplitude: f32,
        channel: Channel,
        /// `None` for a continuous tone that sounds until stopped
        envelope: Option<EnvelopeShape>,
    },
    Stop {
        id: ToneId,
    },
    AllTonesOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ToneMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ToneMessage> {
    fn pop(&mut self) -> Option<ToneMessage> {
        Consumer::pop(self).ok()
    }
}

/// Offline receiver, handy for bouncing or testing without a ring.
impl MessageReceiver for VecDeque<ToneMessage> {
    fn pop(&mut self) -> Option<ToneMessage> {
        self.pop_front()
    }
}
