use crate::{
    dsp::{Envelope, Sine},
    synth::{
        engine::Channel,
        message::{MessageReceiver, ToneId, ToneMessage},
    },
};

/// Tone slots preallocated by [`ToneRenderer::new`]: two channels of a full
/// melody pool plus the background chord, with headroom for release tails.
pub const MAX_TONES: usize = 128;

struct ToneSlot {
    id: Option<ToneId>,
    osc: Sine,
    amplitude: f32,
    channel: Channel,
    envelope: Option<Envelope>,
    age: u64,
}

impl ToneSlot {
    fn empty() -> Self {
        Self {
            id: None,
            osc: Sine::new(0.0),
            amplitude: 0.0,
            channel: Channel::Left,
            envelope: None,
            age: 0,
        }
    }

    fn is_free(&self) -> bool {
        self.id.is_none()
    }

    fn free(&mut self) {
        self.id = None;
        self.envelope = None;
    }
}

/// Audio-thread side of the tone engine.
///
/// Drains control messages at the start of every block, then renders every
/// live tone into separate left/right buffers. Nothing here allocates after
/// construction.
pub struct ToneRenderer<R: MessageReceiver> {
    slots: Vec<ToneSlot>,
    rx: R,
    sample_rate: f32,
    counter: u64,
}

impl<R: MessageReceiver> ToneRenderer<R> {
    pub fn new(sample_rate: f32, rx: R) -> Self {
        Self::with_capacity(sample_rate, MAX_TONES, rx)
    }

    pub fn with_capacity(sample_rate: f32, max_tones: usize, rx: R) -> Self {
        Self {
            slots: (0..max_tones.max(1)).map(|_| ToneSlot::empty()).collect(),
            rx,
            sample_rate,
            counter: 0,
        }
    }

    /// Number of tones currently sounding.
    pub fn active_tones(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_free()).count()
    }

    pub fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        while let Some(message) = self.rx.pop() {
            self.handle(message);
        }

        left.fill(0.0);
        right.fill(0.0);
        let frames = left.len().min(right.len());
        let sample_rate = self.sample_rate;

        for slot in self.slots.iter_mut().filter(|s| !s.is_free()) {
            let out = match slot.channel {
                Channel::Left => &mut left[..frames],
                Channel::Right => &mut right[..frames],
            };
            for sample in out.iter_mut() {
                let gain = match slot.envelope.as_mut() {
                    Some(env) => env.next_sample(sample_rate),
                    None => 1.0,
                };
                *sample += slot.osc.next_sample(sample_rate) * slot.amplitude * gain;
            }
            if slot.envelope.as_ref().is_some_and(|env| !env.is_active()) {
                slot.free();
            }
        }

        // Melody amplitudes go well above unity; keep the sum in range.
        for sample in left.iter_mut().chain(right.iter_mut()) {
            *sample = sample.tanh();
        }
    }

    fn handle(&mut self, message: ToneMessage) {
        match message {
            ToneMessage::Start {
                id,
                frequency,
                amplitude,
                channel,
                envelope,
            } => {
                let age = self.counter;
                self.counter += 1;
                let sample_rate = self.sample_rate;
                let slot = self.allocate();
                slot.id = Some(id);
                slot.osc = Sine::new(frequency);
                slot.amplitude = amplitude;
                slot.channel = channel;
                slot.age = age;
                slot.envelope = envelope.map(|shape| {
                    let mut env = Envelope::from_shape(&shape);
                    env.note_on(sample_rate);
                    env
                });
            }
            ToneMessage::Stop { id } => {
                if let Some(slot) = self.slots.iter_mut().find(|s| s.id == Some(id)) {
                    slot.free();
                }
            }
            ToneMessage::AllTonesOff => {
                self.slots.iter_mut().for_each(ToneSlot::free);
            }
        }
    }

    /// A free slot, or the oldest one when all are busy.
    fn allocate(&mut self) -> &mut ToneSlot {
        let index = self
            .slots
            .iter()
            .position(ToneSlot::is_free)
            .or_else(|| {
                self.slots
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, s)| s.age)
                    .map(|(i, _)| i)
            })
            .unwrap_or(0);
        &mut self.slots[index]
    }
}
