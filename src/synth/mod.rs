// Purpose: Audio-engine seam, voice ownership, and the realtime tone renderer.
// The scheduler talks to `AudioEngine`; the renderer sits behind it on the audio thread.

pub mod engine;
pub mod message;
pub mod render;
pub mod voice;

#[cfg(feature = "rtrb")]
pub use engine::RingEngine;
pub use engine::{AudioEngine, Channel};
pub use message::{MessageReceiver, ToneId, ToneMessage};
pub use render::ToneRenderer;
pub use voice::{StereoVoice, VoicePool, MAX_VOICES};
