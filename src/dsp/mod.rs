//! Low-level DSP primitives used by the tone renderer.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside the renderer's preallocated tone slots.

/// Attack/decay/sustain/release envelope with an optional self-closing gate.
pub mod envelope;
/// Sine oscillator.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeState};
pub use oscillator::Sine;
