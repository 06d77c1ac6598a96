pub mod dsp; // Envelope and oscillator primitives
pub mod engine; // Melody scheduling and the analyse-and-play session
pub mod error;
pub mod mapping; // Emotion features to musical parameters
pub mod synth; // Audio engine seam and realtime tone rendering
pub mod text; // Lexicons, clause splitting, feature extraction

pub use engine::{Player, Scheduler, Sonifier};
pub use error::{Error, LexiconLoadError, Result};
pub use mapping::{MappingConfig, MusicalParameters, ParameterMapper};
pub use text::{FeatureExtractor, Features, Lexicon};

/// Largest block the renderer is asked for in one callback.
pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
